//! # Tally Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite-backed repositories (aggregate queries, raw persisted values,
//!   entity snapshots)
//! - The pooled database connection manager and schema bootstrap
//! - Configuration loading from environment variables and files
//! - A static permission checker for deployments without an auth service
//!
//! ## Architecture
//! - Implements traits defined in `tally-core`
//! - Depends on `tally-domain` and `tally-core`
//! - Contains all "impure" code (I/O, database access)

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use auth::StaticPermissionChecker;
pub use database::{DbManager, SqliteEntityRepository, SqliteTimesheetRepository};
pub use errors::InfraError;
