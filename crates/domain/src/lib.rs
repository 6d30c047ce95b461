//! # Tally Domain
//!
//! Business domain types and models for Tally.
//!
//! This crate contains:
//! - Domain data types (Timesheet, Budget, Activity, Project, Customer)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Tally crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
