//! # Tally Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The budget/rate consistency engine for timesheet saves
//! - Port/adapter interfaces (traits)
//! - Rate calculation and budget statistic services
//!
//! ## Architecture Principles
//! - Only depends on `tally-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod budget;
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use budget::rules::{BudgetRule, ValidationPipeline};
pub use budget::statistics::BudgetStatisticService;
pub use budget::validator::BudgetConsistencyRule;
pub use budget::RateCalculator;
pub use ports::{
    AggregateScope, AggregateTotals, BudgetPermission, EntityRepository, PermissionChecker,
    TimesheetQueries,
};
