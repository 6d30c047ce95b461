//! Domain types and models

pub mod budget;
pub mod entities;
pub mod timesheet;
pub mod violation;

// Re-export the commonly used types for convenience
pub use budget::{Budget, BudgetKind, BudgetStatistic};
pub use entities::{Activity, Customer, Project};
pub use timesheet::{PersistedTimesheet, Timesheet};
pub use violation::{BudgetField, Violation, ViolationCode};
