//! Validation violations produced by the budget rules.

use serde::{Deserialize, Serialize};

/// The field a violation is attached to, matching the entity level of the
/// budget chain that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetField {
    Activity,
    Project,
    Customer,
}

impl BudgetField {
    /// Field path as exposed to the save pipeline.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Project => "project",
            Self::Customer => "customer",
        }
    }
}

impl std::fmt::Display for BudgetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable violation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    MoneyBudgetExceeded,
    TimeBudgetExceeded,
}

/// A structured validation violation.
///
/// Violations are values attached to a field path. They are never raised as
/// errors and never abort the save pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: BudgetField,
    pub message: String,
    pub code: ViolationCode,
}

impl Violation {
    pub fn new(field: BudgetField, message: impl Into<String>, code: ViolationCode) -> Self {
        Self { field, message: message.into(), code }
    }
}
