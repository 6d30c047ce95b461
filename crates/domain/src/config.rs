//! Configuration management

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub validation: ValidationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Timesheet validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// When true, timesheets may exceed customer/project/activity budgets
    /// and the budget rule is skipped entirely.
    pub allow_budget_overbooking: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: "tally.db".to_string(),
                pool_size: 8,
            },
            validation: ValidationConfig {
                allow_budget_overbooking: false,
            },
        }
    }
}
