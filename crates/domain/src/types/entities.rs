//! Read-only customer/project/activity snapshots.
//!
//! These are acyclic data-transfer structs fetched by id at validation time.
//! The validator never mutates them and never follows live object graphs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::budget::Budget;

/// A customer, the top of the budget chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    /// ISO 4217 currency code used for money budgets down the chain.
    pub currency: String,
    pub budget: Budget,
}

/// A project, owned by exactly one customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub customer_id: Uuid,
    pub budget: Budget,
}

/// An activity, either global or bound to one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub name: String,
    /// `None` for global activities usable across projects.
    pub project_id: Option<Uuid>,
    pub budget: Budget,
}
