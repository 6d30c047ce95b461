//! Port interfaces for the budget engine
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_domain::{Activity, BudgetField, Customer, PersistedTimesheet, Project, Result};
use uuid::Uuid;

/// The entity a billable aggregate is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateScope {
    Activity(Uuid),
    Project(Uuid),
    Customer(Uuid),
}

/// Summed rate and duration of billable timesheets within a scope.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateTotals {
    /// Sum of monetary rates.
    pub rate: Decimal,
    /// Sum of durations in seconds.
    pub duration: i64,
}

/// Read access to persisted timesheet data.
#[async_trait]
pub trait TimesheetQueries: Send + Sync {
    /// Fetch the previously stored values for a timesheet id.
    ///
    /// Returns `None` when the id is unknown (e.g. a record deleted by a
    /// concurrent request).
    async fn find_persisted(&self, id: Uuid) -> Result<Option<PersistedTimesheet>>;

    /// Sum rate and duration of billable records within the scope.
    ///
    /// When `range` is set, only records whose begin date falls inside the
    /// half-open `[start, end)` interval are counted.
    async fn sum_billable(
        &self,
        scope: AggregateScope,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<AggregateTotals>;
}

/// Read access to the customer/project/activity snapshots.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn find_activity(&self, id: Uuid) -> Result<Option<Activity>>;
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>>;
    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>>;
}

/// The budget permission kinds gating detailed violation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetPermission {
    /// Permission to see money budget figures.
    Money,
    /// Permission to see time budget figures.
    Time,
}

/// Authorization checks for the acting user.
pub trait PermissionChecker: Send + Sync {
    /// Whether the acting user may see detailed budget figures for the field.
    fn is_granted(&self, permission: BudgetPermission, field: BudgetField) -> bool;
}
