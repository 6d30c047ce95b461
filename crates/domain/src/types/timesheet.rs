//! Timesheet records and their previously persisted raw values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A timesheet record as submitted by the save/update pipeline.
///
/// `id` is `None` for records that have not been persisted yet. A record
/// without an `end` date is still running and carries no duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timesheet {
    pub id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub begin: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// Cached duration in seconds. May be stale after begin/end edits;
    /// budget math always goes through [`Timesheet::calculated_duration`].
    pub duration: Option<i64>,
    pub billable: bool,
    pub fixed_rate: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub project_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
}

impl Timesheet {
    /// Duration in seconds derived from `end - begin`, ignoring the cached
    /// `duration` field so in-flight begin/end edits are reflected.
    ///
    /// Returns `None` while the record is still running.
    pub fn calculated_duration(&self) -> Option<i64> {
        self.end.map(|end| (end - self.begin).num_seconds())
    }

    /// Whether the record is still running (no end date).
    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }
}

/// The previously stored values for an existing timesheet, fetched once per
/// validation to compute edit deltas. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTimesheet {
    pub duration: i64,
    pub rate: Decimal,
    pub billable: bool,
    pub begin: DateTime<Utc>,
    pub project_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
}
