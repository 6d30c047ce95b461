//! SQLite-backed timesheet queries.
//!
//! Implements the read-only `TimesheetQueries` port used by the budget
//! engine: raw previously-stored values for delta computation and billable
//! aggregate sums scoped by entity and begin-date range. All queries run on
//! the shared connection pool provided by `DbManager`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;
use tally_core::{AggregateScope, AggregateTotals, TimesheetQueries};
use tally_domain::{PersistedTimesheet, Result as DomainResult, TallyError};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::{InfraError, InfraResult};

/// Decimal places kept when converting REAL money sums back to `Decimal`.
/// Anything below a micro-unit is binary float noise.
const MONEY_SCALE: u32 = 6;

const PERSISTED_QUERY: &str = "\
SELECT COALESCE(t.duration, 0), t.rate, t.billable, t.begin_time,
       t.project_id, t.activity_id, p.customer_id
FROM timesheets t
LEFT JOIN projects p ON p.id = t.project_id
WHERE t.id = ?1";

/// Async timesheet query port backed by SQLite.
pub struct SqliteTimesheetRepository {
    db: Arc<DbManager>,
}

impl SqliteTimesheetRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TimesheetQueries for SqliteTimesheetRepository {
    async fn find_persisted(&self, id: Uuid) -> DomainResult<Option<PersistedTimesheet>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Option<PersistedTimesheet>> {
            let conn = db.get_connection()?;
            fetch_persisted(&conn, id).map_err(TallyError::from)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn sum_billable(
        &self,
        scope: AggregateScope,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DomainResult<AggregateTotals> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<AggregateTotals> {
            let conn = db.get_connection()?;
            aggregate(&conn, scope, range).map_err(TallyError::from)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn fetch_persisted(conn: &Connection, id: Uuid) -> InfraResult<Option<PersistedTimesheet>> {
    let row: Option<RawRow> = conn
        .query_row(PERSISTED_QUERY, [id.to_string()], |row| {
            Ok(RawRow {
                duration: row.get(0)?,
                rate: row.get(1)?,
                billable: row.get(2)?,
                begin_ts: row.get(3)?,
                project_id: row.get(4)?,
                activity_id: row.get(5)?,
                customer_id: row.get(6)?,
            })
        })
        .optional()?;

    row.map(RawRow::into_persisted).transpose()
}

struct RawRow {
    duration: i64,
    rate: f64,
    billable: bool,
    begin_ts: i64,
    project_id: Option<String>,
    activity_id: Option<String>,
    customer_id: Option<String>,
}

impl RawRow {
    fn into_persisted(self) -> InfraResult<PersistedTimesheet> {
        Ok(PersistedTimesheet {
            duration: self.duration,
            rate: decimal_from_real(self.rate, "rate")?,
            billable: self.billable,
            begin: parse_timestamp(self.begin_ts)?,
            project_id: parse_uuid(self.project_id.as_deref(), "project_id")?,
            activity_id: parse_uuid(self.activity_id.as_deref(), "activity_id")?,
            customer_id: parse_uuid(self.customer_id.as_deref(), "customer_id")?,
        })
    }
}

fn aggregate(
    conn: &Connection,
    scope: AggregateScope,
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> InfraResult<AggregateTotals> {
    let sql = aggregate_sql(scope, range.is_some());
    let id = scope_id(scope).to_string();

    let (rate_sum, duration_sum): (f64, i64) = match range {
        Some((start, end)) => conn.query_row(
            &sql,
            rusqlite::params![id, start.timestamp(), end.timestamp()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?,
        None => conn.query_row(&sql, [id], |row| Ok((row.get(0)?, row.get(1)?)))?,
    };

    Ok(AggregateTotals {
        rate: decimal_from_real(rate_sum, "rate sum")?,
        duration: duration_sum,
    })
}

fn aggregate_sql(scope: AggregateScope, with_range: bool) -> String {
    let (join, filter) = match scope {
        AggregateScope::Activity(_) => ("", "t.activity_id = ?1"),
        AggregateScope::Project(_) => ("", "t.project_id = ?1"),
        AggregateScope::Customer(_) => {
            (" INNER JOIN projects p ON p.id = t.project_id", "p.customer_id = ?1")
        }
    };
    let range = if with_range { " AND t.begin_time >= ?2 AND t.begin_time < ?3" } else { "" };

    format!(
        "SELECT COALESCE(SUM(t.rate), 0.0), COALESCE(SUM(t.duration), 0) \
         FROM timesheets t{join} WHERE t.billable = 1 AND {filter}{range}"
    )
}

fn scope_id(scope: AggregateScope) -> Uuid {
    match scope {
        AggregateScope::Activity(id)
        | AggregateScope::Project(id)
        | AggregateScope::Customer(id) => id,
    }
}

fn decimal_from_real(value: f64, column: &str) -> InfraResult<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(MONEY_SCALE))
        .ok_or_else(|| InfraError::Data(format!("non-finite {column}: {value}")))
}

fn parse_timestamp(ts: i64) -> InfraResult<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| InfraError::Data(format!("invalid unix timestamp {ts}")))
}

fn parse_uuid(value: Option<&str>, column: &str) -> InfraResult<Option<Uuid>> {
    value
        .map(|raw| {
            Uuid::parse_str(raw).map_err(|err| InfraError::Data(format!("bad {column}: {err}")))
        })
        .transpose()
}

fn map_join_error(err: task::JoinError) -> TallyError {
    TallyError::from(InfraError::from(err))
}
