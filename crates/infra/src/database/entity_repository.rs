//! SQLite-backed customer/project/activity lookup.
//!
//! Returns the acyclic snapshot structs the budget engine validates against.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use tally_core::EntityRepository;
use tally_domain::{
    Activity, Budget, BudgetKind, Customer, Project, Result as DomainResult, TallyError,
};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::{InfraError, InfraResult};

const ACTIVITY_QUERY: &str = "\
SELECT id, project_id, name, budget_money, time_budget, budget_monthly
FROM activities WHERE id = ?1";

const PROJECT_QUERY: &str = "\
SELECT id, customer_id, name, budget_money, time_budget, budget_monthly
FROM projects WHERE id = ?1";

const CUSTOMER_QUERY: &str = "\
SELECT id, name, currency, budget_money, time_budget, budget_monthly
FROM customers WHERE id = ?1";

/// Async entity lookup port backed by SQLite.
pub struct SqliteEntityRepository {
    db: Arc<DbManager>,
}

impl SqliteEntityRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityRepository for SqliteEntityRepository {
    async fn find_activity(&self, id: Uuid) -> DomainResult<Option<Activity>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Option<Activity>> {
            let conn = db.get_connection()?;
            fetch_activity(&conn, id).map_err(TallyError::from)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_project(&self, id: Uuid) -> DomainResult<Option<Project>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Option<Project>> {
            let conn = db.get_connection()?;
            fetch_project(&conn, id).map_err(TallyError::from)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_customer(&self, id: Uuid) -> DomainResult<Option<Customer>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Option<Customer>> {
            let conn = db.get_connection()?;
            fetch_customer(&conn, id).map_err(TallyError::from)
        })
        .await
        .map_err(map_join_error)?
    }
}

struct RawBudget {
    money: Option<f64>,
    time: Option<i64>,
    monthly: bool,
}

impl RawBudget {
    fn from_row(row: &Row<'_>, first_column: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            money: row.get(first_column)?,
            time: row.get(first_column + 1)?,
            monthly: row.get(first_column + 2)?,
        })
    }

    fn into_budget(self) -> InfraResult<Budget> {
        let money = self
            .money
            .map(|value| {
                Decimal::from_f64_retain(value)
                    .ok_or_else(|| InfraError::Data(format!("non-finite budget_money: {value}")))
            })
            .transpose()?;

        Ok(Budget {
            money,
            time: self.time,
            kind: if self.monthly { BudgetKind::Monthly } else { BudgetKind::Lifetime },
        })
    }
}

fn fetch_activity(conn: &Connection, id: Uuid) -> InfraResult<Option<Activity>> {
    let row = conn
        .query_row(ACTIVITY_QUERY, [id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                RawBudget::from_row(row, 3)?,
            ))
        })
        .optional()?;

    row.map(|(id, project_id, name, budget)| {
        Ok(Activity {
            id: parse_uuid(&id)?,
            name,
            project_id: project_id.as_deref().map(parse_uuid).transpose()?,
            budget: budget.into_budget()?,
        })
    })
    .transpose()
}

fn fetch_project(conn: &Connection, id: Uuid) -> InfraResult<Option<Project>> {
    let row = conn
        .query_row(PROJECT_QUERY, [id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                RawBudget::from_row(row, 3)?,
            ))
        })
        .optional()?;

    row.map(|(id, customer_id, name, budget)| {
        Ok(Project {
            id: parse_uuid(&id)?,
            name,
            customer_id: parse_uuid(&customer_id)?,
            budget: budget.into_budget()?,
        })
    })
    .transpose()
}

fn fetch_customer(conn: &Connection, id: Uuid) -> InfraResult<Option<Customer>> {
    let row = conn
        .query_row(CUSTOMER_QUERY, [id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                RawBudget::from_row(row, 3)?,
            ))
        })
        .optional()?;

    row.map(|(id, name, currency, budget)| {
        Ok(Customer {
            id: parse_uuid(&id)?,
            name,
            currency,
            budget: budget.into_budget()?,
        })
    })
    .transpose()
}

fn parse_uuid(raw: &str) -> InfraResult<Uuid> {
    Uuid::parse_str(raw).map_err(|err| InfraError::Data(format!("bad uuid {raw}: {err}")))
}

fn map_join_error(err: task::JoinError) -> TallyError {
    TallyError::from(InfraError::from(err))
}
