//! Budget statistic service - spend-vs-ceiling snapshots per entity.

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use tally_domain::{Activity, Budget, BudgetStatistic, Customer, Project, Result, TallyError};

use crate::ports::{AggregateScope, TimesheetQueries};

/// Computes [`BudgetStatistic`] snapshots for budget-bearing entities.
///
/// Monthly budgets aggregate only billable records inside the calendar month
/// containing the reference date; lifetime budgets aggregate everything.
/// Every call re-queries the source data - snapshots are never cached.
pub struct BudgetStatisticService {
    queries: Arc<dyn TimesheetQueries>,
}

impl BudgetStatisticService {
    pub fn new(queries: Arc<dyn TimesheetQueries>) -> Self {
        Self { queries }
    }

    /// Statistic for an activity at the given reference date.
    pub async fn activity_statistic(
        &self,
        activity: &Activity,
        reference: DateTime<Utc>,
    ) -> Result<BudgetStatistic> {
        self.statistic(AggregateScope::Activity(activity.id), &activity.budget, reference).await
    }

    /// Statistic for a project at the given reference date.
    pub async fn project_statistic(
        &self,
        project: &Project,
        reference: DateTime<Utc>,
    ) -> Result<BudgetStatistic> {
        self.statistic(AggregateScope::Project(project.id), &project.budget, reference).await
    }

    /// Statistic for a customer at the given reference date.
    pub async fn customer_statistic(
        &self,
        customer: &Customer,
        reference: DateTime<Utc>,
    ) -> Result<BudgetStatistic> {
        self.statistic(AggregateScope::Customer(customer.id), &customer.budget, reference).await
    }

    async fn statistic(
        &self,
        scope: AggregateScope,
        budget: &Budget,
        reference: DateTime<Utc>,
    ) -> Result<BudgetStatistic> {
        let range = if budget.is_monthly() { Some(month_bounds(reference)?) } else { None };
        let totals = self.queries.sum_billable(scope, range).await?;

        Ok(BudgetStatistic {
            budget: budget.money,
            budget_spent: totals.rate,
            time_budget: budget.time,
            time_budget_spent: totals.duration,
        })
    }
}

/// Half-open `[start, end)` bounds of the calendar month containing `reference`.
pub fn month_bounds(reference: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let year = reference.year();
    let month = reference.month();

    let start = month_start(year, month)?;
    let end = if month == 12 { month_start(year + 1, 1)? } else { month_start(year, month + 1)? };

    Ok((start, end))
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| TallyError::Internal(format!("invalid month start {year}-{month:02}")))
}
