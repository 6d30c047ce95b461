//! Budget consistency rule - the core validation logic.
//!
//! Walks the activity -> project -> customer chain of a timesheet being
//! saved and raises a violation for every level whose money or time budget
//! would be exceeded by the net change of this save.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_domain::{
    Budget, BudgetField, BudgetStatistic, Result, Timesheet, ValidationConfig, Violation,
    ViolationCode,
};
use tracing::debug;

use super::delta::{relevant_fields_changed, BudgetDeltas, LevelDelta};
use super::format;
use super::rate::RateCalculator;
use super::rules::BudgetRule;
use super::statistics::BudgetStatisticService;
use crate::ports::{BudgetPermission, EntityRepository, PermissionChecker, TimesheetQueries};

/// Message shown to users who may not see detailed budget figures.
const GENERIC_MESSAGE: &str = "The budget is completely used.";

/// Fallback when the customer (and thus its currency) cannot be resolved.
const FALLBACK_CURRENCY: &str = "EUR";

/// Validates that a timesheet save does not overrun any budget in its
/// activity -> project -> customer chain.
///
/// Stateless single-pass rule. All failures are reported as [`Violation`]
/// values; missing project, missing user or a still-running record simply
/// make the rule not applicable.
pub struct BudgetConsistencyRule {
    queries: Arc<dyn TimesheetQueries>,
    entities: Arc<dyn EntityRepository>,
    permissions: Arc<dyn PermissionChecker>,
    statistics: BudgetStatisticService,
    rates: RateCalculator,
    config: ValidationConfig,
}

impl BudgetConsistencyRule {
    pub fn new(
        queries: Arc<dyn TimesheetQueries>,
        entities: Arc<dyn EntityRepository>,
        permissions: Arc<dyn PermissionChecker>,
        config: ValidationConfig,
    ) -> Self {
        let statistics = BudgetStatisticService::new(Arc::clone(&queries));
        Self {
            queries,
            entities,
            permissions,
            statistics,
            rates: RateCalculator::new(),
            config,
        }
    }

    /// Monthly budgets are evaluated in the month the record begins;
    /// lifetime budgets are evaluated against everything logged so far.
    fn reference_date(budget: &Budget, timesheet: &Timesheet) -> DateTime<Utc> {
        if budget.is_monthly() {
            timesheet.begin
        } else {
            Utc::now()
        }
    }

    /// Check one entity level, raising at most one violation.
    ///
    /// Money is checked first and short-circuits the time check: a level
    /// that already overruns its money budget does not also report time.
    fn check_level(
        &self,
        field: BudgetField,
        budget: &Budget,
        stat: &BudgetStatistic,
        delta: &LevelDelta,
        currency: &str,
        violations: &mut Vec<Violation>,
    ) {
        if let Some(ceiling) = stat.budget {
            let delta_rate = delta.rate_for(budget);
            if stat.budget_spent + delta_rate > ceiling {
                debug!(
                    field = %field,
                    spent = %stat.budget_spent,
                    delta = %delta_rate,
                    ceiling = %ceiling,
                    "money budget exceeded"
                );
                violations.push(self.money_violation(field, stat, ceiling, currency));
                return;
            }
        }

        if let Some(ceiling) = stat.time_budget {
            let delta_duration = delta.duration_for(budget);
            if stat.time_budget_spent + delta_duration > ceiling {
                debug!(
                    field = %field,
                    spent = stat.time_budget_spent,
                    delta = delta_duration,
                    ceiling = ceiling,
                    "time budget exceeded"
                );
                violations.push(self.time_violation(field, stat, ceiling));
            }
        }
    }

    fn money_violation(
        &self,
        field: BudgetField,
        stat: &BudgetStatistic,
        ceiling: Decimal,
        currency: &str,
    ) -> Violation {
        let message = if self.permissions.is_granted(BudgetPermission::Money, field) {
            format!(
                "The budget is used up: {} of {} spent, {} remaining.",
                format::money(stat.budget_spent, currency),
                format::money(ceiling, currency),
                format::money(stat.budget_open(), currency),
            )
        } else {
            GENERIC_MESSAGE.to_string()
        };

        Violation::new(field, message, ViolationCode::MoneyBudgetExceeded)
    }

    fn time_violation(
        &self,
        field: BudgetField,
        stat: &BudgetStatistic,
        ceiling: i64,
    ) -> Violation {
        let message = if self.permissions.is_granted(BudgetPermission::Time, field) {
            format!(
                "The time budget is used up: {} of {} spent, {} remaining.",
                format::duration(stat.time_budget_spent),
                format::duration(ceiling),
                format::duration(stat.time_budget_open()),
            )
        } else {
            GENERIC_MESSAGE.to_string()
        };

        Violation::new(field, message, ViolationCode::TimeBudgetExceeded)
    }
}

#[async_trait]
impl BudgetRule for BudgetConsistencyRule {
    fn name(&self) -> &'static str {
        "budget_consistency"
    }

    async fn validate(&self, timesheet: &Timesheet) -> Result<Vec<Violation>> {
        if self.config.allow_budget_overbooking {
            return Ok(Vec::new());
        }
        if timesheet.is_running() || timesheet.user_id.is_none() || !timesheet.billable {
            return Ok(Vec::new());
        }
        let Some(project_id) = timesheet.project_id else {
            return Ok(Vec::new());
        };

        // Rate first: it derives the duration freshly, before the duration
        // used for budget math is read.
        let rate = self.rates.calculate(timesheet);
        let duration = timesheet.calculated_duration().unwrap_or(0);

        let previous = match timesheet.id {
            Some(id) => self.queries.find_persisted(id).await?,
            None => None,
        };

        if let Some(prev) = &previous {
            if !relevant_fields_changed(timesheet, duration, rate, prev) {
                debug!(id = ?timesheet.id, "no budget-relevant change, skipping");
                return Ok(Vec::new());
            }
        }

        let Some(project) = self.entities.find_project(project_id).await? else {
            return Ok(Vec::new());
        };
        let customer = self.entities.find_customer(project.customer_id).await?;
        let activity = match timesheet.activity_id {
            Some(id) => self.entities.find_activity(id).await?,
            None => None,
        };

        let deltas = match &previous {
            Some(prev) => {
                BudgetDeltas::edit(timesheet, duration, rate, prev, project.customer_id)
            }
            None => BudgetDeltas::creation(duration, rate),
        };

        let currency = customer
            .as_ref()
            .map_or(FALLBACK_CURRENCY, |c| c.currency.as_str());

        let mut violations = Vec::new();

        if let Some(activity) = &activity {
            if activity.budget.has_any() {
                let reference = Self::reference_date(&activity.budget, timesheet);
                let stat = self.statistics.activity_statistic(activity, reference).await?;
                self.check_level(
                    BudgetField::Activity,
                    &activity.budget,
                    &stat,
                    &deltas.activity,
                    currency,
                    &mut violations,
                );
            }
        }

        if project.budget.has_any() {
            let reference = Self::reference_date(&project.budget, timesheet);
            let stat = self.statistics.project_statistic(&project, reference).await?;
            self.check_level(
                BudgetField::Project,
                &project.budget,
                &stat,
                &deltas.project,
                currency,
                &mut violations,
            );
        }

        if let Some(customer) = &customer {
            if customer.budget.has_any() {
                let reference = Self::reference_date(&customer.budget, timesheet);
                let stat = self.statistics.customer_statistic(customer, reference).await?;
                self.check_level(
                    BudgetField::Customer,
                    &customer.budget,
                    &stat,
                    &deltas.customer,
                    currency,
                    &mut violations,
                );
            }
        }

        Ok(violations)
    }
}
