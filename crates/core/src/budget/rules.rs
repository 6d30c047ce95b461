//! Ordered rule pipeline for timesheet validation.
//!
//! Rules are explicit polymorphic hooks: the pipeline runs a fixed, ordered
//! list of [`BudgetRule`] implementations and collects their violations.
//! There is no publish/subscribe bus and no global registry.

use std::sync::Arc;

use async_trait::async_trait;
use tally_domain::{Result, Timesheet, Violation};
use tracing::debug;

/// A single validation rule evaluated on every timesheet save.
#[async_trait]
pub trait BudgetRule: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Validate the record, returning any violations.
    ///
    /// Violations are values; rules only return `Err` for infrastructure
    /// failures (database, pool), never for exceeded budgets.
    async fn validate(&self, timesheet: &Timesheet) -> Result<Vec<Violation>>;
}

/// Runs an ordered list of rules and concatenates their violations.
#[derive(Default)]
pub struct ValidationPipeline {
    rules: Vec<Arc<dyn BudgetRule>>,
}

impl ValidationPipeline {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule to the pipeline.
    pub fn with_rule(mut self, rule: Arc<dyn BudgetRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate the record against every rule, in order.
    pub async fn validate(&self, timesheet: &Timesheet) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for rule in &self.rules {
            let mut found = rule.validate(timesheet).await?;
            if !found.is_empty() {
                debug!(rule = rule.name(), count = found.len(), "rule reported violations");
            }
            violations.append(&mut found);
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tally_domain::{BudgetField, ViolationCode};

    struct FixedRule {
        violations: Vec<Violation>,
    }

    #[async_trait]
    impl BudgetRule for FixedRule {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn validate(&self, _timesheet: &Timesheet) -> Result<Vec<Violation>> {
            Ok(self.violations.clone())
        }
    }

    fn timesheet() -> Timesheet {
        Timesheet {
            id: None,
            user_id: None,
            begin: Utc::now(),
            end: None,
            duration: None,
            billable: false,
            fixed_rate: None,
            hourly_rate: None,
            project_id: None,
            activity_id: None,
        }
    }

    #[tokio::test]
    async fn pipeline_preserves_rule_order() {
        let first = Violation::new(
            BudgetField::Activity,
            "first",
            ViolationCode::MoneyBudgetExceeded,
        );
        let second = Violation::new(
            BudgetField::Project,
            "second",
            ViolationCode::TimeBudgetExceeded,
        );

        let pipeline = ValidationPipeline::new()
            .with_rule(Arc::new(FixedRule { violations: vec![first.clone()] }))
            .with_rule(Arc::new(FixedRule { violations: vec![second.clone()] }));

        let violations = pipeline.validate(&timesheet()).await.unwrap();
        assert_eq!(violations, vec![first, second]);
    }

    #[tokio::test]
    async fn empty_pipeline_reports_nothing() {
        let violations = ValidationPipeline::new().validate(&timesheet()).await.unwrap();
        assert!(violations.is_empty());
    }
}
