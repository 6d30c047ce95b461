//! Budget ceilings and computed budget statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a budget accumulates over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    /// Resets at the start of every calendar month.
    Monthly,
    /// Accumulates over the whole lifetime of the entity.
    Lifetime,
}

/// Budget ceilings attached to an activity, project or customer.
///
/// `None` means "no ceiling" for that dimension. An entity without any
/// ceiling is never checked by the budget rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Money ceiling, in the customer currency.
    pub money: Option<Decimal>,
    /// Time ceiling, in seconds.
    pub time: Option<i64>,
    /// Monthly-resetting or lifetime-cumulative.
    pub kind: BudgetKind,
}

impl Budget {
    /// A budget with no ceilings at all.
    pub fn none() -> Self {
        Self { money: None, time: None, kind: BudgetKind::Lifetime }
    }

    /// Whether any ceiling (money or time) is configured.
    pub fn has_any(&self) -> bool {
        self.money.is_some() || self.time.is_some()
    }

    /// Whether the budget resets every calendar month.
    pub fn is_monthly(&self) -> bool {
        self.kind == BudgetKind::Monthly
    }
}

/// Computed spend-vs-ceiling snapshot for one entity at one reference date.
///
/// Constructed fresh for every validation pass, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatistic {
    /// Money ceiling, if configured.
    pub budget: Option<Decimal>,
    /// Money already consumed by billable records.
    pub budget_spent: Decimal,
    /// Time ceiling in seconds, if configured.
    pub time_budget: Option<i64>,
    /// Seconds already consumed by billable records.
    pub time_budget_spent: i64,
}

impl BudgetStatistic {
    /// Remaining money before the ceiling is hit, clamped at zero.
    pub fn budget_open(&self) -> Decimal {
        match self.budget {
            Some(budget) => (budget - self.budget_spent).max(Decimal::ZERO),
            None => Decimal::ZERO,
        }
    }

    /// Remaining seconds before the time ceiling is hit, clamped at zero.
    pub fn time_budget_open(&self) -> i64 {
        match self.time_budget {
            Some(budget) => (budget - self.time_budget_spent).max(0),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn budget_without_ceilings_has_none() {
        let budget = Budget::none();
        assert!(!budget.has_any());
        assert!(!budget.is_monthly());
    }

    #[test]
    fn budget_with_single_ceiling_has_any() {
        let money = Budget { money: Some(dec!(100)), time: None, kind: BudgetKind::Lifetime };
        let time = Budget { money: None, time: Some(3600), kind: BudgetKind::Monthly };
        assert!(money.has_any());
        assert!(time.has_any());
        assert!(time.is_monthly());
    }

    #[test]
    fn budget_open_clamps_at_zero() {
        let stat = BudgetStatistic {
            budget: Some(dec!(100)),
            budget_spent: dec!(130),
            time_budget: Some(3600),
            time_budget_spent: 4000,
        };
        assert_eq!(stat.budget_open(), Decimal::ZERO);
        assert_eq!(stat.time_budget_open(), 0);
    }

    #[test]
    fn budget_open_reports_remaining() {
        let stat = BudgetStatistic {
            budget: Some(dec!(100)),
            budget_spent: dec!(25.50),
            time_budget: Some(7200),
            time_budget_spent: 1800,
        };
        assert_eq!(stat.budget_open(), dec!(74.50));
        assert_eq!(stat.time_budget_open(), 5400);
    }
}
