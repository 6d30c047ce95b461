//! Delta computation for timesheet edits.
//!
//! When an existing record is saved again, only the net change may be charged
//! against an aggregate - otherwise the old contribution would be counted
//! twice. Netting is decided independently per entity level: the old value
//! only nets out when the record still points at the same entity on that
//! level and the old record was billable (non-billable records were never in
//! the aggregate to begin with).

use chrono::Datelike;
use rust_decimal::Decimal;
use tally_domain::{Budget, PersistedTimesheet, Timesheet};
use uuid::Uuid;

/// The increment one save charges against a single entity level.
#[derive(Debug, Clone, Copy)]
pub struct LevelDelta {
    full_duration: i64,
    full_rate: Decimal,
    netted_duration: i64,
    netted_rate: Decimal,
    month_changed: bool,
}

impl LevelDelta {
    fn full(duration: i64, rate: Decimal) -> Self {
        Self {
            full_duration: duration,
            full_rate: rate,
            netted_duration: duration,
            netted_rate: rate,
            month_changed: false,
        }
    }

    /// Duration increment to charge against the given budget.
    ///
    /// A monthly budget whose record moved into a different calendar month
    /// must not net against the old month: the old contribution lives in a
    /// different bucket, so the full new duration counts.
    pub fn duration_for(&self, budget: &Budget) -> i64 {
        if budget.is_monthly() && self.month_changed {
            self.full_duration
        } else {
            self.netted_duration
        }
    }

    /// Rate increment to charge against the given budget.
    pub fn rate_for(&self, budget: &Budget) -> Decimal {
        if budget.is_monthly() && self.month_changed {
            self.full_rate
        } else {
            self.netted_rate
        }
    }
}

/// Per-level deltas for one validation pass.
#[derive(Debug, Clone, Copy)]
pub struct BudgetDeltas {
    pub activity: LevelDelta,
    pub project: LevelDelta,
    pub customer: LevelDelta,
}

impl BudgetDeltas {
    /// Deltas for a record saved for the first time: the full duration and
    /// rate count on every level.
    pub fn creation(duration: i64, rate: Decimal) -> Self {
        let level = LevelDelta::full(duration, rate);
        Self { activity: level, project: level, customer: level }
    }

    /// Deltas for an edit of an already persisted record.
    ///
    /// `customer_id` is the customer of the record's new project.
    pub fn edit(
        timesheet: &Timesheet,
        duration: i64,
        rate: Decimal,
        previous: &PersistedTimesheet,
        customer_id: Uuid,
    ) -> Self {
        let month_changed = begin_month_changed(timesheet, previous);

        let activity = Self::level(
            duration,
            rate,
            previous,
            timesheet.activity_id == previous.activity_id,
            month_changed,
        );
        let project = Self::level(
            duration,
            rate,
            previous,
            timesheet.project_id == previous.project_id,
            month_changed,
        );
        let customer = Self::level(
            duration,
            rate,
            previous,
            Some(customer_id) == previous.customer_id,
            month_changed,
        );

        Self { activity, project, customer }
    }

    fn level(
        duration: i64,
        rate: Decimal,
        previous: &PersistedTimesheet,
        same_entity: bool,
        month_changed: bool,
    ) -> LevelDelta {
        // A changed assignment or a previously non-billable record means the
        // old values are not part of this level's aggregate.
        let nettable = same_entity && previous.billable;
        let (netted_duration, netted_rate) = if nettable {
            (duration - previous.duration, rate - previous.rate)
        } else {
            (duration, rate)
        };

        LevelDelta {
            full_duration: duration,
            full_rate: rate,
            netted_duration,
            netted_rate,
            month_changed,
        }
    }
}

/// Whether the edit moved the record's begin date into a different calendar
/// month than the persisted one.
pub fn begin_month_changed(timesheet: &Timesheet, previous: &PersistedTimesheet) -> bool {
    (timesheet.begin.year(), timesheet.begin.month())
        != (previous.begin.year(), previous.begin.month())
}

/// Whether any budget-relevant field differs from the persisted state.
///
/// No-op edits must never trigger aggregate queries or violations.
pub fn relevant_fields_changed(
    timesheet: &Timesheet,
    duration: i64,
    rate: Decimal,
    previous: &PersistedTimesheet,
) -> bool {
    duration != previous.duration
        || rate != previous.rate
        || timesheet.billable != previous.billable
        || timesheet.begin != previous.begin
        || timesheet.project_id != previous.project_id
        || timesheet.activity_id != previous.activity_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tally_domain::BudgetKind;

    fn utc(mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, mo, d, 10, 0, 0).single().unwrap()
    }

    fn monthly() -> Budget {
        Budget { money: Some(dec!(100)), time: Some(3600), kind: BudgetKind::Monthly }
    }

    fn lifetime() -> Budget {
        Budget { money: Some(dec!(100)), time: Some(3600), kind: BudgetKind::Lifetime }
    }

    fn timesheet(begin: DateTime<Utc>, project: Uuid, activity: Uuid) -> Timesheet {
        Timesheet {
            id: Some(Uuid::new_v4()),
            user_id: Some(Uuid::new_v4()),
            begin,
            end: Some(begin + chrono::Duration::hours(1)),
            duration: None,
            billable: true,
            fixed_rate: None,
            hourly_rate: None,
            project_id: Some(project),
            activity_id: Some(activity),
        }
    }

    fn persisted(begin: DateTime<Utc>, project: Uuid, activity: Uuid, customer: Uuid) -> PersistedTimesheet {
        PersistedTimesheet {
            duration: 1800,
            rate: dec!(30),
            billable: true,
            begin,
            project_id: Some(project),
            activity_id: Some(activity),
            customer_id: Some(customer),
        }
    }

    #[test]
    fn creation_charges_full_values_everywhere() {
        let deltas = BudgetDeltas::creation(3600, dec!(60));
        assert_eq!(deltas.activity.duration_for(&lifetime()), 3600);
        assert_eq!(deltas.customer.rate_for(&monthly()), dec!(60));
    }

    #[test]
    fn unchanged_assignment_nets_old_contribution() {
        let (project, activity, customer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let ts = timesheet(utc(3, 10), project, activity);
        let prev = persisted(utc(3, 10), project, activity, customer);

        let deltas = BudgetDeltas::edit(&ts, 3600, dec!(60), &prev, customer);
        assert_eq!(deltas.activity.duration_for(&lifetime()), 1800);
        assert_eq!(deltas.activity.rate_for(&lifetime()), dec!(30));
    }

    #[test]
    fn changed_project_charges_full_value_on_project_level_only() {
        let (old_project, activity, customer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let new_project = Uuid::new_v4();
        let ts = timesheet(utc(3, 10), new_project, activity);
        let prev = persisted(utc(3, 10), old_project, activity, customer);

        let deltas = BudgetDeltas::edit(&ts, 3600, dec!(60), &prev, customer);
        // old project's contribution does not net against the new project
        assert_eq!(deltas.project.duration_for(&lifetime()), 3600);
        // activity and customer assignment unchanged, so they still net
        assert_eq!(deltas.activity.duration_for(&lifetime()), 1800);
        assert_eq!(deltas.customer.duration_for(&lifetime()), 1800);
    }

    #[test]
    fn previously_non_billable_record_is_not_netted() {
        let (project, activity, customer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let ts = timesheet(utc(3, 10), project, activity);
        let mut prev = persisted(utc(3, 10), project, activity, customer);
        prev.billable = false;

        let deltas = BudgetDeltas::edit(&ts, 3600, dec!(60), &prev, customer);
        assert_eq!(deltas.project.duration_for(&lifetime()), 3600);
        assert_eq!(deltas.project.rate_for(&lifetime()), dec!(60));
    }

    #[test]
    fn month_move_charges_full_value_against_monthly_budgets_only() {
        let (project, activity, customer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        // January -> February
        let ts = timesheet(utc(2, 5), project, activity);
        let prev = persisted(utc(1, 20), project, activity, customer);

        let deltas = BudgetDeltas::edit(&ts, 3600, dec!(60), &prev, customer);
        assert_eq!(deltas.activity.duration_for(&monthly()), 3600);
        assert_eq!(deltas.activity.rate_for(&monthly()), dec!(60));
        // lifetime aggregates still contain the old contribution
        assert_eq!(deltas.activity.duration_for(&lifetime()), 1800);
    }

    #[test]
    fn longer_duration_strictly_increases_the_charged_delta() {
        let (project, activity, customer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let ts = timesheet(utc(3, 10), project, activity);
        let prev = persisted(utc(3, 10), project, activity, customer);

        let short = BudgetDeltas::edit(&ts, 2000, dec!(30), &prev, customer);
        let long = BudgetDeltas::edit(&ts, 5000, dec!(30), &prev, customer);
        assert!(long.project.duration_for(&lifetime()) > short.project.duration_for(&lifetime()));
        assert!(long.project.duration_for(&monthly()) > short.project.duration_for(&monthly()));
    }

    #[test]
    fn no_op_edit_reports_no_relevant_changes() {
        let (project, activity, customer) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let ts = timesheet(utc(3, 10), project, activity);
        let mut prev = persisted(utc(3, 10), project, activity, customer);
        prev.duration = 1000;
        prev.rate = dec!(25);

        assert!(!relevant_fields_changed(&ts, 1000, dec!(25), &prev));
        assert!(relevant_fields_changed(&ts, 1001, dec!(25), &prev));
        assert!(relevant_fields_changed(&ts, 1000, dec!(25.01), &prev));
    }
}
