//! Monetary rate calculation for a single timesheet record.

use rust_decimal::Decimal;
use tally_domain::Timesheet;

const SECONDS_PER_HOUR: i64 = 3600;

/// Computes the monetary rate of one timesheet record.
///
/// A fixed rate always wins. Otherwise the rate is hourly rate times the
/// duration in hours. Records without any configured rate are worth zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateCalculator;

impl RateCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Rate for the record as it would be persisted.
    ///
    /// Uses [`Timesheet::calculated_duration`] rather than the cached
    /// duration field, so begin/end edits made during the current save are
    /// already priced in.
    pub fn calculate(&self, timesheet: &Timesheet) -> Decimal {
        if let Some(fixed) = timesheet.fixed_rate {
            return fixed;
        }

        let Some(hourly) = timesheet.hourly_rate else {
            return Decimal::ZERO;
        };

        let seconds = timesheet.calculated_duration().unwrap_or(0);
        hourly * Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
    }
}
