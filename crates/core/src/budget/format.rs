//! Money and duration formatting for violation messages.

use rust_decimal::Decimal;

/// Format a money amount with its currency code, e.g. `123.50 EUR`.
pub fn money(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Format a duration in seconds as `H:MM`, e.g. `1:05`.
///
/// Sub-minute remainders are truncated; negative durations clamp to `0:00`.
pub fn duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}
