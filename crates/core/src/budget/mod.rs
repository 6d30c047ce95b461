//! Budget/rate consistency engine for timesheet saves.
//!
//! The engine decides, on every create or update, whether a timesheet would
//! overrun an activity, project or customer budget (money or time). It is a
//! single-pass, stateless computation: deltas against the previously stored
//! record are netted per entity level, then checked against a fresh
//! spend-vs-ceiling statistic for each budget-bearing entity in the
//! activity -> project -> customer chain.

pub mod delta;
pub mod format;
pub mod rate;
pub mod rules;
pub mod statistics;
pub mod validator;

pub use rate::RateCalculator;
