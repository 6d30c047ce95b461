//! SQLite-backed persistence for the budget engine.

pub mod entity_repository;
pub mod manager;
pub mod timesheet_repository;

pub use entity_repository::SqliteEntityRepository;
pub use manager::DbManager;
pub use timesheet_repository::SqliteTimesheetRepository;
