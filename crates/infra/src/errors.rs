//! Infrastructure error types and conversions into the domain error.

use tally_domain::TallyError;
use thiserror::Error;

/// Errors raised by the infrastructure layer.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid stored data: {0}")]
    Data(String),
}

/// Result alias for infrastructure operations.
pub type InfraResult<T> = std::result::Result<T, InfraError>;

impl From<InfraError> for TallyError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Sqlite(_) | InfraError::Pool(_) => Self::Database(err.to_string()),
            InfraError::Join(_) => Self::Internal(err.to_string()),
            InfraError::Data(msg) => Self::Database(msg),
        }
    }
}
