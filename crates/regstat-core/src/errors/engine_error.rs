//! Engine errors: aggregates subsystem errors at the composition root.

use super::error_code::{self, RegstatErrorCode};
use super::{ConfigError, QueryError, RegularizationError, StorageError};

/// Errors surfaced by the `Engine` facade.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Regularization error: {0}")]
    Regularization(#[from] RegularizationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Write worker is no longer running")]
    WorkerUnavailable,
}

impl RegstatErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Query(e) => e.error_code(),
            Self::Regularization(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::WorkerUnavailable => error_code::WORKER_UNAVAILABLE,
        }
    }
}
