//! Query compilation and execution errors.

use super::error_code::{self, RegstatErrorCode};
use super::{RegularizationError, StorageError};

/// Errors that can occur while compiling or executing an analytical query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid filter configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Regularization error: {0}")]
    Regularization(#[from] RegularizationError),
}

impl QueryError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl RegstatErrorCode for QueryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => error_code::INVALID_QUERY,
            Self::Storage(e) => e.error_code(),
            Self::Regularization(e) => e.error_code(),
        }
    }
}
