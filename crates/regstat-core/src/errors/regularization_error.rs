//! Regularization errors.

use super::error_code::{self, RegstatErrorCode};
use super::StorageError;

/// Errors that can occur in the make/model regularization workflow.
#[derive(Debug, thiserror::Error)]
pub enum RegularizationError {
    #[error("No curated years configured")]
    NoCuratedYears,

    #[error("No uncurated years configured")]
    NoUncuratedYears,

    #[error("Years configured as both curated and uncurated: {years:?}")]
    OverlappingYears { years: Vec<i64> },

    #[error("Regularization mapping {id} not found")]
    MappingNotFound { id: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RegstatErrorCode for RegularizationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MappingNotFound { .. } => error_code::MAPPING_NOT_FOUND,
            Self::Storage(e) => e.error_code(),
            _ => error_code::REGULARIZATION_ERROR,
        }
    }
}
