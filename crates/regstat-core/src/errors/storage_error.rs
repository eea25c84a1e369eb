//! Storage-layer errors for SQLite operations.

use super::error_code::{self, RegstatErrorCode};

/// Errors raised by the backing store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("storage handle is not connected")]
    NotConnected,

    #[error("query failed: {message}")]
    QueryFailed { message: String },

    #[error("import failed: {message}")]
    ImportFailed { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },
}

impl StorageError {
    /// Wrap a backing-engine diagnostic as a `QueryFailed`.
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryFailed {
            message: message.into(),
        }
    }

    /// Wrap a pipeline-level failure as an `ImportFailed`.
    pub fn import(message: impl Into<String>) -> Self {
        Self::ImportFailed {
            message: message.into(),
        }
    }
}

impl RegstatErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => error_code::NOT_CONNECTED,
            Self::QueryFailed { .. } => error_code::QUERY_FAILED,
            Self::ImportFailed { .. } => error_code::IMPORT_FAILED,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
        }
    }
}
