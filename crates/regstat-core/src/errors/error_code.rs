//! RegstatErrorCode trait for the presentation boundary.

/// Every error enum provides a structured code string so the surrounding
/// application can present failures without matching on variants.
pub trait RegstatErrorCode {
    /// Returns the error code string (e.g., "QUERY_FAILED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted presentation string: `[ERROR_CODE] message`.
    fn display_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const NOT_CONNECTED: &str = "NOT_CONNECTED";
pub const QUERY_FAILED: &str = "QUERY_FAILED";
pub const IMPORT_FAILED: &str = "IMPORT_FAILED";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_QUERY: &str = "INVALID_QUERY";
pub const REGULARIZATION_ERROR: &str = "REGULARIZATION_ERROR";
pub const MAPPING_NOT_FOUND: &str = "MAPPING_NOT_FOUND";
pub const WORKER_UNAVAILABLE: &str = "WORKER_UNAVAILABLE";
