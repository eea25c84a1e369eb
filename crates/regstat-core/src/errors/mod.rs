//! Error handling for regstat.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod query_error;
pub mod regularization_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use engine_error::EngineError;
pub use error_code::RegstatErrorCode;
pub use query_error::QueryError;
pub use regularization_error::RegularizationError;
pub use storage_error::StorageError;
