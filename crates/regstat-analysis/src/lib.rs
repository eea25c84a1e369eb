//! regstat-analysis: analytics over the stored registration and license
//! facts.
//!
//! The query compiler turns a declarative filter configuration into one
//! parameterized yearly aggregate; the regularization subsystem reconciles
//! uncurated make/model spellings with the curated coding; the cache layer
//! versions every derived value. [`Engine`] wires them to a single store
//! handle.

pub mod cache;
pub mod engine;
pub mod query;
pub mod regularization;
pub mod store;

pub use cache::RefreshOutcome;
pub use engine::{Engine, ImportFile};
pub use query::QueryEngine;
pub use regularization::RegularizationManager;
pub use store::Store;

use regstat_core::errors::StorageError;

pub(crate) fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::query(e.to_string())
}
