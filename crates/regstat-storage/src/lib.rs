//! regstat-storage: SQLite persistence for registration and license facts.
//!
//! Single serialized writer plus a read pool, `user_version` migrations, the
//! integer-identity Dimension Store, the transactional bulk Import Pipeline,
//! and the write worker that funnels every mutation through one thread.

pub mod connection;
pub mod dimensions;
pub mod import;
pub mod indexes;
pub mod migrations;
pub mod queries;
pub mod worker;

pub use connection::DatabaseManager;
pub use dimensions::DimensionStore;
pub use import::{ImportOutcome, ImportPipeline, ImportSession, IndexStrategy, SessionSummary};
pub use worker::{Pending, WorkerClosed, WriteWorker};

use regstat_core::errors::StorageError;

/// Map a backing-engine error onto `StorageError::QueryFailed`.
pub(crate) fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::QueryFailed {
        message: e.to_string(),
    }
}
