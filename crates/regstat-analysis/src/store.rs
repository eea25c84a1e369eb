//! Shared store handle: read pool access plus the single writer thread.

use std::sync::Arc;

use regstat_core::errors::StorageError;
use regstat_storage::{DatabaseManager, Pending, WorkerClosed, WriteWorker};
use rusqlite::Connection;

/// Constructed once by the engine and shared by every subsystem. Reads run
/// on the caller's thread; writes are funneled through [`WriteWorker`].
pub struct Store {
    db: Arc<DatabaseManager>,
    worker: WriteWorker,
}

impl Store {
    pub fn new(db: Arc<DatabaseManager>) -> Result<Self, StorageError> {
        let worker = WriteWorker::spawn(Arc::clone(&db))
            .map_err(|e| StorageError::query(format!("failed to start write worker: {e}")))?;
        Ok(Self { db, worker })
    }

    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    pub fn read<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        self.db.with_reader(f)
    }

    /// Run `f` on the writer connection, on the writer thread, and wait.
    pub fn write<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        self.worker
            .run(move |db| db.with_writer(f))
            .map_err(|_| StorageError::NotConnected)?
    }

    /// Queue a job over the whole store handle.
    pub fn submit<F, T>(&self, job: F) -> Result<Pending<T>, WorkerClosed>
    where
        F: FnOnce(&DatabaseManager) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.worker.submit(job)
    }

    pub fn close(&self) -> Result<(), StorageError> {
        self.db.close()
    }
}
