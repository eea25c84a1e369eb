//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use regstat_core::errors::StorageError;
use rusqlite::Connection;

use self::pool::ReadPool;
use self::pragmas::apply_pragmas;
use crate::{migrations, sql_err};

/// The store handle. Owns the single write connection and the read pool.
///
/// Constructed once at the composition root and shared by reference with
/// every subsystem.
pub struct DatabaseManager {
    writer: Mutex<Option<Connection>>,
    readers: ReadPool,
    path: Option<PathBuf>,
    closed: AtomicBool,
}

impl DatabaseManager {
    /// Open a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path, read_pool_size: usize) -> Result<Self, StorageError> {
        let writer = Connection::open(path).map_err(sql_err)?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;

        let readers = ReadPool::open(path, read_pool_size)?;

        Ok(Self {
            writer: Mutex::new(Some(writer)),
            readers,
            path: Some(path.to_path_buf()),
            closed: AtomicBool::new(false),
        })
    }

    /// Open an in-memory database (for testing).
    ///
    /// In-memory read connections would be isolated databases, so every read
    /// is routed through the writer.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(sql_err)?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;

        Ok(Self {
            writer: Mutex::new(Some(writer)),
            readers: ReadPool::empty(),
            path: None,
            closed: AtomicBool::new(false),
        })
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self
            .writer
            .lock()
            .map_err(|_| StorageError::query("write lock poisoned"))?;
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(StorageError::NotConnected),
        }
    }

    /// Execute a read operation with a pooled read connection.
    /// In-memory stores read through the writer.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::NotConnected);
        }
        if self.readers.is_empty() {
            self.with_writer(f)
        } else {
            self.readers.with_conn(f)
        }
    }

    /// Run a WAL checkpoint (TRUNCATE mode) after an import session.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        self.with_writer(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(sql_err)
        })
    }

    /// Close every connection. Subsequent operations fail with `NotConnected`.
    pub fn close(&self) -> Result<(), StorageError> {
        self.closed.store(true, Ordering::Release);
        self.readers.close();
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| StorageError::query("write lock poisoned"))?;
        if let Some(conn) = guard.take() {
            pragmas::optimize_on_close(&conn)?;
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    /// Get the database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
