//! ReadPool: round-robin read-only connections.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use regstat_core::errors::StorageError;
use rusqlite::Connection;

use super::pragmas::apply_read_pragmas;
use crate::sql_err;

const MAX_POOL_SIZE: usize = 8;

/// A pool of read-only SQLite connections with round-robin selection.
pub struct ReadPool {
    connections: Vec<Mutex<Option<Connection>>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open a pool of read-only connections to the given database path.
    pub fn open(path: &Path, pool_size: usize) -> Result<Self, StorageError> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(sql_err)?;
            apply_read_pragmas(&conn)?;
            connections.push(Mutex::new(Some(conn)));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// A pool with no connections; callers fall back to the writer.
    pub fn empty() -> Self {
        Self {
            connections: Vec::new(),
            next: AtomicUsize::new(0),
        }
    }

    /// Execute a closure with a read connection (round-robin).
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if self.connections.is_empty() {
            return Err(StorageError::NotConnected);
        }
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|_| StorageError::query("read pool lock poisoned"))?;
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(StorageError::NotConnected),
        }
    }

    /// Drop every connection.
    pub fn close(&self) {
        for slot in &self.connections {
            if let Ok(mut guard) = slot.lock() {
                guard.take();
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
