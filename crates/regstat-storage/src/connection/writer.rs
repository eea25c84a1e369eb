//! Write connection utilities: explicit-lock transactions.

use regstat_core::errors::StorageError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Lock acquisition mode for a write transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Reserve the write lock at BEGIN; readers continue.
    Immediate,
    /// Exclusive access for the whole transaction.
    Exclusive,
}

impl From<LockMode> for TransactionBehavior {
    fn from(mode: LockMode) -> Self {
        match mode {
            LockMode::Immediate => TransactionBehavior::Immediate,
            LockMode::Exclusive => TransactionBehavior::Exclusive,
        }
    }
}

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    with_transaction(conn, LockMode::Immediate, f)
}

/// Execute a write operation inside a transaction opened with `mode`.
/// Commits when `f` succeeds; rolls back (on drop) otherwise.
pub fn with_transaction<F, T>(conn: &Connection, mode: LockMode, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    // new_unchecked: the caller holds the only handle to the writer, so no
    // nested transaction can be open on it.
    let tx = Transaction::new_unchecked(conn, mode.into())
        .map_err(|e| StorageError::query(format!("failed to begin transaction: {e}")))?;

    let result = f(&tx)?;

    tx.commit()
        .map_err(|e| StorageError::query(format!("failed to commit: {e}")))?;

    Ok(result)
}
