//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, 64MB page cache, 256MB mmap, 5s busy_timeout,
//! temp_store MEMORY. Bulk loads temporarily trade durability for speed.

use regstat_core::errors::StorageError;
use rusqlite::Connection;

/// Apply all performance and safety pragmas to a connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -64000;
        PRAGMA mmap_size = 268435456;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| StorageError::query(format!("failed to apply pragmas: {e}")))
}

/// Apply read-only pragmas to a read connection.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA cache_size = -64000;
        PRAGMA mmap_size = 268435456;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| StorageError::query(format!("failed to apply read pragmas: {e}")))
}

/// Disable synchronous commits and keep the journal in memory while a batch
/// loads. Returns whether the journal actually left WAL.
///
/// Leaving WAL needs exclusive access to the file; when another connection
/// holds it the journal stays in WAL and only `synchronous` is relaxed.
pub fn relax_for_bulk_load(conn: &Connection) -> Result<bool, StorageError> {
    conn.execute_batch("PRAGMA synchronous = OFF;")
        .map_err(|e| StorageError::import(format!("failed to relax durability: {e}")))?;
    match conn.pragma_update_and_check(None, "journal_mode", "MEMORY", |row| {
        row.get::<_, String>(0)
    }) {
        Ok(mode) if mode.eq_ignore_ascii_case("memory") => {
            tracing::debug!(journal_mode = %mode, "durability relaxed for bulk load");
            Ok(true)
        }
        Ok(mode) => {
            tracing::warn!(
                journal_mode = %mode,
                "journal mode unchanged; bulk load runs with synchronous = OFF only"
            );
            Ok(false)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "journal mode unchanged; bulk load runs with synchronous = OFF only"
            );
            Ok(false)
        }
    }
}

/// Undo `relax_for_bulk_load`.
pub fn restore_after_bulk_load(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        ",
    )
    .map_err(|e| StorageError::import(format!("failed to restore durability: {e}")))
}

/// Current `synchronous` level (0 = OFF, 1 = NORMAL, 2 = FULL).
pub fn synchronous_level(conn: &Connection) -> Result<i64, StorageError> {
    conn.pragma_query_value(None, "synchronous", |row| row.get(0))
        .map_err(crate::sql_err)
}

/// Run optimize pragmas on connection close.
pub fn optimize_on_close(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA analysis_limit = 400;
        PRAGMA optimize;
        ",
    )
    .map_err(|e| StorageError::query(format!("failed to optimize: {e}")))
}
