//! import_log queries.

use regstat_core::errors::StorageError;
use regstat_core::types::EntityType;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::sql_err;

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_PARTIAL: &str = "completed_with_errors";
pub const STATUS_FAILED: &str = "failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLogEntry {
    pub id: i64,
    pub file_name: String,
    pub year: i64,
    pub entity: String,
    pub record_count: i64,
    /// Unix seconds.
    pub import_date: i64,
    pub status: String,
}

pub fn insert_entry(
    conn: &Connection,
    file_name: &str,
    year: i64,
    entity: EntityType,
    record_count: u64,
    status: &str,
) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO import_log (file_name, year, entity, record_count, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .map_err(sql_err)?
    .execute(params![file_name, year, entity.name(), record_count as i64, status])
    .map_err(sql_err)?;
    Ok(conn.last_insert_rowid())
}

/// Most recent entries first.
pub fn recent_entries(conn: &Connection, limit: usize) -> Result<Vec<ImportLogEntry>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, file_name, year, entity, record_count, import_date, status
             FROM import_log ORDER BY import_date DESC, id DESC LIMIT ?1",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(ImportLogEntry {
                id: row.get(0)?,
                file_name: row.get(1)?,
                year: row.get(2)?,
                entity: row.get(3)?,
                record_count: row.get(4)?,
                import_date: row.get(5)?,
                status: row.get(6)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
