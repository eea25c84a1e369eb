//! Schema migrations using PRAGMA user_version.

pub mod v001_initial;
pub mod v002_classification_split;
pub mod v003_regularization;

use regstat_core::errors::StorageError;
use rusqlite::Connection;

use crate::indexes;

/// Latest schema version.
pub const LATEST_VERSION: u32 = 3;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            message: e.to_string(),
        })?;

    let migrations: &[(&str, u32)] = &[
        (v001_initial::MIGRATION_SQL, 1),
        (v002_classification_split::MIGRATION_SQL, 2),
        (v003_regularization::MIGRATION_SQL, 3),
    ];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;

            // v002 leaves the fact tables in their final shape; index them.
            if *version == 2 {
                indexes::create_secondary_indexes(conn).map_err(|e| {
                    StorageError::MigrationFailed {
                        version: *version,
                        message: e.to_string(),
                    }
                })?;
            }

            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(crate::sql_err)
}
