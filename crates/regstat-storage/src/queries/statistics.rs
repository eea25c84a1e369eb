//! Row counts across the fact tables.

use std::collections::BTreeMap;

use regstat_core::errors::StorageError;
use regstat_core::types::EntityType;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::fact_table;
use crate::sql_err;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatistics {
    pub vehicle_rows: u64,
    pub license_rows: u64,
    pub vehicles_per_year: BTreeMap<i64, u64>,
    pub licenses_per_year: BTreeMap<i64, u64>,
}

pub fn database_statistics(conn: &Connection) -> Result<DatabaseStatistics, StorageError> {
    let vehicles_per_year = rows_per_year(conn, EntityType::Vehicle)?;
    let licenses_per_year = rows_per_year(conn, EntityType::License)?;
    Ok(DatabaseStatistics {
        vehicle_rows: vehicles_per_year.values().sum(),
        license_rows: licenses_per_year.values().sum(),
        vehicles_per_year,
        licenses_per_year,
    })
}

pub fn rows_per_year(
    conn: &Connection,
    entity: EntityType,
) -> Result<BTreeMap<i64, u64>, StorageError> {
    let sql = format!(
        "SELECT year, COUNT(*) FROM {} GROUP BY year ORDER BY year",
        fact_table(entity)
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)? as u64)))
        .map_err(sql_err)?;
    rows.collect::<Result<BTreeMap<_, _>, _>>().map_err(sql_err)
}

/// Total fact rows of one entity.
pub fn row_count(conn: &Connection, entity: EntityType) -> Result<u64, StorageError> {
    let sql = format!("SELECT COUNT(*) FROM {}", fact_table(entity));
    conn.query_row(&sql, [], |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
        .map_err(sql_err)
}
