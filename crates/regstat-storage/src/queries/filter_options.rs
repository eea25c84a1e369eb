//! Selectable values for filter pickers.

use regstat_core::errors::StorageError;
use regstat_core::types::{Dimension, DimensionId, DimensionOption, EntityType};
use rusqlite::{params, Connection};

use super::fact_table;
use crate::dimensions::tables::DimensionTable;
use crate::sql_err;

/// Every `(id, label)` of one dimension, in display order.
pub fn dimension_options(
    conn: &Connection,
    dimension: Dimension,
) -> Result<Vec<DimensionOption>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&DimensionTable::of(dimension).options_sql())
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DimensionOption {
                id: row.get(0)?,
                label: row.get(1)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Models of one make, by name.
pub fn models_for_make(
    conn: &Connection,
    make_id: DimensionId,
) -> Result<Vec<DimensionOption>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT id, name FROM model_enum WHERE make_id = ?1 ORDER BY name")
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![make_id], |row| {
            Ok(DimensionOption {
                id: row.get(0)?,
                label: row.get(1)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Distinct years present in the fact table, ascending.
pub fn fact_years(conn: &Connection, entity: EntityType) -> Result<Vec<i64>, StorageError> {
    let sql = format!("SELECT DISTINCT year FROM {} ORDER BY year", fact_table(entity));
    let mut stmt = conn.prepare_cached(&sql).map_err(sql_err)?;
    let rows = stmt.query_map([], |row| row.get(0)).map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
