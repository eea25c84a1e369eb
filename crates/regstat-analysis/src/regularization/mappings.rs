//! Reviewer-confirmed uncurated → canonical (make, model) equivalences.

use regstat_core::errors::StorageError;
use regstat_core::types::DimensionId;
use regstat_storage::connection::writer::with_immediate_transaction;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use serde::{Deserialize, Serialize};

use super::pairs::share;
use crate::query::builder::placeholders;
use crate::sql_err;

/// One mapping to save. Fuel and vehicle type narrow the canonical side
/// when the reviewer picked them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRequest {
    pub uncurated_make_id: DimensionId,
    pub uncurated_model_id: DimensionId,
    pub canonical_make_id: DimensionId,
    pub canonical_model_id: DimensionId,
    pub fuel_type_id: Option<DimensionId>,
    pub vehicle_type_id: Option<DimensionId>,
}

impl MappingRequest {
    pub fn new(
        uncurated: (DimensionId, DimensionId),
        canonical: (DimensionId, DimensionId),
    ) -> Self {
        Self {
            uncurated_make_id: uncurated.0,
            uncurated_model_id: uncurated.1,
            canonical_make_id: canonical.0,
            canonical_model_id: canonical.1,
            fuel_type_id: None,
            vehicle_type_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularizationMapping {
    pub id: i64,
    pub uncurated_make_id: DimensionId,
    pub uncurated_make_name: String,
    pub uncurated_model_id: DimensionId,
    pub uncurated_model_name: String,
    pub canonical_make_id: DimensionId,
    pub canonical_make_name: String,
    pub canonical_model_id: DimensionId,
    pub canonical_model_name: String,
    pub fuel_type_id: Option<DimensionId>,
    pub vehicle_type_id: Option<DimensionId>,
    pub record_count: u64,
    /// Share of all mapped records.
    pub percentage: f64,
    pub year_range_start: Option<i64>,
    pub year_range_end: Option<i64>,
    /// Unix seconds of the last save.
    pub created_at: i64,
}

/// Upsert keyed by the uncurated pair; the last save wins. Record count
/// and year range are taken from the pair's rows in `uncurated` years.
pub fn save_mapping(
    conn: &Connection,
    uncurated: &[i64],
    req: &MappingRequest,
) -> Result<i64, StorageError> {
    with_immediate_transaction(conn, |tx| {
        let sql = format!(
            "SELECT COUNT(*), MIN(year), MAX(year) FROM vehicles
             WHERE make_id = ? AND model_id = ? AND year IN ({})",
            placeholders(uncurated.len())
        );
        let mut params = vec![
            Value::Integer(req.uncurated_make_id),
            Value::Integer(req.uncurated_model_id),
        ];
        params.extend(uncurated.iter().map(|y| Value::Integer(*y)));
        let (count, first, last): (i64, Option<i64>, Option<i64>) = tx
            .query_row(&sql, params_from_iter(params), |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(sql_err)?;

        tx.query_row(
            "INSERT INTO regularization_mapping
                 (uncurated_make_id, uncurated_model_id, canonical_make_id, canonical_model_id,
                  fuel_type_id, vehicle_type_id, record_count, year_range_start, year_range_end)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(uncurated_make_id, uncurated_model_id) DO UPDATE SET
                 canonical_make_id = excluded.canonical_make_id,
                 canonical_model_id = excluded.canonical_model_id,
                 fuel_type_id = excluded.fuel_type_id,
                 vehicle_type_id = excluded.vehicle_type_id,
                 record_count = excluded.record_count,
                 year_range_start = excluded.year_range_start,
                 year_range_end = excluded.year_range_end,
                 created_at = unixepoch()
             RETURNING id",
            params![
                req.uncurated_make_id,
                req.uncurated_model_id,
                req.canonical_make_id,
                req.canonical_model_id,
                req.fuel_type_id,
                req.vehicle_type_id,
                count,
                first,
                last,
            ],
            |row| row.get(0),
        )
        .map_err(sql_err)
    })
}

/// Delete by id; `false` when no such mapping exists.
pub fn delete_mapping(conn: &Connection, id: i64) -> Result<bool, StorageError> {
    conn.execute("DELETE FROM regularization_mapping WHERE id = ?1", params![id])
        .map(|n| n > 0)
        .map_err(sql_err)
}

/// Every mapping with resolved names, largest first.
pub fn all_mappings(conn: &Connection) -> Result<Vec<RegularizationMapping>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT m.id,
                    m.uncurated_make_id, um.name, m.uncurated_model_id, ud.name,
                    m.canonical_make_id, cm.name, m.canonical_model_id, cd.name,
                    m.fuel_type_id, m.vehicle_type_id, m.record_count,
                    m.year_range_start, m.year_range_end, m.created_at
             FROM regularization_mapping m
             JOIN make_enum um ON um.id = m.uncurated_make_id
             JOIN model_enum ud ON ud.id = m.uncurated_model_id
             JOIN make_enum cm ON cm.id = m.canonical_make_id
             JOIN model_enum cd ON cd.id = m.canonical_model_id
             ORDER BY m.record_count DESC, m.id",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RegularizationMapping {
                id: row.get(0)?,
                uncurated_make_id: row.get(1)?,
                uncurated_make_name: row.get(2)?,
                uncurated_model_id: row.get(3)?,
                uncurated_model_name: row.get(4)?,
                canonical_make_id: row.get(5)?,
                canonical_make_name: row.get(6)?,
                canonical_model_id: row.get(7)?,
                canonical_model_name: row.get(8)?,
                fuel_type_id: row.get(9)?,
                vehicle_type_id: row.get(10)?,
                record_count: row.get::<_, i64>(11)? as u64,
                percentage: 0.0,
                year_range_start: row.get(12)?,
                year_range_end: row.get(13)?,
                created_at: row.get(14)?,
            })
        })
        .map_err(sql_err)?;
    let mut mappings = rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)?;

    let total: u64 = mappings.iter().map(|m| m.record_count).sum();
    for m in &mut mappings {
        m.percentage = share(m.record_count, total);
    }
    Ok(mappings)
}
