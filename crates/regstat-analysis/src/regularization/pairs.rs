//! Uncurated (make, model) pairs with no exact curated counterpart.

use regstat_core::errors::StorageError;
use regstat_core::types::DimensionId;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use serde::{Deserialize, Serialize};

use crate::query::builder::placeholders;
use crate::sql_err;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncuratedPair {
    pub make_id: DimensionId,
    pub make_name: String,
    pub model_id: DimensionId,
    pub model_name: String,
    pub record_count: u64,
    /// Share of all uncurated-year vehicle rows.
    pub percentage: f64,
    pub earliest_year: i64,
    pub latest_year: i64,
}

/// Pairs seen in `uncurated` years that never occur in `curated` years,
/// largest first.
pub fn find_uncurated_pairs(
    conn: &Connection,
    curated: &[i64],
    uncurated: &[i64],
) -> Result<Vec<UncuratedPair>, StorageError> {
    let total = uncurated_total(conn, uncurated)?;

    let sql = format!(
        "SELECT u.make_id, mk.name, u.model_id, md.name, u.n, u.first_year, u.last_year
         FROM (SELECT make_id, model_id, COUNT(*) AS n,
                      MIN(year) AS first_year, MAX(year) AS last_year
               FROM vehicles
               WHERE year IN ({uncurated_ph})
                 AND make_id IS NOT NULL AND model_id IS NOT NULL
               GROUP BY make_id, model_id) u
         LEFT JOIN (SELECT DISTINCT make_id, model_id
                    FROM vehicles
                    WHERE year IN ({curated_ph})
                      AND make_id IS NOT NULL AND model_id IS NOT NULL) c
           ON c.make_id = u.make_id AND c.model_id = u.model_id
         JOIN make_enum mk ON mk.id = u.make_id
         JOIN model_enum md ON md.id = u.model_id
         WHERE c.make_id IS NULL
         ORDER BY u.n DESC, mk.name, md.name",
        uncurated_ph = placeholders(uncurated.len()),
        curated_ph = placeholders(curated.len()),
    );
    let params = uncurated.iter().chain(curated).map(|y| Value::Integer(*y));

    let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
    let rows = stmt
        .query_map(params_from_iter(params), |row| {
            let record_count = row.get::<_, i64>(4)? as u64;
            Ok(UncuratedPair {
                make_id: row.get(0)?,
                make_name: row.get(1)?,
                model_id: row.get(2)?,
                model_name: row.get(3)?,
                record_count,
                percentage: share(record_count, total),
                earliest_year: row.get(5)?,
                latest_year: row.get(6)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Vehicle rows across `years`.
pub fn uncurated_total(conn: &Connection, years: &[i64]) -> Result<u64, StorageError> {
    if years.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "SELECT COUNT(*) FROM vehicles WHERE year IN ({})",
        placeholders(years.len())
    );
    conn.query_row(&sql, params_from_iter(years), |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
        .map_err(sql_err)
}

pub(crate) fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
