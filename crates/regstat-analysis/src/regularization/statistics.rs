//! Mapping coverage of the uncurated population.

use regstat_core::errors::StorageError;
use rusqlite::{params_from_iter, Connection};
use serde::{Deserialize, Serialize};

use super::pairs::{share, uncurated_total};
use crate::query::builder::placeholders;
use crate::sql_err;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularizationStatistics {
    pub mapping_count: u64,
    /// Uncurated-year rows whose pair has a mapping.
    pub covered_records: u64,
    pub total_uncurated_records: u64,
}

impl RegularizationStatistics {
    pub fn coverage_percentage(&self) -> f64 {
        share(self.covered_records, self.total_uncurated_records)
    }
}

/// Counted live against the fact table, so rows imported after a mapping
/// was saved are included.
pub fn regularization_statistics(
    conn: &Connection,
    uncurated: &[i64],
) -> Result<RegularizationStatistics, StorageError> {
    let mapping_count = conn
        .query_row("SELECT COUNT(*) FROM regularization_mapping", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(sql_err)? as u64;

    let covered_records = if uncurated.is_empty() {
        0
    } else {
        let sql = format!(
            "SELECT COUNT(*) FROM vehicles v
             JOIN regularization_mapping m
               ON m.uncurated_make_id = v.make_id AND m.uncurated_model_id = v.model_id
             WHERE v.year IN ({})",
            placeholders(uncurated.len())
        );
        conn.query_row(&sql, params_from_iter(uncurated), |row| row.get::<_, i64>(0))
            .map_err(sql_err)? as u64
    };

    Ok(RegularizationStatistics {
        mapping_count,
        covered_records,
        total_uncurated_records: uncurated_total(conn, uncurated)?,
    })
}
