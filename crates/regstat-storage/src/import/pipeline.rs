//! Bulk batch loader.
//!
//! One batch = one EXCLUSIVE transaction. Dimension rows are materialized on
//! the fly; per-row failures are counted and logged, never propagated, and
//! the batch commits with the rows that succeeded.

use std::time::Instant;

use regstat_core::errors::StorageError;
use regstat_core::traits::{RawRow, RowDecoder};
use regstat_core::types::EntityType;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::{license, vehicle};
use crate::connection::pragmas::{relax_for_bulk_load, restore_after_bulk_load};
use crate::connection::writer::{with_transaction, LockMode};
use crate::connection::DatabaseManager;
use crate::dimensions::geo::GeoDirectory;
use crate::dimensions::DimensionStore;
use crate::queries::geography::GeoEntityType;

/// Per-batch counters. Errors are rows skipped, not batch failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success_count: u64,
    pub error_count: u64,
}

impl ImportOutcome {
    pub fn total(&self) -> u64 {
        self.success_count + self.error_count
    }
}

impl std::ops::AddAssign for ImportOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.success_count += rhs.success_count;
        self.error_count += rhs.error_count;
    }
}

/// State owned by exactly one running batch.
pub(crate) struct BatchContext {
    pub(crate) store: DimensionStore,
    pub(crate) municipalities: GeoDirectory,
}

impl BatchContext {
    fn load(conn: &Connection) -> Result<Self, StorageError> {
        Ok(Self {
            store: DimensionStore::load(conn)?,
            municipalities: GeoDirectory::load(conn, GeoEntityType::Municipality)?,
        })
    }
}

/// Transactional bulk loader for vehicle and license batches.
#[derive(Debug, Clone, Copy)]
pub struct ImportPipeline {
    relax_durability: bool,
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self {
            relax_durability: true,
        }
    }
}

impl ImportPipeline {
    pub fn new(relax_durability: bool) -> Self {
        Self { relax_durability }
    }

    /// Load one batch of rows for `year` through the writer connection.
    pub fn import_batch(
        &self,
        db: &DatabaseManager,
        rows: &[RawRow],
        year: i64,
        entity: EntityType,
        decoder: &dyn RowDecoder,
    ) -> Result<ImportOutcome, StorageError> {
        db.with_writer(|conn| self.import_on(conn, rows, year, entity, decoder))
    }

    /// Load one batch on an already-held writer connection.
    pub fn import_on(
        &self,
        conn: &Connection,
        rows: &[RawRow],
        year: i64,
        entity: EntityType,
        decoder: &dyn RowDecoder,
    ) -> Result<ImportOutcome, StorageError> {
        let started = Instant::now();
        tracing::info!(entity = entity.name(), year, rows = rows.len(), "import batch started");

        if self.relax_durability {
            relax_for_bulk_load(conn)?;
        }

        let result = with_transaction(conn, LockMode::Exclusive, |tx| {
            let mut ctx = BatchContext::load(tx)?;
            let mut outcome = ImportOutcome::default();
            for (index, row) in rows.iter().enumerate() {
                let inserted = match entity {
                    EntityType::Vehicle => vehicle::import_row(tx, &mut ctx, decoder, row, year),
                    EntityType::License => license::import_row(tx, &mut ctx, decoder, row, year),
                };
                match inserted {
                    Ok(()) => outcome.success_count += 1,
                    Err(e) => {
                        outcome.error_count += 1;
                        tracing::warn!(row = index, year, error = %e, "row skipped");
                    }
                }
            }
            tracing::debug!(new_dimension_rows = ctx.store.upserts(), "dimensions materialized");
            Ok(outcome)
        });

        // Restore regardless of how the transaction ended.
        if self.relax_durability {
            if let Err(e) = restore_after_bulk_load(conn) {
                if result.is_ok() {
                    return Err(e);
                }
                tracing::error!(error = %e, "failed to restore durability after failed batch");
            }
        }

        match &result {
            Ok(outcome) => tracing::info!(
                entity = entity.name(),
                year,
                success = outcome.success_count,
                errors = outcome.error_count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "import batch committed"
            ),
            Err(e) => tracing::error!(entity = entity.name(), year, error = %e, "import batch failed"),
        }
        result
    }
}
