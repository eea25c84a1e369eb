//! Import sessions: a sequence of batches bracketed by an index strategy.

use std::time::Instant;

use regstat_core::errors::StorageError;
use regstat_core::traits::{RawRow, RowDecoder};
use regstat_core::types::EntityType;
use serde::{Deserialize, Serialize};

use super::{ImportOutcome, ImportPipeline};
use crate::connection::DatabaseManager;
use crate::indexes;
use crate::queries::import_log;

/// How secondary indexes are handled around a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexStrategy {
    /// Drop before the first batch; rebuild and ANALYZE at the end.
    DropAndRebuild,
    /// Keep indexes in place; only ANALYZE at the end.
    KeepAndAnalyze,
}

impl IndexStrategy {
    /// Rebuilding is cheaper than maintaining indexes while inserting, up to
    /// `threshold` rows.
    pub fn for_row_count(expected_rows: u64, threshold: u64) -> Self {
        if expected_rows < threshold {
            Self::DropAndRebuild
        } else {
            Self::KeepAndAnalyze
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub strategy: IndexStrategy,
    pub files: usize,
    pub totals: ImportOutcome,
    pub elapsed_ms: u64,
}

/// Runs batches on the writer between a `begin` and a `finish`.
///
/// A session dropped without `finish` still restores the secondary indexes.
pub struct ImportSession<'a> {
    db: &'a DatabaseManager,
    pipeline: ImportPipeline,
    strategy: IndexStrategy,
    totals: ImportOutcome,
    files: usize,
    started: Instant,
    finished: bool,
}

impl<'a> ImportSession<'a> {
    pub fn begin(
        db: &'a DatabaseManager,
        pipeline: ImportPipeline,
        expected_rows: u64,
        rebuild_threshold: u64,
    ) -> Result<Self, StorageError> {
        let strategy = IndexStrategy::for_row_count(expected_rows, rebuild_threshold);
        tracing::info!(?strategy, expected_rows, rebuild_threshold, "import session started");
        if strategy == IndexStrategy::DropAndRebuild {
            db.with_writer(indexes::drop_secondary_indexes)?;
        }
        Ok(Self {
            db,
            pipeline,
            strategy,
            totals: ImportOutcome::default(),
            files: 0,
            started: Instant::now(),
            finished: false,
        })
    }

    pub fn strategy(&self) -> IndexStrategy {
        self.strategy
    }

    /// Import one source file as one batch and log it.
    pub fn import_file(
        &mut self,
        file_name: &str,
        rows: &[RawRow],
        year: i64,
        entity: EntityType,
        decoder: &dyn RowDecoder,
    ) -> Result<ImportOutcome, StorageError> {
        let result = self.pipeline.import_batch(self.db, rows, year, entity, decoder);
        let (status, record_count) = match &result {
            Ok(o) if o.error_count == 0 => (import_log::STATUS_COMPLETED, o.success_count),
            Ok(o) => (import_log::STATUS_PARTIAL, o.success_count),
            Err(_) => (import_log::STATUS_FAILED, 0),
        };
        self.db.with_writer(|conn| {
            import_log::insert_entry(conn, file_name, year, entity, record_count, status)
        })?;

        let outcome = result?;
        self.totals += outcome;
        self.files += 1;
        Ok(outcome)
    }

    /// Restore indexes per strategy and refresh planner statistics.
    pub fn finish(mut self) -> Result<SessionSummary, StorageError> {
        self.finished = true;
        let strategy = self.strategy;
        self.db.with_writer(|conn| {
            if strategy == IndexStrategy::DropAndRebuild {
                indexes::create_secondary_indexes(conn)?;
            }
            indexes::analyze(conn)
        })?;
        if self.db.path().is_some() {
            self.db.checkpoint()?;
        }

        let summary = SessionSummary {
            strategy,
            files: self.files,
            totals: self.totals,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            files = summary.files,
            success = summary.totals.success_count,
            errors = summary.totals.error_count,
            elapsed_ms = summary.elapsed_ms,
            "import session finished"
        );
        Ok(summary)
    }
}

impl Drop for ImportSession<'_> {
    fn drop(&mut self) {
        if self.finished || self.strategy != IndexStrategy::DropAndRebuild {
            return;
        }
        if let Err(e) = self.db.with_writer(indexes::create_secondary_indexes) {
            tracing::error!(error = %e, "failed to restore indexes for abandoned session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_picks_strategy() {
        assert_eq!(IndexStrategy::for_row_count(10, 100), IndexStrategy::DropAndRebuild);
        assert_eq!(IndexStrategy::for_row_count(100, 100), IndexStrategy::KeepAndAnalyze);
        assert_eq!(IndexStrategy::for_row_count(5_000, 100), IndexStrategy::KeepAndAnalyze);
    }
}
