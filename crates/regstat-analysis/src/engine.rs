//! `Engine`: the composition root.
//!
//! Owns the store handle and wires it, with the cache layer, into the
//! regularization manager and the query engine. Every mutation runs on the
//! write worker and advances the data version exactly once when it
//! completes; reads run on the caller's thread.

use std::sync::Arc;

use rayon::prelude::*;
use regstat_core::config::RegstatConfig;
use regstat_core::errors::{EngineError, StorageError};
use regstat_core::traits::{RawRow, RowDecoder, StandardRowDecoder};
use regstat_core::types::{
    Dimension, DimensionId, DimensionOption, EntityType, FilterConfiguration,
    FilteredDataSeries, YearConfiguration,
};
use regstat_storage::queries::filter_options;
use regstat_storage::queries::geography::{self, GeoEntityType, GeographicEntity};
use regstat_storage::queries::import_log::{self, ImportLogEntry};
use regstat_storage::queries::statistics::{self, DatabaseStatistics};
use regstat_storage::{
    DatabaseManager, ImportOutcome, ImportPipeline, ImportSession, Pending, SessionSummary,
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheLayer, OptionKey, RefreshOutcome};
use crate::query::QueryEngine;
use crate::regularization::{
    CanonicalHierarchy, MappingRequest, RegularizationManager, RegularizationMapping,
    RegularizationStatistics, UncuratedPair,
};
use crate::store::Store;

/// One source file of an import session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFile {
    pub file_name: String,
    pub year: i64,
    pub entity: EntityType,
    pub rows: Vec<RawRow>,
}

pub struct Engine {
    store: Arc<Store>,
    cache: Arc<CacheLayer>,
    regularization: Arc<RegularizationManager>,
    queries: QueryEngine,
    pipeline: ImportPipeline,
    index_rebuild_threshold: u64,
    decoder: Arc<dyn RowDecoder>,
}

impl Engine {
    /// Open the store described by `config`; in-memory when no database
    /// path is configured. Installing a subscriber is left to the host.
    pub fn open(config: &RegstatConfig) -> Result<Self, EngineError> {
        RegstatConfig::validate(config)?;
        let years = config.years.to_year_configuration()?;

        let db = match &config.storage.database_path {
            Some(path) => {
                DatabaseManager::open(path, config.storage.effective_read_pool_size())?
            }
            None => DatabaseManager::open_in_memory()?,
        };
        let store = Arc::new(Store::new(Arc::new(db))?);
        let cache = Arc::new(CacheLayer::new(
            config.query.effective_result_cache_capacity(),
        ));
        let regularization = Arc::new(RegularizationManager::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            years,
        ));
        let queries = QueryEngine::new(
            Arc::clone(&store),
            Arc::clone(&regularization),
            Arc::clone(&cache),
            config.query.effective_regularization_enabled(),
        );

        tracing::info!(
            path = ?config.storage.database_path,
            "engine opened"
        );
        Ok(Self {
            store,
            cache,
            regularization,
            queries,
            pipeline: ImportPipeline::new(config.import.effective_relax_durability()),
            index_rebuild_threshold: config.import.effective_index_rebuild_threshold(),
            decoder: Arc::new(StandardRowDecoder),
        })
    }

    pub fn open_in_memory() -> Result<Self, EngineError> {
        Self::open(&RegstatConfig::default())
    }

    /// Replace the row decoder used by every subsequent import.
    pub fn with_decoder(mut self, decoder: Arc<dyn RowDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn data_version(&self) -> u64 {
        self.cache.version.current()
    }

    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    // ═══════════════════════════════════════════════════════════════════
    // Import
    // ═══════════════════════════════════════════════════════════════════

    /// Import one batch outside of a session. Indexes are left as they are.
    pub fn import_batch(
        &self,
        rows: Vec<RawRow>,
        year: i64,
        entity: EntityType,
    ) -> Result<ImportOutcome, EngineError> {
        let pipeline = self.pipeline;
        let decoder = Arc::clone(&self.decoder);
        let outcome = self
            .store
            .submit(move |db| pipeline.import_batch(db, &rows, year, entity, decoder.as_ref()))
            .map_err(|_| EngineError::WorkerUnavailable)?
            .wait()
            .map_err(|_| EngineError::WorkerUnavailable)??;
        self.cache.invalidate_facts();
        Ok(outcome)
    }

    /// Queue a whole import session on the writer. The index strategy is
    /// picked from the fact rows already stored plus the incoming rows. The
    /// data version advances once the session has run, whether or not every
    /// file succeeded, since earlier files stay committed.
    pub fn submit_import_session(
        &self,
        files: Vec<ImportFile>,
    ) -> Result<Pending<Result<SessionSummary, StorageError>>, EngineError> {
        let pipeline = self.pipeline;
        let threshold = self.index_rebuild_threshold;
        let decoder = Arc::clone(&self.decoder);
        let cache = Arc::clone(&self.cache);

        self.store
            .submit(move |db| {
                let result = run_session(db, pipeline, threshold, decoder.as_ref(), &files);
                cache.invalidate_facts();
                result
            })
            .map_err(|_| EngineError::WorkerUnavailable)
    }

    pub fn import_session(&self, files: Vec<ImportFile>) -> Result<SessionSummary, EngineError> {
        let summary = self
            .submit_import_session(files)?
            .wait()
            .map_err(|_| EngineError::WorkerUnavailable)??;
        Ok(summary)
    }

    /// Upsert geographic reference rows.
    pub fn insert_geographic_entities(
        &self,
        entities: Vec<GeographicEntity>,
    ) -> Result<usize, EngineError> {
        let written = self
            .store
            .write(move |conn| geography::insert_geographic_entities(conn, &entities))?;
        self.cache.invalidate();
        Ok(written)
    }

    pub fn geographic_entities(
        &self,
        entity_type: GeoEntityType,
    ) -> Result<Vec<GeographicEntity>, EngineError> {
        Ok(self
            .store
            .read(|conn| geography::list_geographic_entities(conn, entity_type))?)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Queries & filter options
    // ═══════════════════════════════════════════════════════════════════

    pub fn execute(&self, config: &FilterConfiguration) -> Result<FilteredDataSeries, EngineError> {
        Ok(self.queries.execute(config)?)
    }

    /// Execute independent configurations concurrently; results keep the
    /// input order.
    pub fn execute_all(
        &self,
        configs: &[FilterConfiguration],
    ) -> Vec<Result<FilteredDataSeries, EngineError>> {
        configs.par_iter().map(|c| self.execute(c)).collect()
    }

    pub fn dimension_options(
        &self,
        dimension: Dimension,
    ) -> Result<Arc<Vec<DimensionOption>>, EngineError> {
        let version = self.cache.version.current();
        Ok(self
            .cache
            .options
            .options_with(version, OptionKey::Dimension(dimension), || {
                self.store
                    .read(|conn| filter_options::dimension_options(conn, dimension))
            })?)
    }

    pub fn models_for_make(
        &self,
        make_id: DimensionId,
    ) -> Result<Arc<Vec<DimensionOption>>, EngineError> {
        let version = self.cache.version.current();
        Ok(self
            .cache
            .options
            .options_with(version, OptionKey::ModelsOf(make_id), || {
                self.store
                    .read(|conn| filter_options::models_for_make(conn, make_id))
            })?)
    }

    /// Distinct fact years of one entity.
    pub fn available_years(&self, entity: EntityType) -> Result<Arc<Vec<i64>>, EngineError> {
        let version = self.cache.version.current();
        Ok(self.cache.options.years_with(version, entity, || {
            self.store
                .read(|conn| filter_options::fact_years(conn, entity))
        })?)
    }

    pub fn set_regularization_enabled(&self, enabled: bool) {
        self.queries.set_regularization_enabled(enabled);
        self.cache.invalidate();
    }

    pub fn regularization_enabled(&self) -> bool {
        self.queries.regularization_enabled()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Regularization
    // ═══════════════════════════════════════════════════════════════════

    pub fn year_configuration(&self) -> YearConfiguration {
        self.regularization.year_configuration()
    }

    pub fn set_year_configuration(&self, years: YearConfiguration) {
        self.regularization.set_year_configuration(years);
    }

    pub fn find_uncurated_pairs(&self) -> Result<Vec<UncuratedPair>, EngineError> {
        Ok(self.regularization.find_uncurated_pairs()?)
    }

    pub fn canonical_hierarchy(
        &self,
        force_refresh: bool,
    ) -> Result<Arc<CanonicalHierarchy>, EngineError> {
        Ok(self.regularization.canonical_hierarchy(force_refresh)?)
    }

    pub fn save_mapping(&self, request: MappingRequest) -> Result<i64, EngineError> {
        Ok(self.regularization.save_mapping(request)?)
    }

    pub fn delete_mapping(&self, id: i64) -> Result<(), EngineError> {
        Ok(self.regularization.delete_mapping(id)?)
    }

    pub fn all_mappings(&self) -> Result<Vec<RegularizationMapping>, EngineError> {
        Ok(self.regularization.all_mappings()?)
    }

    pub fn regularization_statistics(&self) -> Result<RegularizationStatistics, EngineError> {
        Ok(self.regularization.statistics()?)
    }

    pub fn expand_make_model_ids(
        &self,
        make_ids: &[DimensionId],
        model_ids: &[DimensionId],
    ) -> Result<(Vec<DimensionId>, Vec<DimensionId>), EngineError> {
        let (makes, models) = self.regularization.expand_make_model_ids(
            &make_ids.iter().copied().collect(),
            &model_ids.iter().copied().collect(),
        )?;
        Ok((makes.into_iter().collect(), models.into_iter().collect()))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statistics, log, caches
    // ═══════════════════════════════════════════════════════════════════

    pub fn database_statistics(&self) -> Result<DatabaseStatistics, EngineError> {
        Ok(self.store.read(statistics::database_statistics)?)
    }

    /// Most recent import log entries first.
    pub fn import_log(&self, limit: usize) -> Result<Vec<ImportLogEntry>, EngineError> {
        Ok(self
            .store
            .read(|conn| import_log::recent_entries(conn, limit))?)
    }

    /// Advance the data version and drop every cached value.
    pub fn invalidate_caches(&self) -> u64 {
        self.regularization.clear_hierarchy();
        self.cache.invalidate()
    }

    /// Rebuild every derived cache. A request arriving while another
    /// refresh runs is dropped; the running one serves it.
    pub fn refresh_caches(&self) -> Result<RefreshOutcome, EngineError> {
        let Some(_guard) = self.cache.begin_refresh() else {
            tracing::info!("cache refresh already running, request skipped");
            return Ok(RefreshOutcome::Skipped);
        };
        let started = std::time::Instant::now();
        let version = self.invalidate_caches();
        tracing::info!(version, "cache refresh started");

        if !self.year_configuration().curated().is_empty() {
            self.canonical_hierarchy(true)?;
        }
        for dimension in Dimension::ALL {
            self.dimension_options(dimension)?;
        }
        for entity in [EntityType::Vehicle, EntityType::License] {
            self.available_years(entity)?;
        }

        tracing::info!(
            version,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cache refresh finished"
        );
        Ok(RefreshOutcome::Completed)
    }

    /// Close every connection. Later operations fail with `NotConnected`.
    pub fn close(&self) -> Result<(), EngineError> {
        self.store.close()?;
        tracing::info!("engine closed");
        Ok(())
    }
}

fn run_session(
    db: &DatabaseManager,
    pipeline: ImportPipeline,
    threshold: u64,
    decoder: &dyn RowDecoder,
    files: &[ImportFile],
) -> Result<SessionSummary, StorageError> {
    let existing = db.with_writer(|conn| {
        Ok(statistics::row_count(conn, EntityType::Vehicle)?
            + statistics::row_count(conn, EntityType::License)?)
    })?;
    let incoming: u64 = files.iter().map(|f| f.rows.len() as u64).sum();

    let mut session = ImportSession::begin(db, pipeline, existing + incoming, threshold)?;
    for file in files {
        session.import_file(&file.file_name, &file.rows, file.year, file.entity, decoder)?;
    }
    session.finish()
}
