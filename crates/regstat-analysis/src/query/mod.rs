//! Query compiler & aggregation engine.
//!
//! A [`FilterConfiguration`] is prepared (curated-year limiting, mapped
//! make/model variants), compiled to one parameterized `GROUP BY year` statement, and
//! executed on a read connection. The percentage metric runs its numerator
//! and baseline concurrently and joins them by year.

pub mod builder;
pub mod compiler;
pub mod metrics;
pub mod naming;
pub mod percentage;
pub mod road_wear;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use regstat_core::errors::{QueryError, RegularizationError, StorageError};
use regstat_core::types::{
    DimensionId, EntityType, FilterConfiguration, FilteredDataSeries, Metric, TimeSeriesPoint,
};
use rusqlite::{params_from_iter, Connection};

pub use compiler::{compile, compile_with_variants, CompiledQuery};

use crate::cache::CacheLayer;
use crate::regularization::RegularizationManager;
use crate::sql_err;
use crate::store::Store;

pub struct QueryEngine {
    store: Arc<Store>,
    regularization: Arc<RegularizationManager>,
    cache: Arc<CacheLayer>,
    regularization_enabled: AtomicBool,
}

impl QueryEngine {
    pub fn new(
        store: Arc<Store>,
        regularization: Arc<RegularizationManager>,
        cache: Arc<CacheLayer>,
        regularization_enabled: bool,
    ) -> Self {
        Self {
            store,
            regularization,
            cache,
            regularization_enabled: AtomicBool::new(regularization_enabled),
        }
    }

    pub fn regularization_enabled(&self) -> bool {
        self.regularization_enabled.load(Ordering::Acquire)
    }

    pub fn set_regularization_enabled(&self, enabled: bool) {
        self.regularization_enabled.store(enabled, Ordering::Release);
    }

    /// Execute one configuration, served from the result cache when the
    /// data version has not moved.
    pub fn execute(&self, config: &FilterConfiguration) -> Result<FilteredDataSeries, QueryError> {
        let version = self.cache.version.current();
        if let Some(hit) = self.cache.results.get(version, config) {
            return Ok((*hit).clone());
        }

        let started = std::time::Instant::now();
        let points = match config.metric {
            Metric::Percentage => self.percentage(config)?,
            _ => self.run(config)?,
        };
        let series = FilteredDataSeries {
            name: config
                .series_name
                .clone()
                .unwrap_or_else(|| naming::generate_name(config)),
            configuration: config.clone(),
            points,
        };
        tracing::debug!(
            series = %series.name,
            points = series.points.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query executed"
        );

        self.cache
            .results
            .insert(version, config.clone(), Arc::new(series.clone()));
        Ok(series)
    }

    fn percentage(&self, config: &FilterConfiguration) -> Result<Vec<TimeSeriesPoint>, QueryError> {
        let numerator = count_of(config);
        let Some(baseline) = config.baseline.as_deref() else {
            let points = self.run(&numerator)?;
            return Ok(percentage::join(&points, None));
        };
        if baseline.entity != config.entity {
            return Err(QueryError::invalid(
                "percentage baseline must target the same entity as its numerator",
            ));
        }
        let baseline = count_of(baseline);

        let (num, base) = rayon::join(|| self.run(&numerator), || self.run(&baseline));
        let (num, base) = (num?, base?);
        Ok(percentage::join(&num, Some(base.as_slice())))
    }

    /// Prepare, compile and execute a single yearly aggregate.
    fn run(&self, config: &FilterConfiguration) -> Result<Vec<TimeSeriesPoint>, QueryError> {
        let Some((prepared, variants)) = self.prepare(config)? else {
            return Ok(Vec::new());
        };
        let query = compile_with_variants(&prepared, &variants)?;
        let mut points = self.store.read(|conn| execute_compiled(conn, &query))?;
        if query.normalize {
            road_wear::normalize(&mut points);
        }
        Ok(points)
    }

    /// Apply curated-year limiting and collect the uncurated variants mapped
    /// onto the make/model filter. `None` when the year filter leaves
    /// nothing to query.
    fn prepare(&self, config: &FilterConfiguration) -> Result<Option<Prepared>, QueryError> {
        let mut prepared = config.clone();

        if prepared.limit_to_curated_years {
            let years = self.regularization.year_configuration();
            let curated = years.curated();
            if curated.is_empty() {
                return Err(RegularizationError::NoCuratedYears.into());
            }
            prepared.years = if prepared.years.is_empty() {
                curated.clone()
            } else {
                prepared.years.intersection(curated).copied().collect()
            };
            if prepared.years.is_empty() {
                return Ok(None);
            }
        }

        let variants = if self.regularization_enabled() && prepared.entity == EntityType::Vehicle {
            self.regularization
                .mapped_variants(&prepared.makes, &prepared.models)?
                .into_iter()
                .collect()
        } else {
            Vec::new()
        };
        Ok(Some((prepared, variants)))
    }
}

type Prepared = (FilterConfiguration, Vec<(DimensionId, DimensionId)>);

/// The configuration as a plain row count, without a nested baseline.
fn count_of(config: &FilterConfiguration) -> FilterConfiguration {
    FilterConfiguration {
        metric: Metric::Count,
        baseline: None,
        ..config.clone()
    }
}

pub fn execute_compiled(
    conn: &Connection,
    query: &CompiledQuery,
) -> Result<Vec<TimeSeriesPoint>, StorageError> {
    let mut stmt = conn.prepare(&query.sql).map_err(sql_err)?;
    let rows = stmt
        .query_map(params_from_iter(&query.params), |row| {
            let value: Option<f64> = row.get(1)?;
            Ok(TimeSeriesPoint::new(row.get(0)?, value.unwrap_or(0.0)))
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
