//! Make/model regularization.
//!
//! Newer (uncurated) years carry make and model spellings that were never
//! reconciled against the curated coding. This subsystem surfaces those
//! pairs, builds the canonical hierarchy reviewers pick from, stores their
//! mappings, and expands canonical make/model filters with every mapped
//! variant.

pub mod expansion;
pub mod hierarchy;
pub mod mappings;
pub mod pairs;
pub mod statistics;

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, RwLock};

use regstat_core::errors::{RegularizationError, StorageError};
use regstat_core::types::{DimensionId, YearConfiguration};

pub use hierarchy::{CanonicalHierarchy, CanonicalMake, CanonicalModel, FuelTypeInfo, VehicleTypeInfo};
pub use mappings::{MappingRequest, RegularizationMapping};
pub use pairs::UncuratedPair;
pub use statistics::RegularizationStatistics;

use crate::cache::CacheLayer;
use crate::store::Store;

type CachedHierarchy = Option<(u64, Arc<CanonicalHierarchy>)>;

pub struct RegularizationManager {
    store: Arc<Store>,
    cache: Arc<CacheLayer>,
    years: RwLock<YearConfiguration>,
    hierarchy: Mutex<CachedHierarchy>,
}

impl RegularizationManager {
    pub fn new(store: Arc<Store>, cache: Arc<CacheLayer>, years: YearConfiguration) -> Self {
        Self {
            store,
            cache,
            years: RwLock::new(years),
            hierarchy: Mutex::new(None),
        }
    }

    pub fn year_configuration(&self) -> YearConfiguration {
        match self.years.read() {
            Ok(years) => years.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the curated/uncurated split. Derived caches are dropped and
    /// the data version advances.
    pub fn set_year_configuration(&self, years: YearConfiguration) {
        tracing::info!(
            curated = ?years.curated(),
            uncurated = ?years.uncurated(),
            "year configuration changed"
        );
        match self.years.write() {
            Ok(mut guard) => *guard = years,
            Err(poisoned) => *poisoned.into_inner() = years,
        }
        self.clear_hierarchy();
        self.cache.invalidate();
    }

    pub fn find_uncurated_pairs(&self) -> Result<Vec<UncuratedPair>, RegularizationError> {
        let years = self.year_configuration();
        let curated = years.require_curated()?;
        let uncurated = years.require_uncurated()?;
        let pairs = self
            .store
            .read(|conn| pairs::find_uncurated_pairs(conn, &curated, &uncurated))?;
        tracing::debug!(pairs = pairs.len(), "uncurated pairs found");
        Ok(pairs)
    }

    /// The canonical hierarchy, recomputed when forced, when fact rows
    /// changed since it was built, or when none is cached. Mapping edits
    /// leave it valid.
    pub fn canonical_hierarchy(
        &self,
        force_refresh: bool,
    ) -> Result<Arc<CanonicalHierarchy>, RegularizationError> {
        let curated = self.year_configuration().require_curated()?;
        let version = self.cache.facts.current();

        let mut cached = self
            .hierarchy
            .lock()
            .map_err(|_| StorageError::query("hierarchy lock poisoned"))?;
        if !force_refresh {
            if let Some((built_at, hierarchy)) = cached.as_ref() {
                if *built_at == version {
                    return Ok(Arc::clone(hierarchy));
                }
            }
        }

        let rows = self
            .store
            .write(move |conn| hierarchy::materialize(conn, &curated))?;
        let built = Arc::new(self.store.read(hierarchy::load)?);
        tracing::info!(
            tuples = rows,
            makes = built.makes.len(),
            models = built.model_count(),
            "canonical hierarchy rebuilt"
        );
        *cached = Some((version, Arc::clone(&built)));
        Ok(built)
    }

    pub fn save_mapping(&self, request: MappingRequest) -> Result<i64, RegularizationError> {
        let uncurated = self.year_configuration().require_uncurated()?;
        let id = self
            .store
            .write(move |conn| mappings::save_mapping(conn, &uncurated, &request))?;
        tracing::info!(
            id,
            uncurated_make = request.uncurated_make_id,
            uncurated_model = request.uncurated_model_id,
            canonical_make = request.canonical_make_id,
            canonical_model = request.canonical_model_id,
            "regularization mapping saved"
        );
        self.cache.invalidate();
        Ok(id)
    }

    pub fn delete_mapping(&self, id: i64) -> Result<(), RegularizationError> {
        let deleted = self
            .store
            .write(move |conn| mappings::delete_mapping(conn, id))?;
        if !deleted {
            return Err(RegularizationError::MappingNotFound { id });
        }
        tracing::info!(id, "regularization mapping deleted");
        self.cache.invalidate();
        Ok(())
    }

    pub fn all_mappings(&self) -> Result<Vec<RegularizationMapping>, RegularizationError> {
        Ok(self.store.read(mappings::all_mappings)?)
    }

    pub fn statistics(&self) -> Result<RegularizationStatistics, RegularizationError> {
        let uncurated: Vec<i64> = self.year_configuration().uncurated().iter().copied().collect();
        Ok(self
            .store
            .read(|conn| statistics::regularization_statistics(conn, &uncurated))?)
    }

    /// `(makes, models)` widened with every mapped uncurated variant.
    pub fn expand_make_model_ids(
        &self,
        makes: &BTreeSet<DimensionId>,
        models: &BTreeSet<DimensionId>,
    ) -> Result<(BTreeSet<DimensionId>, BTreeSet<DimensionId>), StorageError> {
        if makes.is_empty() && models.is_empty() {
            return Ok((BTreeSet::new(), BTreeSet::new()));
        }
        let pairs = self.store.read(expansion::load_pairs)?;
        Ok(expansion::expand(&pairs, makes, models))
    }

    /// Uncurated `(make, model)` pairs mapped onto the selected canonical
    /// makes and models.
    pub fn mapped_variants(
        &self,
        makes: &BTreeSet<DimensionId>,
        models: &BTreeSet<DimensionId>,
    ) -> Result<BTreeSet<(DimensionId, DimensionId)>, StorageError> {
        if makes.is_empty() && models.is_empty() {
            return Ok(BTreeSet::new());
        }
        let pairs = self.store.read(expansion::load_pairs)?;
        Ok(expansion::mapped_variants(&pairs, makes, models))
    }

    pub(crate) fn clear_hierarchy(&self) {
        match self.hierarchy.lock() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}
