//! Filter-option lists tagged with the data version they were read at.

use std::sync::Arc;

use moka::sync::Cache;
use regstat_core::errors::StorageError;
use regstat_core::types::{Dimension, DimensionId, DimensionOption, EntityType};

const MAX_ENTRIES: u64 = 1_024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Dimension(Dimension),
    ModelsOf(DimensionId),
}

pub struct FilterOptionCache {
    options: Cache<(u64, OptionKey), Arc<Vec<DimensionOption>>>,
    years: Cache<(u64, EntityType), Arc<Vec<i64>>>,
}

impl Default for FilterOptionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterOptionCache {
    pub fn new() -> Self {
        Self {
            options: Cache::builder().max_capacity(MAX_ENTRIES).build(),
            years: Cache::builder().max_capacity(MAX_ENTRIES).build(),
        }
    }

    /// Cached list for `key` at `version`, loading it on a miss.
    pub fn options_with<F>(
        &self,
        version: u64,
        key: OptionKey,
        load: F,
    ) -> Result<Arc<Vec<DimensionOption>>, StorageError>
    where
        F: FnOnce() -> Result<Vec<DimensionOption>, StorageError>,
    {
        if let Some(hit) = self.options.get(&(version, key)) {
            return Ok(hit);
        }
        let loaded = Arc::new(load()?);
        self.options.insert((version, key), Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn years_with<F>(
        &self,
        version: u64,
        entity: EntityType,
        load: F,
    ) -> Result<Arc<Vec<i64>>, StorageError>
    where
        F: FnOnce() -> Result<Vec<i64>, StorageError>,
    {
        if let Some(hit) = self.years.get(&(version, entity)) {
            return Ok(hit);
        }
        let loaded = Arc::new(load()?);
        self.years.insert((version, entity), Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn clear(&self) {
        self.options.invalidate_all();
        self.years.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn loads_once_per_version() {
        let cache = FilterOptionCache::new();
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok(vec![DimensionOption {
                id: 1,
                label: "HONDA".to_string(),
            }])
        };
        let key = OptionKey::Dimension(Dimension::Make);
        cache.options_with(1, key, load).unwrap();
        cache.options_with(1, key, load).unwrap();
        assert_eq!(calls.get(), 1);
        cache.options_with(2, key, load).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn load_errors_are_not_cached() {
        let cache = FilterOptionCache::new();
        let err = cache
            .years_with(0, EntityType::Vehicle, || Err(StorageError::NotConnected))
            .unwrap_err();
        assert_eq!(err, StorageError::NotConnected);
        let years = cache
            .years_with(0, EntityType::Vehicle, || Ok(vec![2022]))
            .unwrap();
        assert_eq!(*years, vec![2022]);
    }
}
