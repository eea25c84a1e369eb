//! Executed series keyed by `(data version, configuration)`.

use std::sync::Arc;

use moka::sync::Cache;
use regstat_core::types::{FilterConfiguration, FilteredDataSeries};

type Key = (u64, FilterConfiguration);

/// Series cache. A capacity of zero disables it.
pub struct ResultCache {
    cache: Option<Cache<Key, Arc<FilteredDataSeries>>>,
}

impl ResultCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = (max_entries > 0).then(|| Cache::builder().max_capacity(max_entries).build());
        Self { cache }
    }

    pub fn get(&self, version: u64, config: &FilterConfiguration) -> Option<Arc<FilteredDataSeries>> {
        self.cache.as_ref()?.get(&(version, config.clone()))
    }

    pub fn insert(&self, version: u64, config: FilterConfiguration, series: Arc<FilteredDataSeries>) {
        if let Some(cache) = &self.cache {
            cache.insert((version, config), series);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}
