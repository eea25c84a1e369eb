//! Cache & versioning layer.
//!
//! One monotonic [`DataVersion`] drives every derived cache: filter-option
//! lists, executed series, and the canonical hierarchy all record the
//! version they were computed at and recompute once it has moved. Values
//! derived from fact rows alone (the canonical hierarchy) follow the
//! narrower `facts` version, which only imports advance. Full refreshes are
//! single-flight through [`RefreshGuard`].

pub mod filter_options;
pub mod refresh;
pub mod results;
pub mod version;

use std::sync::atomic::AtomicBool;

pub use filter_options::{FilterOptionCache, OptionKey};
pub use refresh::{RefreshGuard, RefreshOutcome};
pub use results::ResultCache;
pub use version::DataVersion;

pub struct CacheLayer {
    pub version: DataVersion,
    /// Advances only when fact rows change.
    pub facts: DataVersion,
    pub options: FilterOptionCache,
    pub results: ResultCache,
    refreshing: AtomicBool,
}

impl CacheLayer {
    pub fn new(result_capacity: u64) -> Self {
        Self {
            version: DataVersion::new(),
            facts: DataVersion::new(),
            options: FilterOptionCache::new(),
            results: ResultCache::new(result_capacity),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Claim the refresh flag.
    pub fn begin_refresh(&self) -> Option<RefreshGuard<'_>> {
        RefreshGuard::try_acquire(&self.refreshing)
    }

    /// Advance the version and drop every cached entry.
    pub fn invalidate(&self) -> u64 {
        let version = self.version.bump();
        self.options.clear();
        self.results.clear();
        version
    }

    /// `invalidate` after fact rows were written.
    pub fn invalidate_facts(&self) -> u64 {
        self.facts.bump();
        self.invalidate()
    }
}
