//! Import pipeline configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImportConfig {
    /// Fact-row count at or above which secondary indexes are kept during an
    /// import session. Default: 10,000,000.
    pub index_rebuild_threshold: Option<u64>,
    /// Relax synchronous/journal settings while a batch loads. Default: true.
    pub relax_durability: Option<bool>,
}

impl ImportConfig {
    pub fn effective_index_rebuild_threshold(&self) -> u64 {
        self.index_rebuild_threshold.unwrap_or(10_000_000)
    }

    pub fn effective_relax_durability(&self) -> bool {
        self.relax_durability.unwrap_or(true)
    }
}
