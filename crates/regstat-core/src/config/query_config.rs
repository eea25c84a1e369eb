//! Query engine configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum cached series. 0 disables the result cache. Default: 256.
    pub result_cache_capacity: Option<u64>,
    /// Expand canonical make/model filters through regularization mappings.
    /// Default: true.
    pub regularization_enabled: Option<bool>,
}

impl QueryConfig {
    pub fn effective_result_cache_capacity(&self) -> u64 {
        self.result_cache_capacity.unwrap_or(256)
    }

    pub fn effective_regularization_enabled(&self) -> bool {
        self.regularization_enabled.unwrap_or(true)
    }
}
