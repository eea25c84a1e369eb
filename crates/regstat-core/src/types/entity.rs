//! Fact entity families.

use serde::{Deserialize, Serialize};

/// Which fact table a configuration, batch, or query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Vehicle,
    License,
}

impl EntityType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::License => "license",
        }
    }
}

impl Default for EntityType {
    fn default() -> Self {
        Self::Vehicle
    }
}
