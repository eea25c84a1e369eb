//! Curated/uncurated year configuration as read from TOML.

use serde::{Deserialize, Serialize};

use crate::errors::RegularizationError;
use crate::types::YearConfiguration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct YearsConfig {
    pub curated: Vec<i64>,
    pub uncurated: Vec<i64>,
}

impl YearsConfig {
    pub fn to_year_configuration(&self) -> Result<YearConfiguration, RegularizationError> {
        YearConfiguration::new(self.curated.iter().copied(), self.uncurated.iter().copied())
    }
}
