//! Top-level regstat configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ImportConfig, QueryConfig, StorageConfig, YearsConfig};
use crate::errors::ConfigError;

const MIN_YEAR: i64 = 1900;
const MAX_YEAR: i64 = 2100;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`REGSTAT_*`)
/// 3. Project config (`regstat.toml` in the given root)
/// 4. User config (`~/.regstat/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegstatConfig {
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub years: YearsConfig,
    pub query: QueryConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<PathBuf>,
    pub read_pool_size: Option<usize>,
    pub index_rebuild_threshold: Option<u64>,
    pub curated_years: Option<Vec<i64>>,
    pub uncurated_years: Option<Vec<i64>>,
}

impl RegstatConfig {
    /// Load configuration with 4-layer resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join("regstat.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config)?;

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &RegstatConfig) -> Result<(), ConfigError> {
        if config.storage.read_pool_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "storage.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (field, years) in [
            ("years.curated", &config.years.curated),
            ("years.uncurated", &config.years.uncurated),
        ] {
            if let Some(bad) = years.iter().find(|y| !(MIN_YEAR..=MAX_YEAR).contains(*y)) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: format!("year {bad} outside {MIN_YEAR}..={MAX_YEAR}"),
                });
            }
        }
        config
            .years
            .to_year_configuration()
            .map_err(|e| ConfigError::ValidationFailed {
                field: "years".to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Returns the user config path: `~/.regstat/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".regstat").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut RegstatConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: RegstatConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it carries a value.
    fn merge(base: &mut RegstatConfig, other: &RegstatConfig) {
        if other.storage.database_path.is_some() {
            base.storage.database_path = other.storage.database_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }

        if other.import.index_rebuild_threshold.is_some() {
            base.import.index_rebuild_threshold = other.import.index_rebuild_threshold;
        }
        if other.import.relax_durability.is_some() {
            base.import.relax_durability = other.import.relax_durability;
        }

        if !other.years.curated.is_empty() {
            base.years.curated = other.years.curated.clone();
        }
        if !other.years.uncurated.is_empty() {
            base.years.uncurated = other.years.uncurated.clone();
        }

        if other.query.result_cache_capacity.is_some() {
            base.query.result_cache_capacity = other.query.result_cache_capacity;
        }
        if other.query.regularization_enabled.is_some() {
            base.query.regularization_enabled = other.query.regularization_enabled;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `REGSTAT_DATABASE_PATH`, `REGSTAT_CURATED_YEARS=2011,2012`, etc.
    fn apply_env_overrides(config: &mut RegstatConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("REGSTAT_DATABASE_PATH") {
            config.storage.database_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("REGSTAT_READ_POOL_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.storage.read_pool_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REGSTAT_INDEX_REBUILD_THRESHOLD") {
            if let Ok(v) = val.parse::<u64>() {
                config.import.index_rebuild_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REGSTAT_RESULT_CACHE_CAPACITY") {
            if let Ok(v) = val.parse::<u64>() {
                config.query.result_cache_capacity = Some(v);
            }
        }
        if let Ok(val) = std::env::var("REGSTAT_CURATED_YEARS") {
            config.years.curated = parse_year_list("REGSTAT_CURATED_YEARS", &val)?;
        }
        if let Ok(val) = std::env::var("REGSTAT_UNCURATED_YEARS") {
            config.years.uncurated = parse_year_list("REGSTAT_UNCURATED_YEARS", &val)?;
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut RegstatConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.database_path {
            config.storage.database_path = Some(v.clone());
        }
        if let Some(v) = cli.read_pool_size {
            config.storage.read_pool_size = Some(v);
        }
        if let Some(v) = cli.index_rebuild_threshold {
            config.import.index_rebuild_threshold = Some(v);
        }
        if let Some(ref v) = cli.curated_years {
            config.years.curated = v.clone();
        }
        if let Some(ref v) = cli.uncurated_years {
            config.years.uncurated = v.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn parse_year_list(field: &str, raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!("'{s}' is not a year"),
            })
        })
        .collect()
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_list_parsing() {
        assert_eq!(parse_year_list("X", "2011, 2012,,2013").unwrap(), vec![2011, 2012, 2013]);
        assert!(matches!(
            parse_year_list("X", "2011,abc"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
