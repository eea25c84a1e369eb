//! Configuration system for regstat.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod import_config;
pub mod query_config;
pub mod regstat_config;
pub mod storage_config;
pub mod years_config;

pub use import_config::ImportConfig;
pub use query_config::QueryConfig;
pub use regstat_config::{CliOverrides, RegstatConfig};
pub use storage_config::StorageConfig;
pub use years_config::YearsConfig;
