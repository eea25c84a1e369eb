//! Query modules for reference data, filter options, and store statistics.

pub mod filter_options;
pub mod geography;
pub mod import_log;
pub mod statistics;

use regstat_core::types::EntityType;

/// Fact table holding rows of `entity`.
pub fn fact_table(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Vehicle => "vehicles",
        EntityType::License => "licenses",
    }
}
