//! Secondary (non-essential) fact-table indexes.
//!
//! The natural-key UNIQUE constraints on the fact tables are essential and
//! never dropped. Everything here exists for read performance only and may
//! be dropped for the duration of an import session.

use regstat_core::errors::StorageError;
use rusqlite::Connection;

use crate::sql_err;

/// (index name, CREATE statement).
pub const SECONDARY_INDEXES: &[(&str, &str)] = &[
    (
        "idx_vehicles_year",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_year ON vehicles(year)",
    ),
    (
        "idx_vehicles_year_make_model",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_year_make_model ON vehicles(year, make_id, model_id)",
    ),
    (
        "idx_vehicles_vehicle_class",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_vehicle_class ON vehicles(vehicle_class_id)",
    ),
    (
        "idx_vehicles_vehicle_type",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_vehicle_type ON vehicles(vehicle_type_id)",
    ),
    (
        "idx_vehicles_make_model",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_make_model ON vehicles(make_id, model_id)",
    ),
    (
        "idx_vehicles_fuel_type",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_fuel_type ON vehicles(fuel_type_id)",
    ),
    (
        "idx_vehicles_color",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_color ON vehicles(color_id)",
    ),
    (
        "idx_vehicles_model_year",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_model_year ON vehicles(model_year_id)",
    ),
    (
        "idx_vehicles_admin_region",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_admin_region ON vehicles(admin_region_id)",
    ),
    (
        "idx_vehicles_mrc",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_mrc ON vehicles(mrc_id)",
    ),
    (
        "idx_vehicles_municipality",
        "CREATE INDEX IF NOT EXISTS idx_vehicles_municipality ON vehicles(municipality_id)",
    ),
    (
        "idx_licenses_year",
        "CREATE INDEX IF NOT EXISTS idx_licenses_year ON licenses(year)",
    ),
    (
        "idx_licenses_admin_region",
        "CREATE INDEX IF NOT EXISTS idx_licenses_admin_region ON licenses(admin_region_id)",
    ),
    (
        "idx_licenses_mrc",
        "CREATE INDEX IF NOT EXISTS idx_licenses_mrc ON licenses(mrc_id)",
    ),
    (
        "idx_licenses_age_group",
        "CREATE INDEX IF NOT EXISTS idx_licenses_age_group ON licenses(age_group_id)",
    ),
    (
        "idx_licenses_gender",
        "CREATE INDEX IF NOT EXISTS idx_licenses_gender ON licenses(gender_id)",
    ),
    (
        "idx_licenses_license_type",
        "CREATE INDEX IF NOT EXISTS idx_licenses_license_type ON licenses(license_type_id)",
    ),
];

pub fn create_secondary_indexes(conn: &Connection) -> Result<(), StorageError> {
    for (_, ddl) in SECONDARY_INDEXES {
        conn.execute_batch(ddl).map_err(sql_err)?;
    }
    Ok(())
}

pub fn drop_secondary_indexes(conn: &Connection) -> Result<(), StorageError> {
    for (name, _) in SECONDARY_INDEXES {
        conn.execute_batch(&format!("DROP INDEX IF EXISTS {name}"))
            .map_err(sql_err)?;
    }
    Ok(())
}

/// Names of the secondary indexes currently present.
pub fn existing_secondary_indexes(conn: &Connection) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT name FROM sqlite_master WHERE type = 'index' ORDER BY name")
        .map_err(sql_err)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sql_err)?;
    Ok(names
        .into_iter()
        .filter(|n| SECONDARY_INDEXES.iter().any(|(s, _)| s == n))
        .collect())
}

/// Refresh planner statistics.
pub fn analyze(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("ANALYZE").map_err(sql_err)
}
