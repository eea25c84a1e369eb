//! V003: Make/model regularization.
//!
//! `regularization_mapping` holds reviewer-confirmed equivalences between an
//! uncurated (make, model) pair and its canonical counterpart.
//! `canonical_hierarchy_cache` materializes the curated-year aggregate the
//! canonical hierarchy is built from.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS regularization_mapping (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uncurated_make_id INTEGER NOT NULL REFERENCES make_enum(id),
    uncurated_model_id INTEGER NOT NULL REFERENCES model_enum(id),
    canonical_make_id INTEGER NOT NULL REFERENCES make_enum(id),
    canonical_model_id INTEGER NOT NULL REFERENCES model_enum(id),
    fuel_type_id INTEGER REFERENCES fuel_type_enum(id),
    vehicle_type_id INTEGER REFERENCES vehicle_type_enum(id),
    record_count INTEGER NOT NULL DEFAULT 0,
    year_range_start INTEGER,
    year_range_end INTEGER,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    UNIQUE(uncurated_make_id, uncurated_model_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_regularization_canonical
    ON regularization_mapping(canonical_make_id, canonical_model_id);

-- Fuel and vehicle type may be unknown, so the full id tuple is a UNIQUE
-- key rather than the primary key.
CREATE TABLE IF NOT EXISTS canonical_hierarchy_cache (
    id INTEGER PRIMARY KEY,
    make_id INTEGER NOT NULL,
    model_id INTEGER NOT NULL,
    fuel_type_id INTEGER,
    vehicle_type_id INTEGER,
    record_count INTEGER NOT NULL,
    refreshed_at INTEGER NOT NULL DEFAULT (unixepoch()),
    UNIQUE(make_id, model_id, fuel_type_id, vehicle_type_id)
) STRICT;
"#;
