//! V001: Initial schema: dimension tables, fact tables, reference data.
//! Vehicles still carry the single legacy `classification_id` column.

pub const MIGRATION_SQL: &str = r#"
-- Dimension tables: one row per distinct natural key, surrogate integer id.
CREATE TABLE IF NOT EXISTS year_enum (
    id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL UNIQUE
) STRICT;

CREATE TABLE IF NOT EXISTS classification_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS make_enum (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
) STRICT;

CREATE TABLE IF NOT EXISTS model_enum (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    make_id INTEGER NOT NULL REFERENCES make_enum(id),
    UNIQUE(name, make_id)
) STRICT;

CREATE TABLE IF NOT EXISTS model_year_enum (
    id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL UNIQUE
) STRICT;

CREATE TABLE IF NOT EXISTS cylinder_count_enum (
    id INTEGER PRIMARY KEY,
    count INTEGER NOT NULL UNIQUE
) STRICT;

CREATE TABLE IF NOT EXISTS axle_count_enum (
    id INTEGER PRIMARY KEY,
    count INTEGER NOT NULL UNIQUE
) STRICT;

CREATE TABLE IF NOT EXISTS color_enum (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
) STRICT;

CREATE TABLE IF NOT EXISTS fuel_type_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS admin_region_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS mrc_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS municipality_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS gender_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS age_group_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS license_type_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
) STRICT;

-- Vehicle facts: one row per registered vehicle per year.
-- Dimension columns are bare integers; the enum tables own the constraints.
CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL,
    vehicle_sequence TEXT NOT NULL,
    year_id INTEGER,
    classification_id INTEGER,
    make_id INTEGER,
    model_id INTEGER,
    model_year INTEGER,
    model_year_id INTEGER,
    net_mass REAL,
    displacement REAL,
    cylinder_count INTEGER,
    cylinder_count_id INTEGER,
    axle_count INTEGER,
    axle_count_id INTEGER,
    color_id INTEGER,
    fuel_type_id INTEGER,
    admin_region_id INTEGER,
    mrc_id INTEGER,
    municipality_id INTEGER,
    UNIQUE(year, vehicle_sequence)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_vehicles_classification ON vehicles(classification_id);

-- License facts: one row per license holder per year.
CREATE TABLE IF NOT EXISTS licenses (
    id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL,
    license_sequence TEXT NOT NULL,
    year_id INTEGER,
    age_group_id INTEGER,
    gender_id INTEGER,
    admin_region_id INTEGER,
    mrc_id INTEGER,
    license_type_id INTEGER,
    has_learner_permit_123 INTEGER NOT NULL DEFAULT 0,
    has_learner_permit_5 INTEGER NOT NULL DEFAULT 0,
    has_learner_permit_6a6r INTEGER NOT NULL DEFAULT 0,
    has_driver_license_1234 INTEGER NOT NULL DEFAULT 0,
    has_driver_license_5 INTEGER NOT NULL DEFAULT 0,
    has_driver_license_6abce INTEGER NOT NULL DEFAULT 0,
    has_driver_license_6d INTEGER NOT NULL DEFAULT 0,
    has_driver_license_8 INTEGER NOT NULL DEFAULT 0,
    is_probationary INTEGER NOT NULL DEFAULT 0,
    experience_1234 TEXT,
    experience_5 TEXT,
    experience_6abce TEXT,
    experience_global TEXT,
    UNIQUE(year, license_sequence)
) STRICT;

-- Geographic reference data (regions, MRCs, municipalities).
CREATE TABLE IF NOT EXISTS geographic_entities (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    parent_code TEXT,
    latitude REAL,
    longitude REAL,
    area_km2 REAL,
    population INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_geographic_entities_type ON geographic_entities(type);

-- Import log: one row per imported file.
CREATE TABLE IF NOT EXISTS import_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL,
    year INTEGER NOT NULL,
    entity TEXT NOT NULL,
    record_count INTEGER NOT NULL,
    import_date INTEGER NOT NULL DEFAULT (unixepoch()),
    status TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_import_log_date ON import_log(import_date DESC);
"#;
