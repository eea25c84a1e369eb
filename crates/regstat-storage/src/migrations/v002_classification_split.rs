//! V002: Split the legacy vehicle classification into vehicle class and
//! vehicle type dimensions.
//!
//! Existing classification codes become vehicle classes (same ids); vehicle
//! type starts empty and is populated by later imports. Secondary fact
//! indexes are created after this step (see `crate::indexes`).

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS vehicle_class_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
) STRICT;

CREATE TABLE IF NOT EXISTS vehicle_type_enum (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
) STRICT;

INSERT INTO vehicle_class_enum (id, code, description)
    SELECT id, code, description FROM classification_enum;

ALTER TABLE vehicles ADD COLUMN vehicle_class_id INTEGER;
ALTER TABLE vehicles ADD COLUMN vehicle_type_id INTEGER;

UPDATE vehicles SET vehicle_class_id = classification_id
    WHERE classification_id IS NOT NULL;

DROP INDEX IF EXISTS idx_vehicles_classification;
ALTER TABLE vehicles DROP COLUMN classification_id;
DROP TABLE classification_enum;
"#;
