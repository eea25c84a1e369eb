//! Physical layout of each dimension table.

use regstat_core::types::Dimension;

/// How a dimension's natural key is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Single integer column (years, counts).
    Integer { column: &'static str },
    /// `code` plus a derived `description`.
    Code,
    /// Single `name` column.
    Name,
    /// `code` (unique) plus `name`, decoded from `"Name (Code)"`.
    Geo,
    /// `name` scoped by the parent `make_id`.
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionTable {
    pub table: &'static str,
    pub kind: KeyKind,
}

impl DimensionTable {
    pub fn of(dimension: Dimension) -> Self {
        let (table, kind) = match dimension {
            Dimension::Year => ("year_enum", KeyKind::Integer { column: "year" }),
            Dimension::VehicleClass => ("vehicle_class_enum", KeyKind::Code),
            Dimension::VehicleType => ("vehicle_type_enum", KeyKind::Code),
            Dimension::Make => ("make_enum", KeyKind::Name),
            Dimension::Model => ("model_enum", KeyKind::Model),
            Dimension::ModelYear => ("model_year_enum", KeyKind::Integer { column: "year" }),
            Dimension::CylinderCount => {
                ("cylinder_count_enum", KeyKind::Integer { column: "count" })
            }
            Dimension::AxleCount => ("axle_count_enum", KeyKind::Integer { column: "count" }),
            Dimension::Color => ("color_enum", KeyKind::Name),
            Dimension::FuelType => ("fuel_type_enum", KeyKind::Code),
            Dimension::AdminRegion => ("admin_region_enum", KeyKind::Geo),
            Dimension::Mrc => ("mrc_enum", KeyKind::Geo),
            Dimension::Municipality => ("municipality_enum", KeyKind::Geo),
            Dimension::Gender => ("gender_enum", KeyKind::Code),
            Dimension::AgeGroup => ("age_group_enum", KeyKind::Code),
            Dimension::LicenseType => ("license_type_enum", KeyKind::Code),
        };
        Self { table, kind }
    }

    /// Atomic get-or-create: inserts when absent and returns the id either
    /// way. The no-op `DO UPDATE` makes `RETURNING` yield the existing row.
    pub fn upsert_sql(&self) -> String {
        let t = self.table;
        match self.kind {
            KeyKind::Integer { column } => format!(
                "INSERT INTO {t} ({column}) VALUES (?1)
                 ON CONFLICT({column}) DO UPDATE SET {column} = excluded.{column}
                 RETURNING id"
            ),
            KeyKind::Code => format!(
                "INSERT INTO {t} (code, description) VALUES (?1, ?2)
                 ON CONFLICT(code) DO UPDATE SET code = excluded.code
                 RETURNING id"
            ),
            KeyKind::Name => format!(
                "INSERT INTO {t} (name) VALUES (?1)
                 ON CONFLICT(name) DO UPDATE SET name = excluded.name
                 RETURNING id"
            ),
            KeyKind::Geo => format!(
                "INSERT INTO {t} (code, name) VALUES (?1, ?2)
                 ON CONFLICT(code) DO UPDATE SET code = excluded.code
                 RETURNING id"
            ),
            KeyKind::Model => format!(
                "INSERT INTO {t} (name, make_id) VALUES (?1, ?2)
                 ON CONFLICT(name, make_id) DO UPDATE SET name = excluded.name
                 RETURNING id"
            ),
        }
    }

    /// `SELECT id, <key columns...>` over the whole table, used to seed the
    /// in-memory cache.
    pub fn scan_sql(&self) -> String {
        let t = self.table;
        match self.kind {
            KeyKind::Integer { column } => format!("SELECT id, {column} FROM {t}"),
            KeyKind::Code | KeyKind::Geo => format!("SELECT id, code FROM {t}"),
            KeyKind::Name => format!("SELECT id, name FROM {t}"),
            KeyKind::Model => format!("SELECT id, name, make_id FROM {t}"),
        }
    }

    /// `SELECT id, label` ordered for display.
    pub fn options_sql(&self) -> String {
        let t = self.table;
        match self.kind {
            KeyKind::Integer { column } => {
                format!("SELECT id, CAST({column} AS TEXT) FROM {t} ORDER BY {column}")
            }
            KeyKind::Code => format!("SELECT id, code FROM {t} ORDER BY code"),
            KeyKind::Name | KeyKind::Model => format!("SELECT id, name FROM {t} ORDER BY name"),
            KeyKind::Geo => format!("SELECT id, name || ' (' || code || ')' FROM {t} ORDER BY name"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dimension_has_a_distinct_table() {
        let mut tables: Vec<&str> = Dimension::ALL
            .iter()
            .map(|d| DimensionTable::of(*d).table)
            .collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), Dimension::ALL.len());
    }

    #[test]
    fn geographic_dimensions_use_geo_keys() {
        for d in Dimension::ALL {
            assert_eq!(
                d.is_geographic(),
                DimensionTable::of(d).kind == KeyKind::Geo,
                "{d}"
            );
        }
    }
}
