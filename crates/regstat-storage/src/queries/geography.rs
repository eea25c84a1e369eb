//! geographic_entities reference data.

use regstat_core::errors::StorageError;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::sql_err;

/// Level of a geographic reference entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoEntityType {
    AdminRegion,
    Mrc,
    Municipality,
}

impl GeoEntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AdminRegion => "admin_region",
            Self::Mrc => "mrc",
            Self::Municipality => "municipality",
        }
    }
}

/// A row of geographic_entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicEntity {
    pub code: String,
    pub name: String,
    pub entity_type: GeoEntityType,
    pub parent_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area_km2: Option<f64>,
    pub population: Option<i64>,
}

impl GeographicEntity {
    pub fn new(code: &str, name: &str, entity_type: GeoEntityType) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            entity_type,
            parent_code: None,
            latitude: None,
            longitude: None,
            area_km2: None,
            population: None,
        }
    }
}

/// Upsert reference rows keyed by code. Returns the number written.
pub fn insert_geographic_entities(
    conn: &Connection,
    entities: &[GeographicEntity],
) -> Result<usize, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO geographic_entities
                (code, name, type, parent_code, latitude, longitude, area_km2, population)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(code) DO UPDATE SET
                name = excluded.name,
                type = excluded.type,
                parent_code = excluded.parent_code,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                area_km2 = excluded.area_km2,
                population = excluded.population",
        )
        .map_err(sql_err)?;

    let mut written = 0;
    for e in entities {
        written += stmt
            .execute(params![
                e.code,
                e.name,
                e.entity_type.as_str(),
                e.parent_code,
                e.latitude,
                e.longitude,
                e.area_km2,
                e.population,
            ])
            .map_err(sql_err)?;
    }
    Ok(written)
}

/// Entities of one level, ordered by name.
pub fn list_geographic_entities(
    conn: &Connection,
    entity_type: GeoEntityType,
) -> Result<Vec<GeographicEntity>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT code, name, parent_code, latitude, longitude, area_km2, population
             FROM geographic_entities WHERE type = ?1 ORDER BY name",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(params![entity_type.as_str()], |row| {
            Ok(GeographicEntity {
                code: row.get(0)?,
                name: row.get(1)?,
                entity_type,
                parent_code: row.get(2)?,
                latitude: row.get(3)?,
                longitude: row.get(4)?,
                area_km2: row.get(5)?,
                population: row.get(6)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}
