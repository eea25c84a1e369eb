//! Canonical Make → Model → {fuel type, vehicle type} tree.
//!
//! Built from curated years only. The per-tuple counts are materialized in
//! `canonical_hierarchy_cache` and the tree is assembled from that table.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regstat_core::errors::StorageError;
use regstat_core::types::DimensionId;
use regstat_storage::connection::writer::with_immediate_transaction;
use rusqlite::{params_from_iter, Connection};
use serde::{Deserialize, Serialize};

use crate::query::builder::placeholders;
use crate::sql_err;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalHierarchy {
    pub makes: Vec<CanonicalMake>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMake {
    pub id: DimensionId,
    pub name: String,
    pub record_count: u64,
    pub models: Vec<CanonicalModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalModel {
    pub id: DimensionId,
    pub name: String,
    pub record_count: u64,
    pub fuel_types: Vec<FuelTypeInfo>,
    pub vehicle_types: Vec<VehicleTypeInfo>,
}

/// A fuel type under one model. `id` is `None` for rows with no fuel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTypeInfo {
    pub id: Option<DimensionId>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub record_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTypeInfo {
    pub id: Option<DimensionId>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub record_count: u64,
}

impl CanonicalHierarchy {
    pub fn make(&self, name: &str) -> Option<&CanonicalMake> {
        self.makes.iter().find(|m| m.name == name)
    }

    pub fn model_count(&self) -> usize {
        self.makes.iter().map(|m| m.models.len()).sum()
    }
}

impl CanonicalMake {
    pub fn model(&self, name: &str) -> Option<&CanonicalModel> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// Replace the materialized aggregate with counts over `curated` years.
pub fn materialize(conn: &Connection, curated: &[i64]) -> Result<usize, StorageError> {
    let sql = format!(
        "INSERT INTO canonical_hierarchy_cache
             (make_id, model_id, fuel_type_id, vehicle_type_id, record_count)
         SELECT make_id, model_id, fuel_type_id, vehicle_type_id, COUNT(*)
         FROM vehicles
         WHERE year IN ({})
           AND make_id IS NOT NULL AND model_id IS NOT NULL
         GROUP BY make_id, model_id, fuel_type_id, vehicle_type_id",
        placeholders(curated.len())
    );
    with_immediate_transaction(conn, |tx| {
        tx.execute("DELETE FROM canonical_hierarchy_cache", [])
            .map_err(sql_err)?;
        tx.execute(&sql, params_from_iter(curated)).map_err(sql_err)
    })
}

struct ModelNode {
    id: DimensionId,
    record_count: u64,
    fuel_types: BTreeMap<Option<DimensionId>, FuelTypeInfo>,
    vehicle_types: BTreeMap<Option<DimensionId>, VehicleTypeInfo>,
}

struct MakeNode {
    id: DimensionId,
    models: BTreeMap<(String, DimensionId), ModelNode>,
}

/// Assemble the tree from the materialized aggregate.
pub fn load(conn: &Connection) -> Result<CanonicalHierarchy, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT h.make_id, mk.name, h.model_id, md.name,
                    h.fuel_type_id, ft.code, ft.description,
                    h.vehicle_type_id, vt.code, vt.description,
                    h.record_count
             FROM canonical_hierarchy_cache h
             JOIN make_enum mk ON mk.id = h.make_id
             JOIN model_enum md ON md.id = h.model_id
             LEFT JOIN fuel_type_enum ft ON ft.id = h.fuel_type_id
             LEFT JOIN vehicle_type_enum vt ON vt.id = h.vehicle_type_id",
        )
        .map_err(sql_err)?;
    let mut rows = stmt.query([]).map_err(sql_err)?;

    let mut makes: BTreeMap<(String, DimensionId), MakeNode> = BTreeMap::new();
    while let Some(row) = rows.next().map_err(sql_err)? {
        let make_id: DimensionId = row.get(0).map_err(sql_err)?;
        let make_name: String = row.get(1).map_err(sql_err)?;
        let model_id: DimensionId = row.get(2).map_err(sql_err)?;
        let model_name: String = row.get(3).map_err(sql_err)?;
        let fuel_id: Option<DimensionId> = row.get(4).map_err(sql_err)?;
        let vehicle_type_id: Option<DimensionId> = row.get(7).map_err(sql_err)?;
        let count = row.get::<_, i64>(10).map_err(sql_err)? as u64;

        let make = makes
            .entry((make_name, make_id))
            .or_insert_with(|| MakeNode {
                id: make_id,
                models: BTreeMap::new(),
            });
        let model = make
            .models
            .entry((model_name, model_id))
            .or_insert_with(|| ModelNode {
                id: model_id,
                record_count: 0,
                fuel_types: BTreeMap::new(),
                vehicle_types: BTreeMap::new(),
            });
        model.record_count += count;

        match model.fuel_types.get_mut(&fuel_id) {
            Some(fuel) => fuel.record_count += count,
            None => {
                model.fuel_types.insert(
                    fuel_id,
                    FuelTypeInfo {
                        id: fuel_id,
                        code: row.get(5).map_err(sql_err)?,
                        description: row.get(6).map_err(sql_err)?,
                        record_count: count,
                    },
                );
            }
        }
        match model.vehicle_types.get_mut(&vehicle_type_id) {
            Some(vt) => vt.record_count += count,
            None => {
                model.vehicle_types.insert(
                    vehicle_type_id,
                    VehicleTypeInfo {
                        id: vehicle_type_id,
                        code: row.get(8).map_err(sql_err)?,
                        description: row.get(9).map_err(sql_err)?,
                        record_count: count,
                    },
                );
            }
        }
    }

    let makes = makes
        .into_iter()
        .map(|((name, _), node)| {
            let models: Vec<CanonicalModel> = node
                .models
                .into_iter()
                .map(|((name, _), m)| {
                    let mut fuel_types: Vec<_> = m.fuel_types.into_values().collect();
                    fuel_types.sort_by(|a, b| none_last(&a.description, &b.description));
                    let mut vehicle_types: Vec<_> = m.vehicle_types.into_values().collect();
                    vehicle_types.sort_by(|a, b| none_last(&a.code, &b.code));
                    CanonicalModel {
                        id: m.id,
                        name,
                        record_count: m.record_count,
                        fuel_types,
                        vehicle_types,
                    }
                })
                .collect();
            CanonicalMake {
                id: node.id,
                name,
                record_count: models.iter().map(|m| m.record_count).sum(),
                models,
            }
        })
        .collect();

    Ok(CanonicalHierarchy { makes })
}

fn none_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
