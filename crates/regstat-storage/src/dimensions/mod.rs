//! Dimension Store: integer identity for every categorical value.
//!
//! `resolve` is get-or-create. Hits come from an in-memory cache seeded by a
//! full scan of every dimension table; misses go through a single atomic
//! upsert-returning statement, so a natural key maps to exactly one id no
//! matter how many batches (or connections) resolve it.

pub mod geo;
pub mod labels;
pub mod tables;

use regstat_core::errors::StorageError;
use regstat_core::types::{Dimension, DimensionId, FxHashMap};
use rusqlite::{params, Connection};

use self::geo::GeoName;
use self::tables::{DimensionTable, KeyKind};
use crate::sql_err;

/// Natural key of one dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NaturalKey {
    Integer(i64),
    Code(String),
    Name(String),
    Geo(GeoName),
    /// Requires the parent make to be resolved first.
    Model { make_id: DimensionId, name: String },
}

impl NaturalKey {
    pub fn code(code: &str) -> Self {
        Self::Code(code.to_string())
    }

    pub fn name(name: &str) -> Self {
        Self::Name(name.to_string())
    }

    pub fn model(make_id: DimensionId, name: &str) -> Self {
        Self::Model {
            make_id,
            name: name.to_string(),
        }
    }

    fn cache_key(&self) -> CacheKey {
        match self {
            Self::Integer(v) => CacheKey::Int(*v),
            Self::Code(c) => CacheKey::Text(c.clone()),
            Self::Name(n) => CacheKey::Text(n.clone()),
            Self::Geo(g) => CacheKey::Text(g.code.clone()),
            Self::Model { make_id, name } => CacheKey::Model(*make_id, name.clone()),
        }
    }

    fn matches(&self, kind: KeyKind) -> bool {
        matches!(
            (self, kind),
            (Self::Integer(_), KeyKind::Integer { .. })
                | (Self::Code(_), KeyKind::Code)
                | (Self::Name(_), KeyKind::Name)
                | (Self::Geo(_), KeyKind::Geo)
                | (Self::Model { .. }, KeyKind::Model)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Int(i64),
    Text(String),
    Model(DimensionId, String),
}

/// Per-batch id cache over every dimension table.
///
/// Owned by exactly one import batch at a time; never shared across
/// concurrent batches.
#[derive(Debug, Default)]
pub struct DimensionStore {
    ids: FxHashMap<Dimension, FxHashMap<CacheKey, DimensionId>>,
    inserted: u64,
}

impl DimensionStore {
    /// Empty store; every first lookup goes to the database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with a full scan of every dimension table.
    pub fn load(conn: &Connection) -> Result<Self, StorageError> {
        let mut store = Self::new();
        for dimension in Dimension::ALL {
            let table = DimensionTable::of(dimension);
            let mut stmt = conn.prepare(&table.scan_sql()).map_err(sql_err)?;
            let rows = stmt
                .query_map([], |row| {
                    let id: DimensionId = row.get(0)?;
                    let key = match table.kind {
                        KeyKind::Integer { .. } => CacheKey::Int(row.get(1)?),
                        KeyKind::Model => CacheKey::Model(row.get(2)?, row.get(1)?),
                        _ => CacheKey::Text(row.get(1)?),
                    };
                    Ok((key, id))
                })
                .map_err(sql_err)?;
            let entry = store.ids.entry(dimension).or_default();
            for row in rows {
                let (key, id) = row.map_err(sql_err)?;
                entry.insert(key, id);
            }
        }
        tracing::debug!(entries = store.cached_entries(), "dimension cache seeded");
        Ok(store)
    }

    /// Get-or-create the id for `key` in `dimension`.
    pub fn resolve(
        &mut self,
        conn: &Connection,
        dimension: Dimension,
        key: NaturalKey,
    ) -> Result<DimensionId, StorageError> {
        let table = DimensionTable::of(dimension);
        if !key.matches(table.kind) {
            return Err(StorageError::query(format!(
                "natural key {key:?} does not fit dimension {dimension}"
            )));
        }

        let cache_key = key.cache_key();
        if let Some(id) = self.ids.get(&dimension).and_then(|m| m.get(&cache_key)) {
            return Ok(*id);
        }

        let mut stmt = conn.prepare_cached(&table.upsert_sql()).map_err(sql_err)?;
        let id: DimensionId = match &key {
            NaturalKey::Integer(v) => stmt.query_row(params![v], |row| row.get(0)),
            NaturalKey::Code(code) => {
                let description = labels::describe(dimension, code).unwrap_or(code.as_str());
                stmt.query_row(params![code, description], |row| row.get(0))
            }
            NaturalKey::Name(name) => stmt.query_row(params![name], |row| row.get(0)),
            NaturalKey::Geo(g) => stmt.query_row(params![g.code, g.name], |row| row.get(0)),
            NaturalKey::Model { make_id, name } => {
                stmt.query_row(params![name, make_id], |row| row.get(0))
            }
        }
        .map_err(sql_err)?;

        self.inserted += 1;
        self.ids.entry(dimension).or_default().insert(cache_key, id);
        Ok(id)
    }

    /// Resolve an optional text code; blank input yields no id.
    pub fn resolve_code(
        &mut self,
        conn: &Connection,
        dimension: Dimension,
        code: Option<&str>,
    ) -> Result<Option<DimensionId>, StorageError> {
        match code {
            Some(c) => self.resolve(conn, dimension, NaturalKey::code(c)).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve an optional name; blank input yields no id.
    pub fn resolve_name(
        &mut self,
        conn: &Connection,
        dimension: Dimension,
        name: Option<&str>,
    ) -> Result<Option<DimensionId>, StorageError> {
        match name {
            Some(n) => self.resolve(conn, dimension, NaturalKey::name(n)).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve an optional integer key; absent input yields no id.
    pub fn resolve_integer(
        &mut self,
        conn: &Connection,
        dimension: Dimension,
        value: Option<i64>,
    ) -> Result<Option<DimensionId>, StorageError> {
        match value {
            Some(v) => self.resolve(conn, dimension, NaturalKey::Integer(v)).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a decoded geographic pair; an undecodable string yields no id.
    pub fn resolve_geo(
        &mut self,
        conn: &Connection,
        dimension: Dimension,
        geo: Option<GeoName>,
    ) -> Result<Option<DimensionId>, StorageError> {
        match geo {
            Some(g) => self.resolve(conn, dimension, NaturalKey::Geo(g)).map(Some),
            None => Ok(None),
        }
    }

    /// Cached id for `key`, without touching the database.
    pub fn cached(&self, dimension: Dimension, key: &NaturalKey) -> Option<DimensionId> {
        self.ids
            .get(&dimension)
            .and_then(|m| m.get(&key.cache_key()))
            .copied()
    }

    /// Number of ids held in the cache across all dimensions.
    pub fn cached_entries(&self) -> usize {
        self.ids.values().map(|m| m.len()).sum()
    }

    /// Cache misses resolved through the database since construction.
    pub fn upserts(&self) -> u64 {
        self.inserted
    }
}
