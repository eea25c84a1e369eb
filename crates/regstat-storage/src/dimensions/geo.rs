//! Geographic `"Name (Code)"` decoding.

use regstat_core::errors::StorageError;
use rustc_hash::FxHashMap;
use rusqlite::{params, Connection};

use crate::queries::geography::GeoEntityType;
use crate::sql_err;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoName {
    pub name: String,
    pub code: String,
}

/// Decode `"Montréal (06)"` into name and code.
///
/// Returns `None` unless the string ends with a parenthesized, non-empty code
/// preceded by a non-empty name.
pub fn parse_geo(raw: &str) -> Option<GeoName> {
    let raw = raw.trim();
    let body = raw.strip_suffix(')')?;
    let open = body.rfind('(')?;
    let name = body[..open].trim();
    let code = body[open + 1..].trim();
    if name.is_empty() || code.is_empty() {
        return None;
    }
    Some(GeoName {
        name: name.to_string(),
        code: code.to_string(),
    })
}

/// Registered names of one geographic entity type, keyed by code.
#[derive(Debug, Default)]
pub struct GeoDirectory {
    names: FxHashMap<String, String>,
}

impl GeoDirectory {
    pub fn load(conn: &Connection, entity_type: GeoEntityType) -> Result<Self, StorageError> {
        let mut stmt = conn
            .prepare_cached("SELECT code, name FROM geographic_entities WHERE type = ?1")
            .map_err(sql_err)?;
        let rows = stmt
            .query_map(params![entity_type.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(sql_err)?;
        let mut names = FxHashMap::default();
        for row in rows {
            let (code, name) = row.map_err(sql_err)?;
            names.insert(code, name);
        }
        Ok(Self { names })
    }

    /// `parse_geo`, falling back to a bare registered code.
    pub fn decode(&self, raw: &str) -> Option<GeoName> {
        parse_geo(raw).or_else(|| {
            let code = raw.trim();
            self.names.get(code).map(|name| GeoName {
                name: name.clone(),
                code: code.to_string(),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;

    #[test]
    fn parses_name_and_code() {
        assert_eq!(
            parse_geo("Montréal (06)"),
            Some(GeoName {
                name: "Montréal".into(),
                code: "06".into()
            })
        );
        assert_eq!(
            parse_geo("  Les Moulins (64 ) ").map(|g| g.code),
            Some("64".to_string())
        );
    }

    #[test]
    fn nested_parentheses_use_last_group() {
        let g = parse_geo("Saint-Louis (Gaspé) (03010)").unwrap();
        assert_eq!(g.name, "Saint-Louis (Gaspé)");
        assert_eq!(g.code, "03010");
    }

    #[test]
    fn decoded_names_key_hash_sets() {
        let names: FxHashSet<GeoName> = ["Laval (13)", "Laval (13)", "Laval (13 )"]
            .into_iter()
            .filter_map(parse_geo)
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn malformed_strings_fail_soft() {
        for raw in ["Montréal", "Montréal 06)", "(06)", "Montréal ()", "Montréal (06", ""] {
            assert_eq!(parse_geo(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn directory_resolves_bare_codes() {
        let mut dir = GeoDirectory::default();
        dir.names.insert("66023".into(), "Montréal".into());
        assert_eq!(dir.decode("66023").map(|g| g.name), Some("Montréal".into()));
        assert_eq!(dir.decode("99999"), None);
        assert_eq!(dir.decode("Laval (65005)").map(|g| g.code), Some("65005".into()));
    }
}
