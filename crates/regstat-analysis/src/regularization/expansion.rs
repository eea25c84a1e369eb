//! Widen make/model filters with their reconciled uncurated variants.
//!
//! [`expand`] reports the widened id sets. Queries use [`mapped_variants`]
//! instead: an uncurated make also carries models that were never mapped,
//! so variants are matched as exact `(make, model)` pairs.

use std::collections::BTreeSet;

use regstat_core::errors::StorageError;
use regstat_core::types::DimensionId;
use rusqlite::Connection;

use crate::sql_err;

/// The id columns of one mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingPair {
    pub uncurated_make_id: DimensionId,
    pub uncurated_model_id: DimensionId,
    pub canonical_make_id: DimensionId,
    pub canonical_model_id: DimensionId,
}

/// Sorted supersets of `makes` and `models`. A mapping whose canonical make
/// is selected adds its uncurated make; one whose canonical model is
/// selected adds its uncurated model. An empty set stays empty, so an
/// unfiltered dimension is never turned into a filter.
pub fn expand(
    mappings: &[MappingPair],
    makes: &BTreeSet<DimensionId>,
    models: &BTreeSet<DimensionId>,
) -> (BTreeSet<DimensionId>, BTreeSet<DimensionId>) {
    let mut out_makes = makes.clone();
    let mut out_models = models.clone();
    for m in mappings {
        if makes.contains(&m.canonical_make_id) {
            out_makes.insert(m.uncurated_make_id);
        }
        if models.contains(&m.canonical_model_id) {
            out_models.insert(m.uncurated_model_id);
        }
    }
    (out_makes, out_models)
}

/// Uncurated `(make, model)` pairs reconciled to a selected canonical
/// identity. A mapping qualifies when its canonical make is selected or no
/// make is, and likewise for its model. With neither dimension filtered
/// nothing qualifies.
pub fn mapped_variants(
    mappings: &[MappingPair],
    makes: &BTreeSet<DimensionId>,
    models: &BTreeSet<DimensionId>,
) -> BTreeSet<(DimensionId, DimensionId)> {
    if makes.is_empty() && models.is_empty() {
        return BTreeSet::new();
    }
    mappings
        .iter()
        .filter(|m| makes.is_empty() || makes.contains(&m.canonical_make_id))
        .filter(|m| models.is_empty() || models.contains(&m.canonical_model_id))
        .map(|m| (m.uncurated_make_id, m.uncurated_model_id))
        .collect()
}

pub fn load_pairs(conn: &Connection) -> Result<Vec<MappingPair>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT uncurated_make_id, uncurated_model_id, canonical_make_id, canonical_model_id
             FROM regularization_mapping",
        )
        .map_err(sql_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MappingPair {
                uncurated_make_id: row.get(0)?,
                uncurated_model_id: row.get(1)?,
                canonical_make_id: row.get(2)?,
                canonical_model_id: row.get(3)?,
            })
        })
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn pair(u: (i64, i64), c: (i64, i64)) -> MappingPair {
        MappingPair {
            uncurated_make_id: u.0,
            uncurated_model_id: u.1,
            canonical_make_id: c.0,
            canonical_model_id: c.1,
        }
    }

    #[test]
    fn canonical_model_pulls_in_variant() {
        let mappings = [pair((1, 11), (1, 10)), pair((7, 71), (2, 20))];
        let (makes, models) = expand(&mappings, &[1].into(), &[10].into());
        assert_eq!(makes, BTreeSet::from([1]));
        assert_eq!(models, BTreeSet::from([10, 11]));
    }

    #[test]
    fn empty_filters_stay_empty() {
        let mappings = [pair((1, 11), (1, 10))];
        let (makes, models) = expand(&mappings, &BTreeSet::new(), &BTreeSet::new());
        assert!(makes.is_empty());
        assert!(models.is_empty());
    }

    #[test]
    fn make_only_filter_does_not_add_models() {
        let mappings = [pair((5, 51), (2, 20))];
        let (makes, models) = expand(&mappings, &[2].into(), &BTreeSet::new());
        assert_eq!(makes, BTreeSet::from([2, 5]));
        assert!(models.is_empty());
    }

    #[test]
    fn variants_are_exact_pairs() {
        let mappings = [
            pair((5, 51), (2, 20)),
            pair((5, 52), (3, 30)),
            pair((1, 11), (2, 21)),
        ];
        let variants = mapped_variants(&mappings, &[2].into(), &BTreeSet::new());
        assert_eq!(variants, BTreeSet::from([(1, 11), (5, 51)]));

        let variants = mapped_variants(&mappings, &[2].into(), &[20].into());
        assert_eq!(variants, BTreeSet::from([(5, 51)]));

        let variants = mapped_variants(&mappings, &BTreeSet::new(), &[30].into());
        assert_eq!(variants, BTreeSet::from([(5, 52)]));

        assert!(mapped_variants(&mappings, &BTreeSet::new(), &BTreeSet::new()).is_empty());
    }

    fn arb_pairs() -> impl Strategy<Value = Vec<MappingPair>> {
        prop::collection::vec(
            (0i64..20, 0i64..40, 0i64..20, 0i64..40)
                .prop_map(|(a, b, c, d)| pair((a, b), (c, d))),
            0..30,
        )
    }

    proptest! {
        #[test]
        fn expansion_is_a_superset(
            mappings in arb_pairs(),
            makes in prop::collection::btree_set(0i64..20, 0..6),
            models in prop::collection::btree_set(0i64..40, 0..6),
        ) {
            let (out_makes, out_models) = expand(&mappings, &makes, &models);
            prop_assert!(out_makes.is_superset(&makes));
            prop_assert!(out_models.is_superset(&models));
        }

        #[test]
        fn expansion_is_monotonic_in_input(
            mappings in arb_pairs(),
            makes in prop::collection::btree_set(0i64..20, 0..6),
            extra in 0i64..20,
        ) {
            let (small, _) = expand(&mappings, &makes, &BTreeSet::new());
            let mut larger = makes.clone();
            larger.insert(extra);
            let (big, _) = expand(&mappings, &larger, &BTreeSet::new());
            prop_assert!(big.is_superset(&small));
        }
    }
}
