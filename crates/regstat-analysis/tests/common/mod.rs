//! Shared fixtures for the analysis integration tests.
#![allow(dead_code)]

use regstat_analysis::Engine;
use regstat_core::traits::RawRow;
use regstat_core::types::{Dimension, DimensionId, EntityType, YearConfiguration};

/// A vehicle record under construction.
#[derive(Debug, Clone)]
pub struct Vehicle {
    fields: Vec<(&'static str, String)>,
}

impl Vehicle {
    pub fn new(seq: impl std::fmt::Display) -> Self {
        Self {
            fields: vec![("NOSEQ_VEH", format!("V{seq}"))],
        }
    }

    fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn make_model(self, make: &str, model: &str) -> Self {
        self.with("MARQ_VEH", make).with("MODEL_VEH", model)
    }

    pub fn vehicle_type(self, code: &str) -> Self {
        self.with("TYP_VEH_CATEG_USA", code)
    }

    pub fn fuel(self, code: &str) -> Self {
        self.with("TYP_CARBU", code)
    }

    pub fn mass(self, kg: f64) -> Self {
        self.with("MASSE_NETTE", kg)
    }

    pub fn model_year(self, year: i64) -> Self {
        self.with("ANNEE_MOD", year)
    }

    pub fn region(self, encoded: &str) -> Self {
        self.with("REG_ADM", encoded)
    }

    pub fn row(self) -> RawRow {
        self.fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

pub fn license_row(seq: usize, gender: &str, experience: &str, probationary: bool) -> RawRow {
    [
        ("NOSEQ_TITULAIRE", format!("L{seq}")),
        ("SEXE", gender.to_string()),
        ("REG_ADM", "Laval (13)".to_string()),
        ("EXPERIENCE_GLOBALE", experience.to_string()),
        ("IND_PERMISCONDUIRE_5", "OUI".to_string()),
        ("IND_PROBATOIRE", if probationary { "OUI" } else { "NON" }.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// `n` copies of one make/model, sequence numbers prefixed to stay unique.
pub fn fleet(prefix: &str, n: usize, make: &str, model: &str) -> Vec<RawRow> {
    (0..n)
        .map(|i| Vehicle::new(format!("{prefix}{i}")).make_model(make, model).row())
        .collect()
}

pub fn import(engine: &Engine, rows: Vec<RawRow>, year: i64) {
    let outcome = engine.import_batch(rows, year, EntityType::Vehicle).unwrap();
    assert_eq!(outcome.error_count, 0);
}

/// Id of the option labelled `label`.
pub fn option_id(engine: &Engine, dimension: Dimension, label: &str) -> DimensionId {
    engine
        .dimension_options(dimension)
        .unwrap()
        .iter()
        .find(|o| o.label == label)
        .unwrap_or_else(|| panic!("no {dimension:?} option {label}"))
        .id
}

pub fn make_model_ids(engine: &Engine, make: &str, model: &str) -> (DimensionId, DimensionId) {
    let make_id = option_id(engine, Dimension::Make, make);
    let model_id = engine
        .models_for_make(make_id)
        .unwrap()
        .iter()
        .find(|o| o.label == model)
        .unwrap_or_else(|| panic!("no model {model} under {make}"))
        .id;
    (make_id, model_id)
}

pub fn engine_with_years(curated: &[i64], uncurated: &[i64]) -> Engine {
    let engine = Engine::open_in_memory().unwrap();
    engine.set_year_configuration(
        YearConfiguration::new(curated.iter().copied(), uncurated.iter().copied()).unwrap(),
    );
    engine
}
