//! FilterConfiguration → parameterized yearly aggregate.
//!
//! Every non-empty filter becomes one conjunctive clause and values within
//! a filter are disjunctive. Only the integer-keyed fact columns are
//! queried. Reconciled make/model variants widen the make/model clause with
//! exact pair alternatives.

use regstat_core::errors::QueryError;
use regstat_core::types::{DimensionId, EntityType, FilterConfiguration, Metric};
use rusqlite::types::Value;

use super::builder::{placeholders, SqlBuilder};
use super::metrics::{coverage_sql, license_class_column, metric_operand};
use super::road_wear;
use regstat_storage::queries::fact_table;

/// First registration year in which fuel type was collected.
pub const FUEL_TYPE_FIRST_YEAR: i64 = 2017;

/// A compiled query: `SELECT year, value` rows in ascending year order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
    /// Divide the series by its first value after execution.
    pub normalize: bool,
}

/// Compile one configuration. The percentage metric compiles to its
/// numerator (a row count); joining with the baseline happens at execution.
pub fn compile(config: &FilterConfiguration) -> Result<CompiledQuery, QueryError> {
    compile_with_variants(config, &[])
}

/// [`compile`], also matching rows whose `(make, model)` is one of
/// `variants` when a make or model filter is set.
pub fn compile_with_variants(
    config: &FilterConfiguration,
    variants: &[(DimensionId, DimensionId)],
) -> Result<CompiledQuery, QueryError> {
    validate(config)?;

    let mut b = SqlBuilder::new();
    let mut normalize = false;

    match config.metric {
        Metric::Count | Metric::Percentage => {}
        Metric::Sum { field }
        | Metric::Average { field }
        | Metric::Minimum { field }
        | Metric::Maximum { field } => {
            let agg = match config.metric {
                Metric::Sum { .. } => "SUM",
                Metric::Average { .. } => "AVG",
                Metric::Minimum { .. } => "MIN",
                _ => "MAX",
            };
            let (expr, required) = metric_operand(field);
            b.value(format!("{agg}({expr})"), Vec::new());
            b.predicate(format!("{required} IS NOT NULL"), Vec::new());
        }
        Metric::Coverage { field, mode } => {
            b.value(coverage_sql(field, mode), Vec::new());
        }
        Metric::RoadWearIndex { mode, normalize: n } => {
            let (expr, params) = road_wear::aggregate_sql(mode);
            b.value(expr, params);
            b.join("LEFT JOIN vehicle_type_enum vt ON vt.id = f.vehicle_type_id");
            b.predicate("f.net_mass IS NOT NULL", Vec::new());
            normalize = n;
        }
    }

    b.in_ids("f.year", &config.years);
    if !config.fuel_types.is_empty() && config.years.is_empty() {
        b.predicate("f.year >= ?", vec![Value::Integer(FUEL_TYPE_FIRST_YEAR)]);
    }

    b.in_ids("f.admin_region_id", &config.admin_regions);
    b.in_ids("f.mrc_id", &config.mrcs);

    match config.entity {
        EntityType::Vehicle => vehicle_predicates(&mut b, config, variants),
        EntityType::License => license_predicates(&mut b, config),
    }

    let (sql, params) = b.build_yearly(fact_table(config.entity));
    Ok(CompiledQuery {
        sql,
        params,
        normalize,
    })
}

fn vehicle_predicates(
    b: &mut SqlBuilder,
    config: &FilterConfiguration,
    variants: &[(DimensionId, DimensionId)],
) {
    b.in_ids("f.municipality_id", &config.municipalities);
    b.in_ids("f.vehicle_class_id", &config.vehicle_classes);
    b.in_ids("f.vehicle_type_id", &config.vehicle_types);
    make_model_predicate(b, config, variants);
    b.in_ids("f.color_id", &config.colors);
    b.in_ids("f.model_year_id", &config.model_years);
    b.in_ids("f.fuel_type_id", &config.fuel_types);

    if !config.age_ranges.is_empty() {
        b.predicate("f.model_year IS NOT NULL", Vec::new());
        let ranges = config
            .age_ranges
            .iter()
            .map(|r| match r.max {
                Some(max) => (
                    "(f.year - f.model_year) BETWEEN ? AND ?".to_string(),
                    vec![Value::Integer(i64::from(r.min)), Value::Integer(i64::from(max))],
                ),
                None => (
                    "(f.year - f.model_year) >= ?".to_string(),
                    vec![Value::Integer(i64::from(r.min))],
                ),
            })
            .collect();
        b.any_of(ranges);
    }
}

/// `make IN (..) AND model IN (..)`, or with variants
/// `((make IN (..) AND model IN (..)) OR (make, model) IN (VALUES ..))`.
fn make_model_predicate(
    b: &mut SqlBuilder,
    config: &FilterConfiguration,
    variants: &[(DimensionId, DimensionId)],
) {
    if variants.is_empty() || (config.makes.is_empty() && config.models.is_empty()) {
        b.in_ids("f.make_id", &config.makes);
        b.in_ids("f.model_id", &config.models);
        return;
    }

    let mut canonical = Vec::new();
    let mut params = Vec::new();
    for (column, ids) in [("f.make_id", &config.makes), ("f.model_id", &config.models)] {
        if !ids.is_empty() {
            canonical.push(format!("{column} IN ({})", placeholders(ids.len())));
            params.extend(ids.iter().map(|id| Value::Integer(*id)));
        }
    }
    let rows = vec!["(?, ?)"; variants.len()].join(", ");
    for &(make, model) in variants {
        params.push(Value::Integer(make));
        params.push(Value::Integer(model));
    }
    b.predicate(
        format!(
            "(({}) OR (f.make_id, f.model_id) IN (VALUES {rows}))",
            canonical.join(" AND ")
        ),
        params,
    );
}

fn license_predicates(b: &mut SqlBuilder, config: &FilterConfiguration) {
    b.in_ids("f.license_type_id", &config.license_types);
    b.in_ids("f.age_group_id", &config.age_groups);
    b.in_ids("f.gender_id", &config.genders);
    b.in_text("f.experience_global", &config.experience_levels);

    let classes = config
        .license_classes
        .iter()
        .map(|c| (format!("{} = 1", license_class_column(*c)), Vec::new()))
        .collect();
    b.any_of(classes);
}

fn validate(config: &FilterConfiguration) -> Result<(), QueryError> {
    let entity = config.entity;
    match entity {
        EntityType::Vehicle if config.has_license_filters() => {
            return Err(QueryError::invalid(
                "license filters cannot be applied to vehicle rows",
            ));
        }
        EntityType::License if config.has_vehicle_filters() => {
            return Err(QueryError::invalid(
                "vehicle filters cannot be applied to license rows",
            ));
        }
        _ => {}
    }

    match config.metric {
        Metric::Sum { .. }
        | Metric::Average { .. }
        | Metric::Minimum { .. }
        | Metric::Maximum { .. }
        | Metric::RoadWearIndex { .. }
            if entity != EntityType::Vehicle =>
        {
            Err(QueryError::invalid(format!(
                "{} is only defined for vehicle rows",
                config.metric.label()
            )))
        }
        Metric::Coverage { field, .. } if !field.applies_to(entity) => {
            Err(QueryError::invalid(format!(
                "{} is not a {} field",
                field.label(),
                entity.name()
            )))
        }
        _ => {
            if let Some(r) = config
                .age_ranges
                .iter()
                .find(|r| r.max.is_some_and(|max| max < r.min))
            {
                return Err(QueryError::invalid(format!(
                    "age range {}..={:?} is empty",
                    r.min, r.max
                )));
            }
            Ok(())
        }
    }
}
