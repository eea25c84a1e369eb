//! Query compiler & aggregation engine, end to end over in-memory stores.

mod common;

use regstat_analysis::Engine;
use regstat_core::errors::{EngineError, QueryError, RegularizationError, RegstatErrorCode};
use regstat_core::types::{
    AgeRange, CoverageField, CoverageMode, Dimension, EntityType, FilterConfiguration,
    LicenseClass, Metric, MetricField, RoadWearMode,
};

use common::{import, license_row, option_id, Vehicle};

fn vehicles(metric: Metric) -> FilterConfiguration {
    FilterConfiguration::new(EntityType::Vehicle, metric)
}

fn points(engine: &Engine, config: &FilterConfiguration) -> Vec<(i64, f64)> {
    engine
        .execute(config)
        .unwrap()
        .points
        .iter()
        .map(|p| (p.year, p.value))
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    let tolerance = expected.abs() * 1e-9 + 1e-9;
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Filters
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn counts_grouped_by_year_ascending() {
    let engine = Engine::open_in_memory().unwrap();
    import(&engine, common::fleet("b", 2, "KIA", "RIO"), 2021);
    import(&engine, common::fleet("a", 3, "KIA", "RIO"), 2020);

    assert_eq!(
        points(&engine, &vehicles(Metric::Count)),
        vec![(2020, 3.0), (2021, 2.0)]
    );
    let only_2021 = vehicles(Metric::Count).with_years([2021]);
    assert_eq!(points(&engine, &only_2021), vec![(2021, 2.0)]);
}

#[test]
fn values_within_a_filter_are_alternatives() {
    let engine = Engine::open_in_memory().unwrap();
    let mut rows = common::fleet("a", 2, "KIA", "RIO");
    rows.extend(common::fleet("b", 3, "FORD", "F150"));
    rows.extend(common::fleet("c", 4, "AUDI", "A4"));
    import(&engine, rows, 2020);

    let mut cfg = vehicles(Metric::Count);
    cfg.makes.insert(option_id(&engine, Dimension::Make, "KIA"));
    cfg.makes.insert(option_id(&engine, Dimension::Make, "FORD"));
    assert_eq!(points(&engine, &cfg), vec![(2020, 5.0)]);
}

#[test]
fn fuel_filter_without_years_starts_in_2017() {
    let engine = Engine::open_in_memory().unwrap();
    for year in [2016, 2017, 2018] {
        let rows = (0..2)
            .map(|i| Vehicle::new(format!("{year}-{i}")).fuel("E").row())
            .collect();
        import(&engine, rows, year);
    }
    let mut cfg = vehicles(Metric::Count);
    cfg.fuel_types.insert(option_id(&engine, Dimension::FuelType, "E"));

    assert_eq!(points(&engine, &cfg), vec![(2017, 2.0), (2018, 2.0)]);

    let explicit = cfg.with_years([2016, 2018]);
    assert_eq!(points(&engine, &explicit), vec![(2016, 2.0), (2018, 2.0)]);
}

#[test]
fn age_ranges_skip_unknown_model_years() {
    let engine = Engine::open_in_memory().unwrap();
    import(
        &engine,
        vec![
            Vehicle::new(1).model_year(2019).row(),
            Vehicle::new(2).model_year(2010).row(),
            Vehicle::new(3).model_year(2000).row(),
            Vehicle::new(4).row(),
        ],
        2020,
    );

    let mut cfg = vehicles(Metric::Count);
    cfg.age_ranges = vec![AgeRange::between(0, 2)];
    assert_eq!(points(&engine, &cfg), vec![(2020, 1.0)]);

    cfg.age_ranges = vec![AgeRange::at_least(10)];
    assert_eq!(points(&engine, &cfg), vec![(2020, 2.0)]);

    cfg.age_ranges = vec![AgeRange::between(1, 1), AgeRange::between(10, 10)];
    assert_eq!(points(&engine, &cfg), vec![(2020, 2.0)]);
}

#[test]
fn license_filters() {
    let engine = Engine::open_in_memory().unwrap();
    let rows = vec![
        license_row(1, "F", "5-9 ans", true),
        license_row(2, "F", "< 2 ans", false),
        license_row(3, "M", "5-9 ans", false),
    ];
    let outcome = engine.import_batch(rows, 2022, EntityType::License).unwrap();
    assert_eq!(outcome.success_count, 3);

    let mut cfg = FilterConfiguration::new(EntityType::License, Metric::Count);
    cfg.genders.insert(option_id(&engine, Dimension::Gender, "F"));
    assert_eq!(points(&engine, &cfg), vec![(2022, 2.0)]);

    cfg.experience_levels.insert("5-9 ans".to_string());
    assert_eq!(points(&engine, &cfg), vec![(2022, 1.0)]);

    let mut cfg = FilterConfiguration::new(EntityType::License, Metric::Count);
    cfg.license_classes.insert(LicenseClass::Probationary);
    assert_eq!(points(&engine, &cfg), vec![(2022, 1.0)]);
    cfg.license_classes.insert(LicenseClass::DriverLicense5);
    assert_eq!(points(&engine, &cfg), vec![(2022, 3.0)]);
}

#[test]
fn region_filter_applies_to_licenses() {
    let engine = Engine::open_in_memory().unwrap();
    engine
        .import_batch(vec![license_row(1, "M", "", false)], 2021, EntityType::License)
        .unwrap();
    let mut cfg = FilterConfiguration::new(EntityType::License, Metric::Count);
    cfg.admin_regions
        .insert(option_id(&engine, Dimension::AdminRegion, "Laval (13)"));
    assert_eq!(points(&engine, &cfg), vec![(2021, 1.0)]);
}

// ═══════════════════════════════════════════════════════════════════════
// Metrics
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn aggregates_ignore_missing_operands() {
    let engine = Engine::open_in_memory().unwrap();
    import(
        &engine,
        vec![
            Vehicle::new(1).mass(1000.0).model_year(2015).row(),
            Vehicle::new(2).mass(2000.0).model_year(2019).row(),
            Vehicle::new(3).row(),
        ],
        2020,
    );

    let field = MetricField::NetMass;
    assert_eq!(points(&engine, &vehicles(Metric::Sum { field })), vec![(2020, 3000.0)]);
    assert_eq!(points(&engine, &vehicles(Metric::Average { field })), vec![(2020, 1500.0)]);
    assert_eq!(points(&engine, &vehicles(Metric::Minimum { field })), vec![(2020, 1000.0)]);
    assert_eq!(points(&engine, &vehicles(Metric::Maximum { field })), vec![(2020, 2000.0)]);

    let age = vehicles(Metric::Average {
        field: MetricField::VehicleAge,
    });
    assert_eq!(points(&engine, &age), vec![(2020, 3.0)]);
}

#[test]
fn coverage_modes() {
    let engine = Engine::open_in_memory().unwrap();
    import(
        &engine,
        vec![
            Vehicle::new(1).fuel("E").row(),
            Vehicle::new(2).fuel("D").row(),
            Vehicle::new(3).fuel("E").row(),
            Vehicle::new(4).row(),
        ],
        2020,
    );
    let field = CoverageField::FuelType;
    let share = vehicles(Metric::Coverage {
        field,
        mode: CoverageMode::Percentage,
    });
    assert_eq!(points(&engine, &share), vec![(2020, 75.0)]);
    let missing = vehicles(Metric::Coverage {
        field,
        mode: CoverageMode::NullCount,
    });
    assert_eq!(points(&engine, &missing), vec![(2020, 1.0)]);
}

#[test]
fn road_wear_coefficients_by_vehicle_type() {
    let engine = Engine::open_in_memory().unwrap();
    import(
        &engine,
        vec![
            Vehicle::new(1).vehicle_type("CA").mass(1000.0).row(),
            Vehicle::new(2).vehicle_type("AB").mass(1000.0).row(),
            Vehicle::new(3).vehicle_type("AU").mass(1000.0).row(),
            Vehicle::new(4).mass(1000.0).row(),
            Vehicle::new(5).vehicle_type("CA").row(),
        ],
        2020,
    );
    let m4 = 1000.0_f64.powi(4);
    let expected_sum = (0.0234 + 0.1935 + 0.125 + 0.125) * m4;

    let sum = points(
        &engine,
        &vehicles(Metric::RoadWearIndex {
            mode: RoadWearMode::Sum,
            normalize: false,
        }),
    );
    assert_eq!(sum.len(), 1);
    assert_close(sum[0].1, expected_sum);

    let avg = points(
        &engine,
        &vehicles(Metric::RoadWearIndex {
            mode: RoadWearMode::Average,
            normalize: false,
        }),
    );
    assert_close(avg[0].1, expected_sum / 4.0);
}

#[test]
fn road_wear_normalized_to_first_year() {
    let engine = Engine::open_in_memory().unwrap();
    let fleet = |year: i64, n: usize| -> Vec<_> {
        (0..n)
            .map(|i| Vehicle::new(format!("{year}-{i}")).vehicle_type("AU").mass(10.0).row())
            .collect()
    };
    import(&engine, fleet(2020, 2), 2020);
    import(&engine, fleet(2021, 3), 2021);

    let cfg = vehicles(Metric::RoadWearIndex {
        mode: RoadWearMode::Sum,
        normalize: true,
    });
    assert_eq!(points(&engine, &cfg), vec![(2020, 1.0), (2021, 1.5)]);
}

#[test]
fn percentage_against_baseline() {
    let engine = Engine::open_in_memory().unwrap();
    let mut rows = common::fleet("h", 1, "HONDA", "CIVIC");
    rows.extend(common::fleet("k", 3, "KIA", "RIO"));
    import(&engine, rows, 2020);
    import(&engine, common::fleet("k21", 2, "KIA", "RIO"), 2021);

    let honda = option_id(&engine, Dimension::Make, "HONDA");
    let mut numerator = vehicles(Metric::Percentage);
    numerator.makes.insert(honda);
    let cfg = numerator
        .clone()
        .with_baseline(vehicles(Metric::Count));
    assert_eq!(points(&engine, &cfg), vec![(2020, 25.0)]);

    // Baseline with no rows in the numerator's year.
    let cfg = numerator
        .clone()
        .with_baseline(vehicles(Metric::Count).with_years([2021]));
    assert_eq!(points(&engine, &cfg), vec![(2020, 0.0)]);

    // No baseline: every point is 100.
    let all = vehicles(Metric::Percentage);
    assert_eq!(points(&engine, &all), vec![(2020, 100.0), (2021, 100.0)]);
}

#[test]
fn percentage_baseline_must_share_entity() {
    let engine = Engine::open_in_memory().unwrap();
    let cfg = vehicles(Metric::Percentage)
        .with_baseline(FilterConfiguration::new(EntityType::License, Metric::Count));
    let err = engine.execute(&cfg).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Query(QueryError::InvalidConfiguration { .. })
    ));
    assert_eq!(err.error_code(), "INVALID_QUERY");
}

// ═══════════════════════════════════════════════════════════════════════
// Preparation & naming
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn limit_to_curated_years() {
    let engine = common::engine_with_years(&[2020], &[2021]);
    import(&engine, common::fleet("a", 2, "KIA", "RIO"), 2020);
    import(&engine, common::fleet("b", 5, "KIA", "RIO"), 2021);

    let mut cfg = vehicles(Metric::Count);
    cfg.limit_to_curated_years = true;
    assert_eq!(points(&engine, &cfg), vec![(2020, 2.0)]);

    let disjoint = cfg.clone().with_years([2021]);
    assert!(engine.execute(&disjoint).unwrap().is_empty());

    let engine = Engine::open_in_memory().unwrap();
    let err = engine.execute(&cfg).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Query(QueryError::Regularization(
            RegularizationError::NoCuratedYears
        ))
    ));
}

#[test]
fn invalid_configurations_are_rejected() {
    let engine = Engine::open_in_memory().unwrap();
    let mut cfg = vehicles(Metric::Count);
    cfg.license_classes.insert(LicenseClass::DriverLicense8);
    assert!(matches!(
        engine.execute(&cfg),
        Err(EngineError::Query(QueryError::InvalidConfiguration { .. }))
    ));
}

#[test]
fn series_names() {
    let engine = Engine::open_in_memory().unwrap();
    import(&engine, common::fleet("a", 1, "KIA", "RIO"), 2020);

    let cfg = vehicles(Metric::Count).with_years([2020]);
    assert_eq!(engine.execute(&cfg).unwrap().name, "Count of vehicles [year: 2020]");

    let mut named = cfg.clone();
    named.series_name = Some("Fleet".to_string());
    let series = engine.execute(&named).unwrap();
    assert_eq!(series.name, "Fleet");
    assert_eq!(series.configuration, named);
}

#[test]
fn concurrent_execution_keeps_input_order() {
    let engine = Engine::open_in_memory().unwrap();
    import(&engine, common::fleet("a", 2, "KIA", "RIO"), 2020);
    import(&engine, common::fleet("b", 4, "KIA", "RIO"), 2021);

    let configs: Vec<_> = [2021, 2020, 2021]
        .into_iter()
        .map(|y| vehicles(Metric::Count).with_years([y]))
        .collect();
    let results = engine.execute_all(&configs);
    let values: Vec<f64> = results
        .into_iter()
        .map(|r| r.unwrap().points[0].value)
        .collect();
    assert_eq!(values, vec![4.0, 2.0, 4.0]);
}
