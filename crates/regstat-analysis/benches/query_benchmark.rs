//! Query compilation and yearly aggregation throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regstat_analysis::query::compile;
use regstat_analysis::Engine;
use regstat_core::traits::RawRow;
use regstat_core::types::{AgeRange, EntityType, FilterConfiguration, Metric, RoadWearMode};

fn rows(year: i64, n: usize) -> Vec<RawRow> {
    const MAKES: [&str; 4] = ["HONDA", "TOYOTA", "FORD", "KIA"];
    const TYPES: [&str; 3] = ["AU", "CA", "AB"];
    (0..n)
        .map(|i| {
            [
                ("NOSEQ_VEH", format!("{year}-{i}")),
                ("MARQ_VEH", MAKES[i % MAKES.len()].to_string()),
                ("MODEL_VEH", format!("M{}", i % 25)),
                ("TYP_VEH_CATEG_USA", TYPES[i % TYPES.len()].to_string()),
                ("MASSE_NETTE", (900 + i % 3_000).to_string()),
                ("ANNEE_MOD", (year - (i % 20) as i64).to_string()),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
        })
        .collect()
}

fn bench_compile(c: &mut Criterion) {
    let mut cfg = FilterConfiguration::new(EntityType::Vehicle, Metric::Count)
        .with_years(2011..=2023);
    cfg.makes.extend(1..=40);
    cfg.fuel_types.extend([1, 2, 3]);
    cfg.age_ranges = vec![AgeRange::between(0, 4), AgeRange::at_least(15)];

    c.bench_function("compile_filtered_count", |b| {
        b.iter(|| compile(black_box(&cfg)))
    });
}

fn bench_execute(c: &mut Criterion) {
    let config = regstat_core::config::RegstatConfig::from_toml("[query]\nresult_cache_capacity = 0\n")
        .expect("config");
    let engine = Engine::open(&config).expect("engine");
    for year in 2019..=2023 {
        engine
            .import_batch(rows(year, 5_000), year, EntityType::Vehicle)
            .expect("import");
    }
    let road_wear = FilterConfiguration::new(
        EntityType::Vehicle,
        Metric::RoadWearIndex {
            mode: RoadWearMode::Sum,
            normalize: true,
        },
    );

    c.bench_function("road_wear_25k_rows", |b| {
        b.iter(|| engine.execute(black_box(&road_wear)).expect("query"))
    });
}

criterion_group!(benches, bench_compile, bench_execute);
criterion_main!(benches);
