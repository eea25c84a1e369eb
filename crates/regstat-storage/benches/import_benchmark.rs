//! Criterion benchmarks for the import path.
//!
//! - Dimension resolution, warm cache (10K lookups)
//! - Vehicle batch import (1K rows, 50 makes)

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use regstat_core::traits::{RawRow, StandardRowDecoder};
use regstat_core::types::{Dimension, EntityType};
use regstat_storage::dimensions::{DimensionStore, NaturalKey};
use regstat_storage::{DatabaseManager, ImportPipeline};

fn vehicle_rows(n: usize) -> Vec<RawRow> {
    (0..n)
        .map(|i| {
            [
                ("NOSEQ_VEH", format!("B{i:08}")),
                ("CLAS", "PAU".to_string()),
                ("TYP_VEH_CATEG_USA", "AU".to_string()),
                ("MARQ_VEH", format!("MAKE{}", i % 50)),
                ("MODEL_VEH", format!("MODEL{}", i % 400)),
                ("ANNEE_MOD", (2000 + i % 24).to_string()),
                ("MASSE_NETTE", (900 + i % 2000).to_string()),
                ("COUL_ORIG", ["BLANC", "NOIR", "GRIS", "ROUGE"][i % 4].to_string()),
                ("TYP_CARBU", ["E", "D", "L", "H"][i % 4].to_string()),
                ("REG_ADM", format!("Region {} ({:02})", i % 17, i % 17)),
                ("MRC", format!("Mrc {} ({:02} )", i % 90, i % 90)),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
        })
        .collect()
}

fn bench_dimension_resolution(c: &mut Criterion) {
    let db = DatabaseManager::open_in_memory().unwrap();
    c.bench_function("dimension_resolve_warm_10k", |b| {
        b.iter(|| {
            db.with_writer(|conn| {
                let mut store = DimensionStore::new();
                for i in 0..10_000 {
                    let name = format!("MAKE{}", i % 100);
                    store.resolve(conn, Dimension::Make, NaturalKey::Name(name))?;
                }
                Ok(store.cached_entries())
            })
            .unwrap()
        })
    });
}

fn bench_batch_import(c: &mut Criterion) {
    let rows = vehicle_rows(1_000);
    c.bench_function("vehicle_batch_import_1k", |b| {
        b.iter_batched(
            || DatabaseManager::open_in_memory().unwrap(),
            |db| {
                ImportPipeline::default()
                    .import_batch(&db, &rows, 2022, EntityType::Vehicle, &StandardRowDecoder)
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_dimension_resolution, bench_batch_import);
criterion_main!(benches);
