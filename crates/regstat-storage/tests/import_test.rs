//! Import pipeline and session tests.

use regstat_core::traits::{RawRow, StandardRowDecoder};
use regstat_core::types::EntityType;
use regstat_storage::connection::pragmas::{
    apply_pragmas, relax_for_bulk_load, restore_after_bulk_load, synchronous_level,
};
use regstat_storage::indexes::{existing_secondary_indexes, SECONDARY_INDEXES};
use regstat_storage::queries::geography::{
    insert_geographic_entities, GeoEntityType, GeographicEntity,
};
use regstat_storage::migrations::run_migrations;
use regstat_storage::queries::{import_log, statistics};
use regstat_storage::{DatabaseManager, ImportPipeline, ImportSession, IndexStrategy};
use rusqlite::Connection;

fn vehicle_row(seq: usize, make: &str, model: &str, municipality: &str) -> RawRow {
    [
        ("NOSEQ_VEH", format!("V{seq:06}")),
        ("CLAS", "PAU".to_string()),
        ("TYP_VEH_CATEG_USA", "AU".to_string()),
        ("MARQ_VEH", make.to_string()),
        ("MODEL_VEH", model.to_string()),
        ("ANNEE_MOD", "2018".to_string()),
        ("MASSE_NETTE", "1450".to_string()),
        ("NB_CYL", "4".to_string()),
        ("CYL_VEH", "1998,0".to_string()),
        ("NB_ESIEU_MAX", "2".to_string()),
        ("COUL_ORIG", "BLANC".to_string()),
        ("TYP_CARBU", "E".to_string()),
        ("REG_ADM", "Montréal (06)".to_string()),
        ("MRC", "Montréal (66 )".to_string()),
        ("CG_FIXE", municipality.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn license_row(seq: usize, gender: &str, probationary: bool) -> RawRow {
    [
        ("NOSEQ_TITULAIRE", format!("L{seq:06}")),
        ("AGE_1ER_JUIN", "25-34".to_string()),
        ("SEXE", gender.to_string()),
        ("MRC", "Laval (65 )".to_string()),
        ("REG_ADM", "Laval (13)".to_string()),
        ("TYPE_PERMIS", "REGULIER".to_string()),
        ("IND_PERMISCONDUIRE_5", "OUI".to_string()),
        ("IND_PROBATOIRE", if probationary { "OUI" } else { "NON" }.to_string()),
        ("EXPERIENCE_GLOBALE", "5-9 ans".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn count(db: &DatabaseManager, sql: &str) -> i64 {
    db.with_reader(|conn| {
        conn.query_row(sql, [], |r| r.get(0))
            .map_err(|e| regstat_core::errors::StorageError::query(e.to_string()))
    })
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Batch semantics
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn unparseable_geography_is_not_a_row_failure() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let rows: Vec<RawRow> = (0..100)
        .map(|i| {
            let municipality = if i % 40 == 7 { "Montréal" } else { "Montréal (66023)" };
            vehicle_row(i, "HONDA", "CIVIC", municipality)
        })
        .collect();

    let outcome = ImportPipeline::default()
        .import_batch(&db, &rows, 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();

    assert_eq!(outcome.success_count, 100);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM vehicles"), 100);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM vehicles WHERE municipality_id IS NULL"),
        3
    );
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM vehicles WHERE admin_region_id IS NULL"),
        0
    );
}

#[test]
fn rows_without_sequence_are_counted_and_skipped() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut rows: Vec<RawRow> = (0..10).map(|i| vehicle_row(i, "FORD", "F-150", "")).collect();
    rows[3].remove("NOSEQ_VEH");
    rows[8].insert("NOSEQ_VEH".to_string(), "   ".to_string());

    let outcome = ImportPipeline::default()
        .import_batch(&db, &rows, 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();

    assert_eq!(outcome.success_count, 8);
    assert_eq!(outcome.error_count, 2);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM vehicles"), 8, "batch still commits");
}

#[test]
fn dimension_ids_stable_across_batches() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let pipeline = ImportPipeline::default();
    let first: Vec<RawRow> = (0..5).map(|i| vehicle_row(i, "TOYOTA", "COROLLA", "")).collect();
    let second: Vec<RawRow> = (0..5).map(|i| vehicle_row(i, "TOYOTA", "COROLLA", "")).collect();

    pipeline
        .import_batch(&db, &first, 2021, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();
    pipeline
        .import_batch(&db, &second, 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM make_enum"), 1);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM model_enum"), 1);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM year_enum"), 2);
    assert_eq!(count(&db, "SELECT COUNT(DISTINCT make_id) FROM vehicles"), 1);
}

#[test]
fn reimporting_a_sequence_replaces_the_row() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let pipeline = ImportPipeline::default();
    pipeline
        .import_batch(&db, &[vehicle_row(1, "KIA", "RIO", "")], 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();
    pipeline
        .import_batch(&db, &[vehicle_row(1, "KIA", "SOUL", "")], 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM vehicles"), 1);
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM vehicles v JOIN model_enum m ON m.id = v.model_id WHERE m.name = 'SOUL'"
        ),
        1
    );
}

#[test]
fn numeric_fields_and_descriptions_are_stored() {
    let db = DatabaseManager::open_in_memory().unwrap();
    ImportPipeline::default()
        .import_batch(&db, &[vehicle_row(1, "MAZDA", "3", "")], 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();

    let (mass, displacement, model_year): (f64, f64, i64) = db
        .with_reader(|conn| {
            conn.query_row(
                "SELECT net_mass, displacement, model_year FROM vehicles",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .map_err(|e| regstat_core::errors::StorageError::query(e.to_string()))
        })
        .unwrap();
    assert_eq!(mass, 1450.0);
    assert_eq!(displacement, 1998.0);
    assert_eq!(model_year, 2018);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM fuel_type_enum WHERE description = 'Gasoline'"),
        1
    );
}

#[test]
fn registered_bare_municipality_code_resolves() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_writer(|conn| {
        insert_geographic_entities(
            conn,
            &[GeographicEntity::new("66023", "Montréal", GeoEntityType::Municipality)],
        )
    })
    .unwrap();

    ImportPipeline::default()
        .import_batch(&db, &[vehicle_row(1, "BMW", "X3", "66023")], 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();

    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM vehicles v JOIN municipality_enum m ON m.id = v.municipality_id
             WHERE m.code = '66023' AND m.name = 'Montréal'"
        ),
        1
    );
}

#[test]
fn license_flags_and_experience() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let rows = vec![license_row(1, "F", true), license_row(2, "M", false), license_row(3, "F", false)];
    let outcome = ImportPipeline::default()
        .import_batch(&db, &rows, 2023, EntityType::License, &StandardRowDecoder)
        .unwrap();

    assert_eq!(outcome.success_count, 3);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM licenses WHERE is_probationary = 1"), 1);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM licenses WHERE has_driver_license_5 = 1"), 3);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM licenses WHERE has_driver_license_1234 = 1"), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM gender_enum"), 2);
    assert_eq!(
        count(&db, "SELECT COUNT(*) FROM licenses WHERE experience_global = '5-9 ans'"),
        3
    );
}

#[test]
fn durability_restored_after_batch() {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseManager::open(&dir.path().join("regstat.db"), 2).unwrap();
    ImportPipeline::new(true)
        .import_batch(&db, &[vehicle_row(1, "AUDI", "A4", "")], 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();

    let level = db.with_writer(synchronous_level).unwrap();
    assert_eq!(level, 1, "synchronous back to NORMAL");
    let mode: String = db
        .with_writer(|conn| {
            conn.pragma_query_value(None, "journal_mode", |r| r.get(0))
                .map_err(|e| regstat_core::errors::StorageError::query(e.to_string()))
        })
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn busy_journal_falls_back_to_synchronous_off() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regstat.db");
    let writer = Connection::open(&path).unwrap();
    apply_pragmas(&writer).unwrap();
    run_migrations(&writer).unwrap();

    assert!(relax_for_bulk_load(&writer).unwrap());
    restore_after_bulk_load(&writer).unwrap();

    // A second connection mid-read keeps the file in WAL.
    let reader = Connection::open(&path).unwrap();
    reader.execute_batch("BEGIN").unwrap();
    let _: i64 = reader
        .query_row("SELECT COUNT(*) FROM vehicles", [], |r| r.get(0))
        .unwrap();

    assert!(!relax_for_bulk_load(&writer).unwrap());
    assert_eq!(synchronous_level(&writer).unwrap(), 0);

    reader.execute_batch("COMMIT;").unwrap();
    restore_after_bulk_load(&writer).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn small_session_drops_and_rebuilds_indexes() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let rows: Vec<RawRow> = (0..20).map(|i| vehicle_row(i, "HONDA", "FIT", "")).collect();

    let mut session = ImportSession::begin(&db, ImportPipeline::default(), 20, 1_000).unwrap();
    assert_eq!(session.strategy(), IndexStrategy::DropAndRebuild);
    assert!(db.with_reader(existing_secondary_indexes).unwrap().is_empty());

    session
        .import_file("vehicules_2022.csv", &rows, 2022, EntityType::Vehicle, &StandardRowDecoder)
        .unwrap();
    let summary = session.finish().unwrap();

    assert_eq!(summary.totals.success_count, 20);
    assert_eq!(summary.files, 1);
    assert_eq!(
        db.with_reader(existing_secondary_indexes).unwrap().len(),
        SECONDARY_INDEXES.len()
    );

    let log = db.with_reader(|conn| import_log::recent_entries(conn, 10)).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].file_name, "vehicules_2022.csv");
    assert_eq!(log[0].record_count, 20);
    assert_eq!(log[0].status, import_log::STATUS_COMPLETED);
}

#[test]
fn large_session_keeps_indexes() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let session = ImportSession::begin(&db, ImportPipeline::default(), 5_000, 1_000).unwrap();
    assert_eq!(session.strategy(), IndexStrategy::KeepAndAnalyze);
    assert_eq!(
        db.with_reader(existing_secondary_indexes).unwrap().len(),
        SECONDARY_INDEXES.len()
    );
    session.finish().unwrap();
}

#[test]
fn abandoned_session_restores_indexes() {
    let db = DatabaseManager::open_in_memory().unwrap();
    {
        let _session = ImportSession::begin(&db, ImportPipeline::default(), 1, 1_000).unwrap();
        assert!(db.with_reader(existing_secondary_indexes).unwrap().is_empty());
    }
    assert_eq!(
        db.with_reader(existing_secondary_indexes).unwrap().len(),
        SECONDARY_INDEXES.len()
    );
}

#[test]
fn statistics_count_rows_per_year() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let pipeline = ImportPipeline::default();
    let a: Vec<RawRow> = (0..3).map(|i| vehicle_row(i, "VW", "GOLF", "")).collect();
    let b: Vec<RawRow> = (0..5).map(|i| vehicle_row(i, "VW", "GOLF", "")).collect();
    pipeline.import_batch(&db, &a, 2021, EntityType::Vehicle, &StandardRowDecoder).unwrap();
    pipeline.import_batch(&db, &b, 2022, EntityType::Vehicle, &StandardRowDecoder).unwrap();
    pipeline
        .import_batch(&db, &[license_row(1, "M", false)], 2022, EntityType::License, &StandardRowDecoder)
        .unwrap();

    let stats = db.with_reader(statistics::database_statistics).unwrap();
    assert_eq!(stats.vehicle_rows, 8);
    assert_eq!(stats.license_rows, 1);
    assert_eq!(stats.vehicles_per_year.get(&2021), Some(&3));
    assert_eq!(stats.vehicles_per_year.get(&2022), Some(&5));
}
