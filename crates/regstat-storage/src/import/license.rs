//! License fact rows.

use regstat_core::errors::StorageError;
use regstat_core::traits::{RawRow, RowDecoder};
use regstat_core::types::Dimension;
use rusqlite::{params, Connection};

use super::fields::license as f;
use super::BatchContext;
use crate::dimensions::geo::parse_geo;
use crate::dimensions::NaturalKey;
use crate::sql_err;

const UPSERT_LICENSE: &str = "
    INSERT INTO licenses (
        year, license_sequence, year_id, age_group_id, gender_id,
        admin_region_id, mrc_id, license_type_id,
        has_learner_permit_123, has_learner_permit_5, has_learner_permit_6a6r,
        has_driver_license_1234, has_driver_license_5, has_driver_license_6abce,
        has_driver_license_6d, has_driver_license_8, is_probationary,
        experience_1234, experience_5, experience_6abce, experience_global
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)
    ON CONFLICT(year, license_sequence) DO UPDATE SET
        year_id = excluded.year_id,
        age_group_id = excluded.age_group_id,
        gender_id = excluded.gender_id,
        admin_region_id = excluded.admin_region_id,
        mrc_id = excluded.mrc_id,
        license_type_id = excluded.license_type_id,
        has_learner_permit_123 = excluded.has_learner_permit_123,
        has_learner_permit_5 = excluded.has_learner_permit_5,
        has_learner_permit_6a6r = excluded.has_learner_permit_6a6r,
        has_driver_license_1234 = excluded.has_driver_license_1234,
        has_driver_license_5 = excluded.has_driver_license_5,
        has_driver_license_6abce = excluded.has_driver_license_6abce,
        has_driver_license_6d = excluded.has_driver_license_6d,
        has_driver_license_8 = excluded.has_driver_license_8,
        is_probationary = excluded.is_probationary,
        experience_1234 = excluded.experience_1234,
        experience_5 = excluded.experience_5,
        experience_6abce = excluded.experience_6abce,
        experience_global = excluded.experience_global";

pub(crate) fn import_row(
    conn: &Connection,
    ctx: &mut BatchContext,
    decoder: &dyn RowDecoder,
    row: &RawRow,
    year: i64,
) -> Result<(), StorageError> {
    let sequence = decoder
        .text(row, f::SEQUENCE)
        .ok_or_else(|| StorageError::import(format!("missing {}", f::SEQUENCE)))?;

    let store = &mut ctx.store;
    let year_id = store.resolve(conn, Dimension::Year, NaturalKey::Integer(year))?;
    let age_group_id = store.resolve_code(conn, Dimension::AgeGroup, decoder.text(row, f::AGE_GROUP))?;
    let gender_id = store.resolve_code(conn, Dimension::Gender, decoder.text(row, f::GENDER))?;
    let license_type_id =
        store.resolve_code(conn, Dimension::LicenseType, decoder.text(row, f::LICENSE_TYPE))?;
    let admin_region_id = store.resolve_geo(
        conn,
        Dimension::AdminRegion,
        decoder.text(row, f::ADMIN_REGION).and_then(parse_geo),
    )?;
    let mrc_id = store.resolve_geo(
        conn,
        Dimension::Mrc,
        decoder.text(row, f::MRC).and_then(parse_geo),
    )?;

    conn.prepare_cached(UPSERT_LICENSE)
        .map_err(sql_err)?
        .execute(params![
            year,
            sequence,
            year_id,
            age_group_id,
            gender_id,
            admin_region_id,
            mrc_id,
            license_type_id,
            decoder.flag(row, f::LEARNER_PERMIT_123),
            decoder.flag(row, f::LEARNER_PERMIT_5),
            decoder.flag(row, f::LEARNER_PERMIT_6A6R),
            decoder.flag(row, f::DRIVER_LICENSE_1234),
            decoder.flag(row, f::DRIVER_LICENSE_5),
            decoder.flag(row, f::DRIVER_LICENSE_6ABCE),
            decoder.flag(row, f::DRIVER_LICENSE_6D),
            decoder.flag(row, f::DRIVER_LICENSE_8),
            decoder.flag(row, f::PROBATIONARY),
            decoder.text(row, f::EXPERIENCE_1234),
            decoder.text(row, f::EXPERIENCE_5),
            decoder.text(row, f::EXPERIENCE_6ABCE),
            decoder.text(row, f::EXPERIENCE_GLOBAL),
        ])
        .map_err(sql_err)?;
    Ok(())
}
