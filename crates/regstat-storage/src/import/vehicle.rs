//! Vehicle fact rows.

use regstat_core::errors::StorageError;
use regstat_core::traits::{RawRow, RowDecoder};
use regstat_core::types::Dimension;
use rusqlite::{params, Connection};

use super::fields::vehicle as f;
use super::BatchContext;
use crate::dimensions::geo::parse_geo;
use crate::dimensions::NaturalKey;
use crate::sql_err;

const UPSERT_VEHICLE: &str = "
    INSERT INTO vehicles (
        year, vehicle_sequence, year_id, vehicle_class_id, vehicle_type_id,
        make_id, model_id, model_year, model_year_id, net_mass, displacement,
        cylinder_count, cylinder_count_id, axle_count, axle_count_id,
        color_id, fuel_type_id, admin_region_id, mrc_id, municipality_id
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
    ON CONFLICT(year, vehicle_sequence) DO UPDATE SET
        year_id = excluded.year_id,
        vehicle_class_id = excluded.vehicle_class_id,
        vehicle_type_id = excluded.vehicle_type_id,
        make_id = excluded.make_id,
        model_id = excluded.model_id,
        model_year = excluded.model_year,
        model_year_id = excluded.model_year_id,
        net_mass = excluded.net_mass,
        displacement = excluded.displacement,
        cylinder_count = excluded.cylinder_count,
        cylinder_count_id = excluded.cylinder_count_id,
        axle_count = excluded.axle_count,
        axle_count_id = excluded.axle_count_id,
        color_id = excluded.color_id,
        fuel_type_id = excluded.fuel_type_id,
        admin_region_id = excluded.admin_region_id,
        mrc_id = excluded.mrc_id,
        municipality_id = excluded.municipality_id";

/// Resolve every dimension of one vehicle record and upsert the fact row.
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
    let class_id = store.resolve_code(conn, Dimension::VehicleClass, decoder.text(row, f::CLASS))?;
    let type_id = store.resolve_code(conn, Dimension::VehicleType, decoder.text(row, f::TYPE))?;

    let make_id = store.resolve_name(conn, Dimension::Make, decoder.text(row, f::MAKE))?;
    // A model without its make has no parent to hang from.
    let model_id = match (make_id, decoder.text(row, f::MODEL)) {
        (Some(make_id), Some(name)) => {
            Some(store.resolve(conn, Dimension::Model, NaturalKey::model(make_id, name))?)
        }
        _ => None,
    };

    let model_year = decoder.integer(row, f::MODEL_YEAR);
    let model_year_id = store.resolve_integer(conn, Dimension::ModelYear, model_year)?;
    let cylinder_count = decoder.integer(row, f::CYLINDER_COUNT);
    let cylinder_count_id = store.resolve_integer(conn, Dimension::CylinderCount, cylinder_count)?;
    let axle_count = decoder.integer(row, f::AXLE_COUNT);
    let axle_count_id = store.resolve_integer(conn, Dimension::AxleCount, axle_count)?;

    let color_id = store.resolve_name(conn, Dimension::Color, decoder.text(row, f::COLOR))?;
    let fuel_type_id = store.resolve_code(conn, Dimension::FuelType, decoder.text(row, f::FUEL_TYPE))?;

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
    let municipality = decoder
        .text(row, f::MUNICIPALITY)
        .and_then(|raw| ctx.municipalities.decode(raw));
    let municipality_id = store.resolve_geo(conn, Dimension::Municipality, municipality)?;

    conn.prepare_cached(UPSERT_VEHICLE)
        .map_err(sql_err)?
        .execute(params![
            year,
            sequence,
            year_id,
            class_id,
            type_id,
            make_id,
            model_id,
            model_year,
            model_year_id,
            decoder.real(row, f::NET_MASS),
            decoder.real(row, f::DISPLACEMENT),
            cylinder_count,
            cylinder_count_id,
            axle_count,
            axle_count_id,
            color_id,
            fuel_type_id,
            admin_region_id,
            mrc_id,
            municipality_id,
        ])
        .map_err(sql_err)?;
    Ok(())
}
