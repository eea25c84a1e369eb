//! Road wear index: fourth-power load law over net mass.
//!
//! Each vehicle contributes `coefficient(type) * mass^4`, where the
//! coefficient folds the share of mass carried by each axle into the
//! exponent. Trucks and tool vehicles spread load over more axles than
//! buses; everything else is treated as a two-axle vehicle.

use regstat_core::types::{RoadWearMode, TimeSeriesPoint};
use rusqlite::types::Value;

pub const TRUCK_TYPE_CODES: [&str; 2] = ["CA", "VO"];
pub const BUS_TYPE_CODE: &str = "AB";

pub const TRUCK_COEFFICIENT: f64 = 0.0234;
pub const BUS_COEFFICIENT: f64 = 0.1935;
pub const DEFAULT_COEFFICIENT: f64 = 0.125;

/// Coefficient for a vehicle type code (`None` when the type is unknown).
pub fn coefficient(vehicle_type_code: Option<&str>) -> f64 {
    match vehicle_type_code {
        Some(code) if TRUCK_TYPE_CODES.contains(&code) => TRUCK_COEFFICIENT,
        Some(BUS_TYPE_CODE) => BUS_COEFFICIENT,
        _ => DEFAULT_COEFFICIENT,
    }
}

/// Per-vehicle contribution.
pub fn contribution(vehicle_type_code: Option<&str>, net_mass: f64) -> f64 {
    coefficient(vehicle_type_code) * net_mass.powi(4)
}

/// Aggregate expression over `vt.code` and `f.net_mass`, with its bound
/// parameters. Requires `vt` to be joined and `f.net_mass` non-null.
pub fn aggregate_sql(mode: RoadWearMode) -> (String, Vec<Value>) {
    let agg = match mode {
        RoadWearMode::Sum => "SUM",
        RoadWearMode::Average => "AVG",
    };
    let sql = format!(
        "{agg}((CASE WHEN vt.code IN (?, ?) THEN ? WHEN vt.code = ? THEN ? ELSE ? END) \
         * f.net_mass * f.net_mass * f.net_mass * f.net_mass)"
    );
    let params = vec![
        Value::Text(TRUCK_TYPE_CODES[0].to_string()),
        Value::Text(TRUCK_TYPE_CODES[1].to_string()),
        Value::Real(TRUCK_COEFFICIENT),
        Value::Text(BUS_TYPE_CODE.to_string()),
        Value::Real(BUS_COEFFICIENT),
        Value::Real(DEFAULT_COEFFICIENT),
    ];
    (sql, params)
}

/// Divide every point by the first year's value. Left untouched when that
/// value is not positive.
pub fn normalize(points: &mut [TimeSeriesPoint]) {
    let Some(base) = points.first().map(|p| p.value) else {
        return;
    };
    if base <= 0.0 {
        return;
    }
    for p in points.iter_mut() {
        p.value /= base;
    }
}
