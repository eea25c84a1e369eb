//! Descriptions for well-known registration codes.

use regstat_core::types::Dimension;

const VEHICLE_CLASSES: &[(&str, &str)] = &[
    ("PAU", "Personal automobile or light truck"),
    ("PMC", "Personal motorcycle"),
    ("PCY", "Personal moped"),
    ("PHM", "Personal motorhome"),
    ("CAU", "Commercial automobile or light truck"),
    ("CMC", "Commercial motorcycle"),
    ("CCY", "Commercial moped"),
    ("CHM", "Commercial motorhome"),
    ("TTA", "Taxi"),
    ("TAB", "Bus"),
    ("TAS", "School bus"),
    ("BCA", "Truck or road tractor"),
    ("CVO", "Tool vehicle"),
    ("COT", "Other commercial"),
    ("RAU", "Restricted automobile"),
    ("RMC", "Restricted motorcycle"),
    ("RCY", "Restricted moped"),
    ("RHM", "Restricted motorhome"),
    ("RAB", "Restricted bus"),
    ("RCA", "Restricted truck"),
    ("RMN", "Snowmobile"),
    ("ROT", "Other restricted"),
];

const VEHICLE_TYPES: &[(&str, &str)] = &[
    ("AU", "Automobile or light truck"),
    ("CA", "Truck or road tractor"),
    ("VO", "Tool vehicle"),
    ("AB", "Bus"),
    ("MC", "Motorcycle"),
    ("CY", "Moped"),
    ("HM", "Motorhome"),
    ("MN", "Snowmobile"),
    ("VT", "All-terrain vehicle"),
    ("SN", "Other off-road vehicle"),
];

const FUEL_TYPES: &[(&str, &str)] = &[
    ("E", "Gasoline"),
    ("D", "Diesel"),
    ("L", "Electric"),
    ("H", "Hybrid"),
    ("W", "Plug-in hybrid"),
    ("P", "Propane"),
    ("N", "Natural gas"),
    ("M", "Methanol"),
    ("T", "Ethanol"),
    ("C", "Hydrogen"),
    ("A", "Other"),
    ("S", "No fuel"),
];

const GENDERS: &[(&str, &str)] = &[("M", "Male"), ("F", "Female")];

/// Human description of `code`, when known.
pub fn describe(dimension: Dimension, code: &str) -> Option<&'static str> {
    let table = match dimension {
        Dimension::VehicleClass => VEHICLE_CLASSES,
        Dimension::VehicleType => VEHICLE_TYPES,
        Dimension::FuelType => FUEL_TYPES,
        Dimension::Gender => GENDERS,
        _ => return None,
    };
    table
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, d)| *d)
}
