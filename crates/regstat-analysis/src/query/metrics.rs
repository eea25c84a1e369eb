//! Fact-table columns behind each metric operand.

use regstat_core::types::{CoverageField, CoverageMode, LicenseClass, MetricField};

/// Operand expression and the column whose presence it requires.
pub fn metric_operand(field: MetricField) -> (&'static str, &'static str) {
    match field {
        MetricField::NetMass => ("f.net_mass", "f.net_mass"),
        MetricField::Displacement => ("f.displacement", "f.displacement"),
        MetricField::CylinderCount => ("f.cylinder_count", "f.cylinder_count"),
        MetricField::AxleCount => ("f.axle_count", "f.axle_count"),
        MetricField::ModelYear => ("f.model_year", "f.model_year"),
        MetricField::VehicleAge => ("(f.year - f.model_year)", "f.model_year"),
    }
}

pub fn coverage_column(field: CoverageField) -> &'static str {
    match field {
        CoverageField::NetMass => "f.net_mass",
        CoverageField::Displacement => "f.displacement",
        CoverageField::CylinderCount => "f.cylinder_count",
        CoverageField::AxleCount => "f.axle_count",
        CoverageField::ModelYear => "f.model_year",
        CoverageField::VehicleClass => "f.vehicle_class_id",
        CoverageField::VehicleType => "f.vehicle_type_id",
        CoverageField::Make => "f.make_id",
        CoverageField::Model => "f.model_id",
        CoverageField::Color => "f.color_id",
        CoverageField::FuelType => "f.fuel_type_id",
        CoverageField::AdminRegion => "f.admin_region_id",
        CoverageField::Mrc => "f.mrc_id",
        CoverageField::Municipality => "f.municipality_id",
        CoverageField::Gender => "f.gender_id",
        CoverageField::AgeGroup => "f.age_group_id",
        CoverageField::LicenseType => "f.license_type_id",
        CoverageField::Experience => "f.experience_global",
    }
}

pub fn coverage_sql(field: CoverageField, mode: CoverageMode) -> String {
    let col = coverage_column(field);
    match mode {
        CoverageMode::Percentage => {
            format!("SUM(CASE WHEN {col} IS NOT NULL THEN 1 ELSE 0 END) * 100.0 / COUNT(*)")
        }
        CoverageMode::NullCount => format!("SUM(CASE WHEN {col} IS NULL THEN 1 ELSE 0 END)"),
    }
}

pub fn license_class_column(class: LicenseClass) -> &'static str {
    match class {
        LicenseClass::LearnerPermit123 => "f.has_learner_permit_123",
        LicenseClass::LearnerPermit5 => "f.has_learner_permit_5",
        LicenseClass::LearnerPermit6A6R => "f.has_learner_permit_6a6r",
        LicenseClass::DriverLicense1234 => "f.has_driver_license_1234",
        LicenseClass::DriverLicense5 => "f.has_driver_license_5",
        LicenseClass::DriverLicense6ABCE => "f.has_driver_license_6abce",
        LicenseClass::DriverLicense6D => "f.has_driver_license_6d",
        LicenseClass::DriverLicense8 => "f.has_driver_license_8",
        LicenseClass::Probationary => "f.is_probationary",
    }
}
