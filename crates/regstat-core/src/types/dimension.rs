//! Categorical dimensions and their identity values.

use serde::{Deserialize, Serialize};

use super::EntityType;

/// Surrogate integer identity of a dimension row. Immutable once assigned.
pub type DimensionId = i64;

/// Every categorical attribute stored as an integer-keyed dimension table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Year,
    VehicleClass,
    VehicleType,
    Make,
    Model,
    ModelYear,
    CylinderCount,
    AxleCount,
    Color,
    FuelType,
    AdminRegion,
    Mrc,
    Municipality,
    Gender,
    AgeGroup,
    LicenseType,
}

impl Dimension {
    pub const ALL: [Dimension; 16] = [
        Self::Year,
        Self::VehicleClass,
        Self::VehicleType,
        Self::Make,
        Self::Model,
        Self::ModelYear,
        Self::CylinderCount,
        Self::AxleCount,
        Self::Color,
        Self::FuelType,
        Self::AdminRegion,
        Self::Mrc,
        Self::Municipality,
        Self::Gender,
        Self::AgeGroup,
        Self::LicenseType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::VehicleClass => "vehicle_class",
            Self::VehicleType => "vehicle_type",
            Self::Make => "make",
            Self::Model => "model",
            Self::ModelYear => "model_year",
            Self::CylinderCount => "cylinder_count",
            Self::AxleCount => "axle_count",
            Self::Color => "color",
            Self::FuelType => "fuel_type",
            Self::AdminRegion => "admin_region",
            Self::Mrc => "mrc",
            Self::Municipality => "municipality",
            Self::Gender => "gender",
            Self::AgeGroup => "age_group",
            Self::LicenseType => "license_type",
        }
    }

    /// Geographic dimensions are keyed by a `(name, code)` pair decoded from
    /// a single `"Name (Code)"` string.
    pub fn is_geographic(self) -> bool {
        matches!(self, Self::AdminRegion | Self::Mrc | Self::Municipality)
    }

    /// Whether the dimension is referenced by the given fact table.
    pub fn applies_to(self, entity: EntityType) -> bool {
        match self {
            Self::Year | Self::AdminRegion | Self::Mrc => true,
            Self::Gender | Self::AgeGroup | Self::LicenseType => entity == EntityType::License,
            _ => entity == EntityType::Vehicle,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One selectable value of a dimension, as offered to filter pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionOption {
    pub id: DimensionId,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geographic_dimensions() {
        let geo: Vec<_> = Dimension::ALL.iter().filter(|d| d.is_geographic()).collect();
        assert_eq!(geo, vec![&Dimension::AdminRegion, &Dimension::Mrc, &Dimension::Municipality]);
    }

    #[test]
    fn license_only_dimensions_do_not_apply_to_vehicles() {
        assert!(!Dimension::Gender.applies_to(EntityType::Vehicle));
        assert!(Dimension::Gender.applies_to(EntityType::License));
        assert!(!Dimension::Make.applies_to(EntityType::License));
        assert!(Dimension::Mrc.applies_to(EntityType::License));
        assert!(Dimension::Mrc.applies_to(EntityType::Vehicle));
    }
}
