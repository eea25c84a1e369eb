//! Declarative filter and metric configuration compiled into analytical queries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{DimensionId, EntityType};

/// Numeric operand of the sum/average/minimum/maximum metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    NetMass,
    Displacement,
    CylinderCount,
    AxleCount,
    ModelYear,
    /// Derived: `year - model_year`.
    VehicleAge,
}

impl MetricField {
    pub fn label(self) -> &'static str {
        match self {
            Self::NetMass => "net mass",
            Self::Displacement => "displacement",
            Self::CylinderCount => "cylinder count",
            Self::AxleCount => "axle count",
            Self::ModelYear => "model year",
            Self::VehicleAge => "vehicle age",
        }
    }
}

/// Field whose presence is measured by the coverage metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageField {
    NetMass,
    Displacement,
    CylinderCount,
    AxleCount,
    ModelYear,
    VehicleClass,
    VehicleType,
    Make,
    Model,
    Color,
    FuelType,
    AdminRegion,
    Mrc,
    Municipality,
    Gender,
    AgeGroup,
    LicenseType,
    Experience,
}

impl CoverageField {
    pub fn applies_to(self, entity: EntityType) -> bool {
        match self {
            Self::AdminRegion | Self::Mrc => true,
            Self::Gender | Self::AgeGroup | Self::LicenseType | Self::Experience => {
                entity == EntityType::License
            }
            _ => entity == EntityType::Vehicle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NetMass => "net mass",
            Self::Displacement => "displacement",
            Self::CylinderCount => "cylinder count",
            Self::AxleCount => "axle count",
            Self::ModelYear => "model year",
            Self::VehicleClass => "vehicle class",
            Self::VehicleType => "vehicle type",
            Self::Make => "make",
            Self::Model => "model",
            Self::Color => "color",
            Self::FuelType => "fuel type",
            Self::AdminRegion => "admin region",
            Self::Mrc => "MRC",
            Self::Municipality => "municipality",
            Self::Gender => "gender",
            Self::AgeGroup => "age group",
            Self::LicenseType => "license type",
            Self::Experience => "experience",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    /// Percentage of rows where the field is non-null.
    #[default]
    Percentage,
    /// Raw count of rows where the field is null.
    NullCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadWearMode {
    #[default]
    Sum,
    Average,
}

/// Aggregate computed per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Metric {
    Count,
    Sum { field: MetricField },
    Average { field: MetricField },
    Minimum { field: MetricField },
    Maximum { field: MetricField },
    /// Row count relative to the configuration's baseline.
    Percentage,
    Coverage { field: CoverageField, mode: CoverageMode },
    RoadWearIndex { mode: RoadWearMode, normalize: bool },
}

impl Default for Metric {
    fn default() -> Self {
        Self::Count
    }
}

impl Metric {
    pub fn label(&self) -> String {
        match self {
            Self::Count => "Count".to_string(),
            Self::Sum { field } => format!("Sum of {}", field.label()),
            Self::Average { field } => format!("Average {}", field.label()),
            Self::Minimum { field } => format!("Minimum {}", field.label()),
            Self::Maximum { field } => format!("Maximum {}", field.label()),
            Self::Percentage => "Percentage".to_string(),
            Self::Coverage {
                field,
                mode: CoverageMode::Percentage,
            } => format!("Coverage of {}", field.label()),
            Self::Coverage {
                field,
                mode: CoverageMode::NullCount,
            } => format!("Missing {}", field.label()),
            Self::RoadWearIndex { mode, normalize } => {
                let agg = match mode {
                    RoadWearMode::Sum => "Total",
                    RoadWearMode::Average => "Average",
                };
                if *normalize {
                    format!("{agg} road wear index (normalized)")
                } else {
                    format!("{agg} road wear index")
                }
            }
        }
    }
}

/// Vehicle age bucket, `year - model_year`. Bounds are inclusive; an absent
/// maximum is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl AgeRange {
    pub fn between(min: u32, max: u32) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, age: i64) -> bool {
        age >= i64::from(self.min) && self.max.map_or(true, |m| age <= i64::from(m))
    }
}

/// License class indicator flags carried by license fact rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseClass {
    LearnerPermit123,
    LearnerPermit5,
    LearnerPermit6A6R,
    DriverLicense1234,
    DriverLicense5,
    DriverLicense6ABCE,
    DriverLicense6D,
    DriverLicense8,
    Probationary,
}

impl LicenseClass {
    pub const ALL: [LicenseClass; 9] = [
        Self::LearnerPermit123,
        Self::LearnerPermit5,
        Self::LearnerPermit6A6R,
        Self::DriverLicense1234,
        Self::DriverLicense5,
        Self::DriverLicense6ABCE,
        Self::DriverLicense6D,
        Self::DriverLicense8,
        Self::Probationary,
    ];
}

/// A complete, declarative description of one series.
///
/// Every non-empty filter contributes one conjunctive clause; values within a
/// filter are disjunctive. Categorical filters hold dimension ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfiguration {
    pub entity: EntityType,
    pub metric: Metric,
    pub years: BTreeSet<i64>,
    pub admin_regions: BTreeSet<DimensionId>,
    pub mrcs: BTreeSet<DimensionId>,
    pub municipalities: BTreeSet<DimensionId>,
    pub vehicle_classes: BTreeSet<DimensionId>,
    pub vehicle_types: BTreeSet<DimensionId>,
    pub makes: BTreeSet<DimensionId>,
    pub models: BTreeSet<DimensionId>,
    pub colors: BTreeSet<DimensionId>,
    pub model_years: BTreeSet<DimensionId>,
    pub fuel_types: BTreeSet<DimensionId>,
    pub age_ranges: Vec<AgeRange>,
    pub license_types: BTreeSet<DimensionId>,
    pub age_groups: BTreeSet<DimensionId>,
    pub genders: BTreeSet<DimensionId>,
    pub experience_levels: BTreeSet<String>,
    pub license_classes: BTreeSet<LicenseClass>,
    /// Intersect the year filter with the curated year set.
    pub limit_to_curated_years: bool,
    /// Denominator configuration of the percentage metric.
    pub baseline: Option<Box<FilterConfiguration>>,
    /// Explicit series name; generated when absent.
    pub series_name: Option<String>,
}

impl FilterConfiguration {
    pub fn new(entity: EntityType, metric: Metric) -> Self {
        Self {
            entity,
            metric,
            ..Default::default()
        }
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i64>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    pub fn with_baseline(mut self, baseline: FilterConfiguration) -> Self {
        self.baseline = Some(Box::new(baseline));
        self
    }

    /// Filters that only make sense for license rows.
    pub fn has_license_filters(&self) -> bool {
        !self.license_types.is_empty()
            || !self.age_groups.is_empty()
            || !self.genders.is_empty()
            || !self.experience_levels.is_empty()
            || !self.license_classes.is_empty()
    }

    /// Filters that only make sense for vehicle rows.
    pub fn has_vehicle_filters(&self) -> bool {
        !self.municipalities.is_empty()
            || !self.vehicle_classes.is_empty()
            || !self.vehicle_types.is_empty()
            || !self.makes.is_empty()
            || !self.models.is_empty()
            || !self.colors.is_empty()
            || !self.model_years.is_empty()
            || !self.fuel_types.is_empty()
            || !self.age_ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_range_bounds_are_inclusive() {
        let r = AgeRange::between(3, 5);
        assert!(!r.contains(2));
        assert!(r.contains(3));
        assert!(r.contains(5));
        assert!(!r.contains(6));
        assert!(AgeRange::at_least(20).contains(75));
    }

    #[test]
    fn metric_roundtrips_through_json() {
        let metric = Metric::Coverage {
            field: CoverageField::FuelType,
            mode: CoverageMode::NullCount,
        };
        let json = serde_json::to_string(&metric).unwrap();
        let back: Metric = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metric);
    }

    #[test]
    fn license_filters_detected() {
        let mut cfg = FilterConfiguration::new(EntityType::License, Metric::Count);
        assert!(!cfg.has_license_filters());
        cfg.license_classes.insert(LicenseClass::Probationary);
        assert!(cfg.has_license_filters());
        assert!(!cfg.has_vehicle_filters());
    }
}
