//! Domain types shared by storage and analysis.

pub mod collections;
pub mod dimension;
pub mod entity;
pub mod filter;
pub mod series;
pub mod years;

pub use collections::{FxHashMap, FxHashSet};
pub use dimension::{Dimension, DimensionId, DimensionOption};
pub use entity::EntityType;
pub use filter::{
    AgeRange, CoverageField, CoverageMode, FilterConfiguration, LicenseClass, Metric, MetricField,
    RoadWearMode,
};
pub use series::{FilteredDataSeries, TimeSeriesPoint};
pub use years::YearConfiguration;
