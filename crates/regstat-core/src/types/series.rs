//! Year-indexed result series.

use serde::{Deserialize, Serialize};

use super::FilterConfiguration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub year: i64,
    pub value: f64,
    pub label: Option<String>,
}

impl TimeSeriesPoint {
    pub fn new(year: i64, value: f64) -> Self {
        Self {
            year,
            value,
            label: None,
        }
    }
}

/// Ordered (ascending year) result of executing one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredDataSeries {
    pub name: String,
    pub configuration: FilterConfiguration,
    pub points: Vec<TimeSeriesPoint>,
}

impl FilteredDataSeries {
    pub fn value_for(&self, year: i64) -> Option<f64> {
        self.points.iter().find(|p| p.year == year).map(|p| p.value)
    }

    pub fn years(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
