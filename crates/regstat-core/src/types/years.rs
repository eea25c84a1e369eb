//! Curated / uncurated year split used by regularization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::RegularizationError;

/// Disjoint sets of curated (authoritative coding) and uncurated years.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearConfiguration {
    curated: BTreeSet<i64>,
    uncurated: BTreeSet<i64>,
}

impl YearConfiguration {
    /// Build a configuration, rejecting years present in both sets.
    pub fn new(
        curated: impl IntoIterator<Item = i64>,
        uncurated: impl IntoIterator<Item = i64>,
    ) -> Result<Self, RegularizationError> {
        let curated: BTreeSet<i64> = curated.into_iter().collect();
        let uncurated: BTreeSet<i64> = uncurated.into_iter().collect();
        let overlap: Vec<i64> = curated.intersection(&uncurated).copied().collect();
        if !overlap.is_empty() {
            return Err(RegularizationError::OverlappingYears { years: overlap });
        }
        Ok(Self { curated, uncurated })
    }

    pub fn curated(&self) -> &BTreeSet<i64> {
        &self.curated
    }

    pub fn uncurated(&self) -> &BTreeSet<i64> {
        &self.uncurated
    }

    pub fn is_curated(&self, year: i64) -> bool {
        self.curated.contains(&year)
    }

    pub fn is_uncurated(&self, year: i64) -> bool {
        self.uncurated.contains(&year)
    }

    /// Curated years, or `NoCuratedYears` when none are configured.
    pub fn require_curated(&self) -> Result<Vec<i64>, RegularizationError> {
        if self.curated.is_empty() {
            return Err(RegularizationError::NoCuratedYears);
        }
        Ok(self.curated.iter().copied().collect())
    }

    /// Uncurated years, or `NoUncuratedYears` when none are configured.
    pub fn require_uncurated(&self) -> Result<Vec<i64>, RegularizationError> {
        if self.uncurated.is_empty() {
            return Err(RegularizationError::NoUncuratedYears);
        }
        Ok(self.uncurated.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_years_rejected() {
        let err = YearConfiguration::new([2021, 2022], [2022, 2023]).unwrap_err();
        match err {
            RegularizationError::OverlappingYears { years } => assert_eq!(years, vec![2022]),
            other => panic!("expected OverlappingYears, got {other:?}"),
        }
    }

    #[test]
    fn require_reports_missing_sets() {
        let years = YearConfiguration::default();
        assert!(matches!(
            years.require_curated(),
            Err(RegularizationError::NoCuratedYears)
        ));
        assert!(matches!(
            years.require_uncurated(),
            Err(RegularizationError::NoUncuratedYears)
        ));

        let years = YearConfiguration::new([2011, 2012], [2023]).unwrap();
        assert_eq!(years.require_curated().unwrap(), vec![2011, 2012]);
        assert!(years.is_uncurated(2023));
        assert!(!years.is_curated(2023));
    }
}
