//! Numerator/baseline join for the percentage metric.

use regstat_core::types::{FxHashMap, TimeSeriesPoint};

/// Join by year over the numerator's years:
/// `numerator / baseline * 100` when the baseline is positive, `0`
/// otherwise. Without a baseline every point is `100`.
pub fn join(numerator: &[TimeSeriesPoint], baseline: Option<&[TimeSeriesPoint]>) -> Vec<TimeSeriesPoint> {
    let Some(baseline) = baseline else {
        return numerator
            .iter()
            .map(|p| TimeSeriesPoint::new(p.year, 100.0))
            .collect();
    };

    let by_year: FxHashMap<i64, f64> = baseline.iter().map(|p| (p.year, p.value)).collect();
    numerator
        .iter()
        .map(|p| {
            let value = match by_year.get(&p.year) {
                Some(&base) if base > 0.0 => p.value / base * 100.0,
                _ => 0.0,
            };
            TimeSeriesPoint::new(p.year, value)
        })
        .collect()
}
