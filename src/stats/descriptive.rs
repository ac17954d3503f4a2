//! Descriptive Statistics Module
//! Summary statistics for numeric sequences (count, mean, spread, percentiles).

use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

use crate::data::Dataset;
use crate::stats::aggregator::Aggregator;

/// Summary of a numeric sequence. Percentiles use linear interpolation
/// between order statistics (NumPy compatible).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub p25: f64,
    pub p75: f64,
}

impl SummaryStats {
    /// None on empty input; standard deviation is the sample estimate (n-1),
    /// zero for a single value.
    pub fn from_values(values: &[f64]) -> Option<SummaryStats> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().mean();
        let std = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };

        Some(SummaryStats {
            count: values.len(),
            mean,
            median: percentile(&sorted, 50.0),
            std,
            p25: percentile(&sorted, 25.0),
            p75: percentile(&sorted, 75.0),
        })
    }
}

/// Work-hours summary per income bracket.
pub fn hours_summary_by_bracket(ds: &Dataset) -> BTreeMap<String, SummaryStats> {
    Aggregator::hours_by_bracket(ds)
        .into_iter()
        .filter_map(|(bracket, hours)| SummaryStats::from_values(&hours).map(|s| (bracket, s)))
        .collect()
}

/// Percentile by linear interpolation over a sorted slice.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_close(percentile(&sorted, 25.0), 2.0);
        assert_close(percentile(&sorted, 50.0), 3.0);
        assert_close(percentile(&sorted, 75.0), 4.0);

        // NumPy: percentile([10, 20, 40], 25) == 15, 75 -> 30
        let sorted = [10.0, 20.0, 40.0];
        assert_close(percentile(&sorted, 25.0), 15.0);
        assert_close(percentile(&sorted, 75.0), 30.0);
    }

    #[test]
    fn test_summary_stats() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = SummaryStats::from_values(&values).unwrap();

        assert_eq!(stats.count, 8);
        assert_close(stats.mean, 5.0);
        assert_close(stats.std, (32.0f64 / 7.0).sqrt());
        assert_close(stats.median, 4.5);
    }

    #[test]
    fn test_summary_stats_edge_cases() {
        assert!(SummaryStats::from_values(&[]).is_none());

        let single = SummaryStats::from_values(&[42.0]).unwrap();
        assert_eq!(single.count, 1);
        assert_close(single.mean, 42.0);
        assert_close(single.median, 42.0);
        assert_close(single.std, 0.0);
    }

    #[test]
    fn test_hours_summary_by_bracket() {
        use crate::data::{Dataset, Record};

        let record = |income: &str, hours: f64| Record {
            age: 30.0,
            gender: "M".into(),
            income_bracket: income.into(),
            work_hours: hours,
            education: "HS".into(),
            occupation: "Sales".into(),
        };
        let ds = Dataset::from_records(vec![
            record("<=50K", 30.0),
            record("<=50K", 40.0),
            record(">50K", 50.0),
        ]);

        let summary = hours_summary_by_bracket(&ds);
        assert_eq!(summary["<=50K"].count, 2);
        assert_close(summary["<=50K"].mean, 35.0);
        assert_eq!(summary[">50K"].count, 1);
    }
}
