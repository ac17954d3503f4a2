//! Regression Module
//! Ordinary-least-squares trend fitting over salary records.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::warn;

use crate::data::SalaryRecord;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("location '{location}' has {distinct} distinct experience value(s), need at least 2")]
pub struct InsufficientDataError {
    pub location: String,
    pub distinct: usize,
}

/// Fitted line: salary = slope * experience + intercept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn predict(&self, experience: f64) -> f64 {
        self.slope * experience + self.intercept
    }
}

/// Per-location fit results. Partitions without enough distinct points land
/// in `skipped` instead of failing the whole fit.
#[derive(Debug, Clone, Default)]
pub struct LocationFits {
    pub lines: BTreeMap<String, TrendLine>,
    pub skipped: Vec<InsufficientDataError>,
}

/// Closed-form OLS fitting.
pub struct RegressionFitter;

impl RegressionFitter {
    /// Fit one line per work-location partition.
    /// slope = cov(x, y) / var(x), intercept = mean(y) - slope * mean(x).
    pub fn fit_by_location(records: &[SalaryRecord]) -> LocationFits {
        let mut partitions: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
        for record in records {
            partitions
                .entry(record.location.clone())
                .or_default()
                .push((record.experience, record.salary));
        }

        let mut fits = LocationFits::default();
        for (location, points) in partitions {
            let distinct: HashSet<u64> = points.iter().map(|&(x, _)| x.to_bits()).collect();
            if distinct.len() < 2 {
                warn!(
                    location = %location,
                    distinct = distinct.len(),
                    "skipping location: not enough distinct experience values"
                );
                fits.skipped.push(InsufficientDataError {
                    location,
                    distinct: distinct.len(),
                });
                continue;
            }
            fits.lines.insert(location, Self::fit(&points));
        }
        fits
    }

    /// OLS over (experience, salary) points with at least 2 distinct x values.
    /// Means first, then centered sums, so the result is stable under
    /// permutation up to IEEE rounding.
    fn fit(points: &[(f64, f64)]) -> TrendLine {
        let n = points.len() as f64;
        let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n;

        let var_x = points.iter().map(|&(x, _)| (x - mean_x).powi(2)).sum::<f64>();
        let cov_xy = points
            .iter()
            .map(|&(x, y)| (x - mean_x) * (y - mean_y))
            .sum::<f64>();

        let slope = cov_xy / var_x;
        TrendLine {
            slope,
            intercept: mean_y - slope * mean_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary(experience: f64, location: &str, salary: f64) -> SalaryRecord {
        SalaryRecord {
            experience,
            education: "Bachelors".into(),
            location: location.into(),
            salary,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_exact_linear_fit() {
        let records = vec![
            salary(1.0, "Remote", 50000.0),
            salary(2.0, "Remote", 60000.0),
            salary(3.0, "Remote", 70000.0),
        ];

        let fits = RegressionFitter::fit_by_location(&records);
        let line = &fits.lines["Remote"];
        assert_close(line.slope, 10000.0);
        assert_close(line.intercept, 40000.0);
        assert!(fits.skipped.is_empty());
    }

    #[test]
    fn test_noisy_fit_minimizes_residuals() {
        // Points around y = 2x + 1
        let records = vec![
            salary(0.0, "On-site", 1.2),
            salary(1.0, "On-site", 2.9),
            salary(2.0, "On-site", 5.1),
            salary(3.0, "On-site", 6.8),
        ];

        let fits = RegressionFitter::fit_by_location(&records);
        let line = &fits.lines["On-site"];
        assert!((line.slope - 2.0).abs() < 0.1);
        assert!((line.intercept - 1.0).abs() < 0.2);
    }

    #[test]
    fn test_insufficient_partition_is_skipped_not_fatal() {
        let records = vec![
            salary(5.0, "Hybrid", 80000.0),
            salary(5.0, "Hybrid", 82000.0),
            salary(1.0, "Remote", 50000.0),
            salary(2.0, "Remote", 60000.0),
        ];

        let fits = RegressionFitter::fit_by_location(&records);
        assert!(fits.lines.contains_key("Remote"));
        assert!(!fits.lines.contains_key("Hybrid"));

        assert_eq!(fits.skipped.len(), 1);
        assert_eq!(fits.skipped[0].location, "Hybrid");
        assert_eq!(fits.skipped[0].distinct, 1);
        assert!(fits.skipped[0].to_string().contains("Hybrid"));
    }

    #[test]
    fn test_fit_is_order_independent() {
        let mut records = vec![
            salary(1.0, "Remote", 48.0),
            salary(5.0, "Remote", 68.0),
            salary(10.0, "Remote", 90.0),
            salary(13.0, "Remote", 92.0),
            salary(18.0, "Remote", 115.0),
        ];

        let forward = RegressionFitter::fit_by_location(&records);
        records.reverse();
        records.swap(1, 3);
        let shuffled = RegressionFitter::fit_by_location(&records);

        assert_close(forward.lines["Remote"].slope, shuffled.lines["Remote"].slope);
        assert_close(
            forward.lines["Remote"].intercept,
            shuffled.lines["Remote"].intercept,
        );
    }

    #[test]
    fn test_predict() {
        let line = TrendLine {
            slope: 10000.0,
            intercept: 40000.0,
        };
        assert_close(line.predict(2.5), 65000.0);
    }

    #[test]
    fn test_empty_input() {
        let fits = RegressionFitter::fit_by_location(&[]);
        assert!(fits.lines.is_empty());
        assert!(fits.skipped.is_empty());
    }
}
