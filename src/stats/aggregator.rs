//! Aggregation Module
//! Grouped summary views over the cleaned dataset.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::data::Dataset;
use crate::stats::descriptive::{self, SummaryStats};

/// Counts keyed by an outer and inner categorical value.
pub type PairCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// The grouped views handed to the chart layer and the JSON summary.
/// Immutable once produced; recomputed fresh each run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeReport {
    /// gender -> income bracket -> count
    pub gender_income_counts: PairCounts,
    /// income bracket -> age -> mean weekly work hours
    pub mean_hours_by_age: BTreeMap<String, BTreeMap<i64, f64>>,
    /// income bracket -> work-hours values in dataset order
    pub hours_by_bracket: BTreeMap<String, Vec<f64>>,
    /// education -> occupation -> count
    pub education_occupation_counts: PairCounts,
    /// income bracket -> work-hours summary
    pub hours_summary: BTreeMap<String, SummaryStats>,
}

/// Pure view computations; the dataset is never mutated.
pub struct Aggregator;

impl Aggregator {
    /// Count records per (gender, income bracket) pair. Pairs absent from the
    /// data are omitted unless `zero_fill` is set, in which case every
    /// observed gender x observed bracket combination is present.
    pub fn gender_income_counts(ds: &Dataset, zero_fill: bool) -> PairCounts {
        let mut counts: PairCounts = BTreeMap::new();
        for record in ds.records() {
            *counts
                .entry(record.gender.clone())
                .or_default()
                .entry(record.income_bracket.clone())
                .or_insert(0) += 1;
        }

        if zero_fill {
            let brackets: BTreeSet<String> = ds
                .records()
                .iter()
                .map(|r| r.income_bracket.clone())
                .collect();
            for by_bracket in counts.values_mut() {
                for bracket in &brackets {
                    by_bracket.entry(bracket.clone()).or_insert(0);
                }
            }
        }
        counts
    }

    /// Mean work hours per age, partitioned by income bracket. Ages are keyed
    /// by the nearest integer year; ages absent from a bracket are omitted
    /// from that bracket's series.
    pub fn mean_hours_by_age(ds: &Dataset) -> BTreeMap<String, BTreeMap<i64, f64>> {
        let mut sums: BTreeMap<String, BTreeMap<i64, (f64, u64)>> = BTreeMap::new();
        for record in ds.records() {
            let age = record.age.round() as i64;
            let slot = sums
                .entry(record.income_bracket.clone())
                .or_default()
                .entry(age)
                .or_insert((0.0, 0));
            slot.0 += record.work_hours;
            slot.1 += 1;
        }

        sums.into_iter()
            .map(|(bracket, by_age)| {
                let means = by_age
                    .into_iter()
                    .map(|(age, (sum, n))| (age, sum / n as f64))
                    .collect();
                (bracket, means)
            })
            .collect()
    }

    /// Work-hours sequences per income bracket, in dataset order.
    /// Histogram binning is left to the chart layer.
    pub fn hours_by_bracket(ds: &Dataset) -> BTreeMap<String, Vec<f64>> {
        let mut hours: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in ds.records() {
            hours
                .entry(record.income_bracket.clone())
                .or_default()
                .push(record.work_hours);
        }
        hours
    }

    /// Count records per (education, occupation) pair.
    pub fn education_occupation_counts(ds: &Dataset) -> PairCounts {
        let mut counts: PairCounts = BTreeMap::new();
        for record in ds.records() {
            *counts
                .entry(record.education.clone())
                .or_default()
                .entry(record.occupation.clone())
                .or_insert(0) += 1;
        }
        counts
    }

    /// Compute every view plus the per-bracket hour summaries.
    pub fn income_report(ds: &Dataset, zero_fill: bool) -> IncomeReport {
        IncomeReport {
            gender_income_counts: Self::gender_income_counts(ds, zero_fill),
            mean_hours_by_age: Self::mean_hours_by_age(ds),
            hours_by_bracket: Self::hours_by_bracket(ds),
            education_occupation_counts: Self::education_occupation_counts(ds),
            hours_summary: descriptive::hours_summary_by_bracket(ds),
        }
    }
}
