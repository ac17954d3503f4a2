//! Data Cleaner Module
//! Missing-value imputation and duplicate removal.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::info;

use crate::data::loader::RawRecord;

#[derive(Error, Debug)]
#[error("cannot impute field '{field}': no non-missing values")]
pub struct ImputationError {
    pub field: &'static str,
}

/// One cleaned row. Invariant: no field is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub age: f64,
    pub gender: String,
    pub income_bracket: String,
    pub work_hours: f64,
    pub education: String,
    pub occupation: String,
}

/// Ordered sequence of cleaned records sharing the canonical schema.
/// Read-only once produced by the cleaner.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Handles imputation and deduplication.
pub struct Cleaner;

impl Cleaner {
    /// Impute missing values over whole-dataset statistics, then drop exact
    /// duplicates keeping the first occurrence. Fields are processed in
    /// canonical field order so mode tie-breaking is deterministic.
    pub fn clean(mut rows: Vec<RawRecord>) -> Result<Dataset, ImputationError> {
        Self::fill_numeric(rows.iter_mut().map(|r| &mut r.age).collect(), "age")?;
        Self::fill_categorical(rows.iter_mut().map(|r| &mut r.gender).collect(), "gender")?;
        Self::fill_categorical(
            rows.iter_mut().map(|r| &mut r.income_bracket).collect(),
            "income_bracket",
        )?;
        Self::fill_numeric(
            rows.iter_mut().map(|r| &mut r.work_hours).collect(),
            "work_hours",
        )?;
        Self::fill_categorical(
            rows.iter_mut().map(|r| &mut r.education).collect(),
            "education",
        )?;
        Self::fill_categorical(
            rows.iter_mut().map(|r| &mut r.occupation).collect(),
            "occupation",
        )?;

        let records: Vec<Record> = rows
            .into_iter()
            .filter_map(|r| {
                match (
                    r.age,
                    r.gender,
                    r.income_bracket,
                    r.work_hours,
                    r.education,
                    r.occupation,
                ) {
                    (
                        Some(age),
                        Some(gender),
                        Some(income_bracket),
                        Some(work_hours),
                        Some(education),
                        Some(occupation),
                    ) => Some(Record {
                        age,
                        gender,
                        income_bracket,
                        work_hours,
                        education,
                        occupation,
                    }),
                    _ => None,
                }
            })
            .collect();

        Ok(Dataset::from_records(Self::dedup(records)))
    }

    /// Replace missing numeric entries with the field median.
    fn fill_numeric(
        slots: Vec<&mut Option<f64>>,
        field: &'static str,
    ) -> Result<(), ImputationError> {
        let present: Vec<f64> = slots.iter().filter_map(|s| **s).collect();
        let missing = slots.len() - present.len();
        if missing == 0 {
            return Ok(());
        }
        if present.is_empty() {
            return Err(ImputationError { field });
        }

        let median = Self::median(&present);
        for slot in slots {
            if slot.is_none() {
                *slot = Some(median);
            }
        }
        info!(field, value = median, count = missing, "imputed numeric field with median");
        Ok(())
    }

    /// Replace missing categorical entries with the field mode.
    /// Ties resolve to the first-encountered value in dataset order.
    fn fill_categorical(
        slots: Vec<&mut Option<String>>,
        field: &'static str,
    ) -> Result<(), ImputationError> {
        let missing = slots.iter().filter(|s| s.is_none()).count();
        if missing == 0 {
            return Ok(());
        }

        let mode = {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            let mut order: Vec<&str> = Vec::new();
            for slot in &slots {
                if let Some(value) = slot.as_deref() {
                    let count = counts.entry(value).or_insert(0);
                    if *count == 0 {
                        order.push(value);
                    }
                    *count += 1;
                }
            }

            let mut mode = "";
            let mut mode_count = 0;
            for &value in &order {
                let count = counts[value];
                if count > mode_count {
                    mode = value;
                    mode_count = count;
                }
            }
            if mode_count == 0 {
                return Err(ImputationError { field });
            }
            mode.to_string()
        };
        for slot in slots {
            if slot.is_none() {
                *slot = Some(mode.clone());
            }
        }
        info!(field, value = %mode, count = missing, "imputed categorical field with mode");
        Ok(())
    }

    fn median(values: &[f64]) -> f64 {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = sorted.len();
        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    /// Keep the first occurrence of each exact row, order-preserving.
    /// Numeric fields compare bitwise.
    fn dedup(records: Vec<Record>) -> Vec<Record> {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());
        let mut removed = 0usize;

        for record in records {
            let key = (
                record.age.to_bits(),
                record.gender.clone(),
                record.income_bracket.clone(),
                record.work_hours.to_bits(),
                record.education.clone(),
                record.occupation.clone(),
            );
            if seen.insert(key) {
                kept.push(record);
            } else {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "removed duplicate records");
        }
        kept
    }
}
