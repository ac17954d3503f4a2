//! CSV Data Loader Module
//! Handles CSV file loading and typed row extraction using Polars.

use polars::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::schema::{self, Field, SalaryField, SchemaError};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to load CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("CSV file has no data rows: {path}")]
    Empty { path: PathBuf },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("failed to read column: {0}")]
    Column(#[from] PolarsError),
}

/// One row after column normalization, before cleaning.
/// Every field may still be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub income_bracket: Option<String>,
    pub work_hours: Option<f64>,
    pub education: Option<String>,
    pub occupation: Option<String>,
}

/// One salary observation. Independent of the demographic dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRecord {
    pub experience: f64,
    pub education: String,
    pub location: String,
    pub salary: f64,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(path.to_path_buf())
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        if df.height() == 0 {
            return Err(LoaderError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(df)
    }

    /// Load a demographic CSV and normalize it to the canonical schema.
    pub fn load_demographics(path: &Path) -> Result<Vec<RawRecord>, LoaderError> {
        let df = Self::load_csv(path)?;
        Self::extract_raw_records(&df)
    }

    /// Load a salary CSV. Rows with missing fields are skipped with a warning.
    pub fn load_salaries(path: &Path) -> Result<Vec<SalaryRecord>, LoaderError> {
        let df = Self::load_csv(path)?;
        Self::extract_salary_records(&df)
    }

    /// Match columns against the canonical schema and extract raw rows.
    pub fn extract_raw_records(df: &DataFrame) -> Result<Vec<RawRecord>, LoaderError> {
        let raw_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let matched = schema::match_columns(&raw_names)?;

        for name in &raw_names {
            if !matched.values().any(|m| m == name) {
                debug!(column = %name, "dropping column with no canonical match");
            }
        }

        let ages = Self::numeric_column(df, &matched[&Field::Age])?;
        let genders = Self::categorical_column(df, &matched[&Field::Gender])?;
        let brackets = Self::categorical_column(df, &matched[&Field::IncomeBracket])?;
        let hours = Self::numeric_column(df, &matched[&Field::WorkHours])?;
        let educations = Self::categorical_column(df, &matched[&Field::Education])?;
        let occupations = Self::categorical_column(df, &matched[&Field::Occupation])?;

        let rows = (0..df.height())
            .map(|i| RawRecord {
                age: ages[i],
                gender: genders[i].clone(),
                income_bracket: brackets[i].clone(),
                work_hours: hours[i],
                education: educations[i].clone(),
                occupation: occupations[i].clone(),
            })
            .collect();
        Ok(rows)
    }

    /// Extract salary records, skipping incomplete rows.
    pub fn extract_salary_records(df: &DataFrame) -> Result<Vec<SalaryRecord>, LoaderError> {
        let raw_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let matched = schema::match_salary_columns(&raw_names)?;

        let experience = Self::numeric_column(df, &matched[&SalaryField::Experience])?;
        let education = Self::categorical_column(df, &matched[&SalaryField::Education])?;
        let location = Self::categorical_column(df, &matched[&SalaryField::Location])?;
        let salary = Self::numeric_column(df, &matched[&SalaryField::Salary])?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            match (&experience[i], &education[i], &location[i], &salary[i]) {
                (Some(exp), Some(edu), Some(loc), Some(sal)) => {
                    records.push(SalaryRecord {
                        experience: *exp,
                        education: edu.clone(),
                        location: loc.clone(),
                        salary: *sal,
                    });
                }
                _ => {
                    warn!(row = i, "skipping salary row with missing fields");
                }
            }
        }
        Ok(records)
    }

    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PolarsError> {
        let col = df.column(name)?;
        let as_f64 = col.cast(&DataType::Float64)?;
        let ca = as_f64.f64()?;
        Ok((0..df.height())
            .map(|i| ca.get(i).filter(|v| !v.is_nan()))
            .collect())
    }

    fn categorical_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, PolarsError> {
        let col = df.column(name)?;
        let mut values = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let value = match col.get(i) {
                Ok(v) if !v.is_null() => {
                    let text = v.to_string().trim_matches('"').to_string();
                    if schema::is_missing(&text) {
                        None
                    } else {
                        Some(text.trim().to_string())
                    }
                }
                _ => None,
            };
            values.push(value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_demographics_variant_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "adult.csv",
            "Age,sex,income,hours-per-week,education,job\n\
             39,Male,<=50K,40,Bachelors,Sales\n\
             50,Female,>50K,45,Masters,Exec\n",
        );

        let rows = DataLoader::load_demographics(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].age, Some(39.0));
        assert_eq!(rows[0].gender.as_deref(), Some("Male"));
        assert_eq!(rows[1].income_bracket.as_deref(), Some(">50K"));
        assert_eq!(rows[1].work_hours, Some(45.0));
    }

    #[test]
    fn test_load_demographics_missing_markers() {
        let dir = tempfile::tempdir().unwrap();
        // "?" marks a missing categorical; an empty cell marks a missing numeric.
        let path = write_csv(
            &dir,
            "adult.csv",
            "age,gender,income,hours-per-week,education,occupation\n\
             39,Male,<=50K,40,Bachelors,?\n\
             50,?,>50K,,Masters,Exec\n",
        );

        let rows = DataLoader::load_demographics(&path).unwrap();
        assert_eq!(rows[0].occupation, None);
        assert_eq!(rows[1].gender, None);
        assert_eq!(rows[1].work_hours, None);
        assert_eq!(rows[1].education.as_deref(), Some("Masters"));
    }

    #[test]
    fn test_load_demographics_unmatched_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "bad.csv",
            "age,gender,hours-per-week,education,occupation\n39,Male,40,Bachelors,Sales\n",
        );

        let err = DataLoader::load_demographics(&path).unwrap_err();
        match err {
            LoaderError::Schema(e) => assert_eq!(e.field, "income_bracket"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_salaries_skips_incomplete_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "salaries.csv",
            "years_experience,degree,work_location,salary\n\
             1,Bachelors,Remote,48000\n\
             2,Masters,?,53000\n\
             3,PhD,Hybrid,60000\n",
        );

        let records = DataLoader::load_salaries(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location, "Remote");
        assert_eq!(records[1].experience, 3.0);
        assert_eq!(records[1].salary, 60000.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DataLoader::load_csv(Path::new("/nonexistent/input.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Csv { .. }));
    }
}
