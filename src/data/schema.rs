//! Canonical Schema Module
//! Column-name synonym matching for inconsistently-formatted inputs.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("no column matching required field '{field}' found in input")]
pub struct SchemaError {
    pub field: &'static str,
}

/// Canonical demographic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    Gender,
    IncomeBracket,
    WorkHours,
    Education,
    Occupation,
}

impl Field {
    /// Canonical field order; imputation and error reporting follow it.
    pub const ALL: [Field; 6] = [
        Field::Age,
        Field::Gender,
        Field::IncomeBracket,
        Field::WorkHours,
        Field::Education,
        Field::Occupation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Gender => "gender",
            Field::IncomeBracket => "income_bracket",
            Field::WorkHours => "work_hours",
            Field::Education => "education",
            Field::Occupation => "occupation",
        }
    }

    /// Accepted header spellings, already in normalized form.
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::Age => &["age"],
            Field::Gender => &["gender", "sex"],
            Field::IncomeBracket => &["income_bracket", "income", "income_class", "salary_class"],
            Field::WorkHours => &[
                "work_hours",
                "hours_per_week",
                "hrs_per_week",
                "weekly_hours",
            ],
            Field::Education => &["education", "education_level"],
            Field::Occupation => &["occupation", "job", "job_title"],
        }
    }
}

/// Fields of a salary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalaryField {
    Experience,
    Education,
    Location,
    Salary,
}

impl SalaryField {
    pub const ALL: [SalaryField; 4] = [
        SalaryField::Experience,
        SalaryField::Education,
        SalaryField::Location,
        SalaryField::Salary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SalaryField::Experience => "experience",
            SalaryField::Education => "education",
            SalaryField::Location => "location",
            SalaryField::Salary => "salary",
        }
    }

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            SalaryField::Experience => {
                &["experience", "years_experience", "experience_years", "yrs_experience"]
            }
            SalaryField::Education => &["education", "education_level", "degree"],
            SalaryField::Location => &["location", "work_location", "site"],
            SalaryField::Salary => &["salary", "annual_salary", "pay"],
        }
    }
}

/// Normalize a raw header: trim, lowercase, fold `-`/`.`/space to `_`.
pub fn normalize_column(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            c => c,
        })
        .collect()
}

/// Missing markers: empty cells and the literal `?` token.
pub fn is_missing(text: &str) -> bool {
    let t = text.trim();
    t.is_empty() || t == "?"
}

fn find_column(raw: &[String], normalized: &[String], synonyms: &[&str]) -> Option<String> {
    normalized
        .iter()
        .position(|n| synonyms.contains(&n.as_str()))
        .map(|idx| raw[idx].clone())
}

/// Match raw demographic column names to canonical fields.
///
/// All six canonical fields are required; fails with the first unmatched
/// field in canonical order.
pub fn match_columns(raw: &[String]) -> Result<HashMap<Field, String>, SchemaError> {
    let normalized: Vec<String> = raw.iter().map(|c| normalize_column(c)).collect();

    let mut matched = HashMap::new();
    for field in Field::ALL {
        match find_column(raw, &normalized, field.synonyms()) {
            Some(name) => {
                matched.insert(field, name);
            }
            None => return Err(SchemaError { field: field.name() }),
        }
    }
    Ok(matched)
}

/// Match raw salary column names to salary fields.
pub fn match_salary_columns(raw: &[String]) -> Result<HashMap<SalaryField, String>, SchemaError> {
    let normalized: Vec<String> = raw.iter().map(|c| normalize_column(c)).collect();

    let mut matched = HashMap::new();
    for field in SalaryField::ALL {
        match find_column(raw, &normalized, field.synonyms()) {
            Some(name) => {
                matched.insert(field, name);
            }
            None => return Err(SchemaError { field: field.name() }),
        }
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column() {
        assert_eq!(normalize_column("hours-per-week"), "hours_per_week");
        assert_eq!(normalize_column("Hours.Per.Week"), "hours_per_week");
        assert_eq!(normalize_column("  SEX  "), "sex");
        assert_eq!(normalize_column("native country"), "native_country");
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing("?"));
        assert!(is_missing(" ? "));
        assert!(is_missing(""));
        assert!(is_missing("   "));
        assert!(!is_missing("Bachelors"));
    }

    #[test]
    fn test_match_columns_variants() {
        let raw: Vec<String> = ["Age", "sex", "income", "hours-per-week", "Education", "job"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let matched = match_columns(&raw).unwrap();
        assert_eq!(matched[&Field::Age], "Age");
        assert_eq!(matched[&Field::Gender], "sex");
        assert_eq!(matched[&Field::IncomeBracket], "income");
        assert_eq!(matched[&Field::WorkHours], "hours-per-week");
        assert_eq!(matched[&Field::Occupation], "job");
    }

    #[test]
    fn test_match_columns_missing_required() {
        let raw: Vec<String> = ["age", "sex", "hours-per-week", "education", "occupation"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let err = match_columns(&raw).unwrap_err();
        assert_eq!(err.field, "income_bracket");
    }

    #[test]
    fn test_match_columns_error_follows_canonical_order() {
        // Both age and income are absent; the error names age first.
        let raw: Vec<String> = ["sex", "hours-per-week", "education", "occupation"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let err = match_columns(&raw).unwrap_err();
        assert_eq!(err.field, "age");
    }

    #[test]
    fn test_match_salary_columns() {
        let raw: Vec<String> = ["Years_Experience", "degree", "Work-Location", "Salary"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let matched = match_salary_columns(&raw).unwrap();
        assert_eq!(matched[&SalaryField::Experience], "Years_Experience");
        assert_eq!(matched[&SalaryField::Location], "Work-Location");

        let err = match_salary_columns(&raw[..3]).unwrap_err();
        assert_eq!(err.field, "salary");
    }
}
