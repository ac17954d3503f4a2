//! Sample data generator.
//! Writes demo CSVs for both pipelines: a demographic file with variant
//! headers, `?` markers and duplicate rows, and a salary file with linear
//! per-location structure plus noise. Seeded for reproducibility.

use rand::prelude::*;
use rand::rngs::StdRng;
use statrs::distribution::Normal;
use std::fs::File;
use std::io::{BufWriter, Result, Write};

const SEED: u64 = 42;
const DEMOGRAPHIC_ROWS: usize = 500;
const SALARY_ROWS: usize = 60;
const MISSING_RATE: f64 = 0.03;
const DUPLICATE_RATE: f64 = 0.02;

const GENDERS: [&str; 2] = ["Male", "Female"];
const EDUCATIONS: [&str; 4] = ["HS-grad", "Some-college", "Bachelors", "Masters"];
const OCCUPATIONS: [&str; 5] = [
    "Adm-clerical",
    "Craft-repair",
    "Exec-managerial",
    "Sales",
    "Tech-support",
];
// location, base salary (thousands), slope per year of experience
const LOCATIONS: [(&str, f64, f64); 3] = [
    ("Remote", 45.0, 3.2),
    ("On-site", 50.0, 3.8),
    ("Hybrid", 48.0, 3.5),
];

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(SEED);
    write_demographics(&mut rng, "adult_sample.csv")?;
    write_salaries(&mut rng, "salary_sample.csv")?;
    Ok(())
}

fn write_demographics(rng: &mut StdRng, path: &str) -> Result<()> {
    let low_hours = Normal::new(38.0, 6.0).expect("valid distribution");
    let high_hours = Normal::new(45.0, 7.0).expect("valid distribution");

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "age,sex,income,hours-per-week,education,occupation")?;

    let mut previous: Option<String> = None;
    for _ in 0..DEMOGRAPHIC_ROWS {
        // occasional exact duplicate of the previous row
        if let Some(row) = &previous {
            if rng.gen_bool(DUPLICATE_RATE) {
                writeln!(out, "{row}")?;
            }
        }

        let age = rng.gen_range(17..=75);
        let education_idx = rng.gen_range(0..EDUCATIONS.len());
        let high_income = rng.gen_bool(0.12 + 0.08 * education_idx as f64);
        let income = if high_income { ">50K" } else { "<=50K" };
        let dist = if high_income { &high_hours } else { &low_hours };
        let hours = dist.sample(rng).round().clamp(10.0, 80.0);

        let gender_idx = rng.gen_range(0..GENDERS.len());
        let gender = mask(rng, GENDERS[gender_idx]);
        let education = mask(rng, EDUCATIONS[education_idx]);
        let occupation_idx = rng.gen_range(0..OCCUPATIONS.len());
        let occupation = mask(rng, OCCUPATIONS[occupation_idx]);

        let row = format!("{age},{gender},{income},{hours},{education},{occupation}");
        writeln!(out, "{row}")?;
        previous = Some(row);
    }
    out.flush()?;
    println!("wrote {path}");
    Ok(())
}

/// Replace a value with the `?` missing marker at MISSING_RATE.
fn mask<'a>(rng: &mut StdRng, value: &'a str) -> &'a str {
    if rng.gen_bool(MISSING_RATE) {
        "?"
    } else {
        value
    }
}

fn write_salaries(rng: &mut StdRng, path: &str) -> Result<()> {
    let noise = Normal::new(0.0, 4.0).expect("valid distribution");

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "years_experience,education,location,salary")?;

    for _ in 0..SALARY_ROWS {
        let (location, base, slope) = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
        let experience = rng.gen_range(1..=20);
        // salary in thousands
        let salary = base + slope * experience as f64 + noise.sample(rng);
        let education = ["Bachelors", "Masters", "PhD"][rng.gen_range(0..3)];
        writeln!(out, "{experience},{education},{location},{salary:.1}")?;
    }
    out.flush()?;
    println!("wrote {path}");
    Ok(())
}
