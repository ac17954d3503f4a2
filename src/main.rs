//! incomescope - Demographic income CSV analysis & chart generation
//!
//! Two independent batch pipelines: demographic CSV -> clean -> aggregate ->
//! four-panel chart, and salary CSV -> per-location OLS fit -> trend chart.

mod charts;
mod data;
mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::charts::{IncomePanels, SalaryPlot};
use crate::data::{Cleaner, DataLoader};
use crate::stats::{Aggregator, RegressionFitter, TrendLine};

#[derive(Parser)]
#[command(name = "incomescope")]
#[command(about = "Demographic income CSV analysis & chart generation")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a demographic CSV and render the four-panel income analysis
    Income {
        /// Input CSV; variant column names are normalized
        #[arg(long)]
        input: PathBuf,
        /// Output chart image
        #[arg(long, default_value = "income_analysis.png")]
        out: PathBuf,
        /// Optional JSON summary of the aggregate views
        #[arg(long)]
        summary: Option<PathBuf>,
        /// Include absent gender/income combinations as zero counts
        #[arg(long)]
        zero_fill: bool,
    },
    /// Fit per-location salary trend lines and render the scatter plot
    Salary {
        /// Input CSV with experience, education, location, salary columns
        #[arg(long)]
        input: PathBuf,
        /// Output chart image
        #[arg(long, default_value = "salary_trends.png")]
        out: PathBuf,
        /// Optional JSON summary of the fitted lines
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SalarySummary<'a> {
    trend_lines: &'a BTreeMap<String, TrendLine>,
    skipped: BTreeMap<&'a str, String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Income {
            input,
            out,
            summary,
            zero_fill,
        } => run_income(&input, &out, summary.as_deref(), zero_fill),
        Commands::Salary { input, out, summary } => run_salary(&input, &out, summary.as_deref()),
    }
}

fn run_income(input: &Path, out: &Path, summary: Option<&Path>, zero_fill: bool) -> Result<()> {
    let rows = DataLoader::load_demographics(input)?;
    info!(rows = rows.len(), "loaded demographic records");

    let dataset = Cleaner::clean(rows)?;
    info!(records = dataset.len(), "cleaned dataset");

    let report = Aggregator::income_report(&dataset, zero_fill);
    for (bracket, stats) in &report.hours_summary {
        info!(
            bracket = %bracket,
            count = stats.count,
            mean = stats.mean,
            median = stats.median,
            "work-hours summary"
        );
    }

    if let Some(path) = summary {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        info!(path = %path.display(), "wrote aggregate summary");
    }

    IncomePanels::render(out, &report)?;
    info!(path = %out.display(), "wrote income analysis chart");
    Ok(())
}

fn run_salary(input: &Path, out: &Path, summary: Option<&Path>) -> Result<()> {
    let records = DataLoader::load_salaries(input)?;
    info!(records = records.len(), "loaded salary records");

    let fits = RegressionFitter::fit_by_location(&records);
    for (location, line) in &fits.lines {
        info!(
            location = %location,
            slope = line.slope,
            intercept = line.intercept,
            "fitted trend line"
        );
    }
    for err in &fits.skipped {
        warn!(%err, "trend line omitted");
    }

    if let Some(path) = summary {
        let salary_summary = SalarySummary {
            trend_lines: &fits.lines,
            skipped: fits
                .skipped
                .iter()
                .map(|e| (e.location.as_str(), e.to_string()))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&salary_summary)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        info!(path = %path.display(), "wrote trend summary");
    }

    SalaryPlot::render(out, &records, &fits)?;
    info!(path = %out.display(), "wrote salary trend chart");
    Ok(())
}
