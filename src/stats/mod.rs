//! Stats module - aggregation, descriptive statistics, and regression

mod aggregator;
mod descriptive;
mod regression;

pub use aggregator::{Aggregator, IncomeReport, PairCounts};
pub use descriptive::SummaryStats;
pub use regression::{InsufficientDataError, LocationFits, RegressionFitter, TrendLine};
