//! Data module - CSV loading, schema normalization, and cleaning

mod cleaner;
mod loader;
mod schema;

pub use cleaner::{Cleaner, Dataset, ImputationError, Record};
pub use loader::{DataLoader, LoaderError, RawRecord, SalaryRecord};
pub use schema::SchemaError;
