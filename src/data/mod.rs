//! Data module - dataset loading, schema checks and filtering

mod filter;
mod loader;
mod schema;

pub use filter::{DataFilter, FilterSelection, ALL_SENTINEL};
pub use loader::{DataLoader, LoaderError, Source};
pub use schema::{has_column, normalize_columns, require_columns};
