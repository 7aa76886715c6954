//! CT Insight - Brain CT Patient Dashboard data core.
//!
//! Loads a tabular patient dataset (local CSV or remote spreadsheet), cleans
//! a handful of messy clinical columns, and exposes per-section aggregates
//! for an external rendering layer to chart.

pub mod agg;
pub mod clean;
pub mod config;
pub mod dashboard;
pub mod data;
