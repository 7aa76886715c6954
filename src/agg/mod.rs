//! Aggregation module - per-chart summary statistics

mod aggregator;

pub use aggregator::{AggError, AggregationResult, Aggregator};
