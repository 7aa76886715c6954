//! Aggregator Module
//! Turns cleaned columns into the label/value summaries the charts consume.

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::clean::category::normalize_label;

#[derive(Error, Debug)]
pub enum AggError {
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One chart's worth of labeled values. Entry order is meaningful: descending
/// by value where top-N semantics apply, declaration order otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub entries: Vec<(String, f64)>,
}

impl AggregationResult {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stateless aggregation operations over the filtered table.
pub struct Aggregator;

impl Aggregator {
    /// Count truthy rows per indicator column, in declaration order. Cells
    /// are coerced to numbers; missing or unparseable cells count as 0.
    pub fn flag_sums(
        df: &DataFrame,
        columns: &[(&str, &str)],
    ) -> Result<AggregationResult, AggError> {
        let mut entries = Vec::with_capacity(columns.len());

        for (column, label) in columns {
            let values = df.column(column)?.cast(&DataType::Float64)?;
            let ca = values.f64()?;
            let truthy = ca
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan() && *v != 0.0)
                .count();
            entries.push(((*label).to_string(), truthy as f64));
        }

        Ok(AggregationResult::new(entries))
    }

    /// Count non-null cells per column, in declaration order. This is the
    /// presence semantics the slice-thickness flags use: any mark in the
    /// cell counts, whatever it says.
    pub fn presence_counts(
        df: &DataFrame,
        columns: &[(&str, &str)],
    ) -> Result<AggregationResult, AggError> {
        let mut entries = Vec::with_capacity(columns.len());

        for (column, label) in columns {
            let series = df.column(column)?;
            let present = df.height() - series.null_count();
            entries.push(((*label).to_string(), present as f64));
        }

        Ok(AggregationResult::new(entries))
    }

    /// Frequency of each observed category, descending by count (ties broken
    /// by label so the order is stable).
    pub fn value_counts(df: &DataFrame, column: &str) -> Result<AggregationResult, AggError> {
        Self::counted(df, column, |raw| Some(raw.to_string()))
    }

    /// Frequency over normalized (trimmed, lowercased) labels, minus the
    /// excluded sentinel, truncated to the `n` most frequent.
    pub fn top_n_normalized(
        df: &DataFrame,
        column: &str,
        n: usize,
        exclude: Option<&str>,
    ) -> Result<AggregationResult, AggError> {
        let mut result = Self::counted(df, column, |raw| {
            let label = normalize_label(raw);
            if label.is_empty() || exclude == Some(label.as_str()) {
                None
            } else {
                Some(label)
            }
        })?;
        result.entries.truncate(n);
        Ok(result)
    }

    fn counted(
        df: &DataFrame,
        column: &str,
        label_of: impl Fn(&str) -> Option<String>,
    ) -> Result<AggregationResult, AggError> {
        let series = df.column(column)?;
        let mut counts: HashMap<String, f64> = HashMap::new();

        for i in 0..df.height() {
            let cell = series.get(i)?;
            if cell.is_null() {
                continue;
            }
            let raw = cell.to_string();
            let raw = raw.trim_matches('"');
            if raw.is_empty() {
                continue;
            }
            if let Some(label) = label_of(raw) {
                *counts.entry(label).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(String, f64)> = counts.into_iter().collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Ok(AggregationResult::new(entries))
    }

    /// Reshape two cleaned score columns into long form for grouped
    /// plotting. Rows where either side is null are dropped entirely.
    ///
    /// Output columns: ["stage", "score"]
    pub fn paired_long(
        pairs: &[(&str, &[Option<f64>]); 2],
    ) -> Result<DataFrame, AggError> {
        let [(first_label, first), (second_label, second)] = pairs;

        let mut stages: Vec<String> = Vec::new();
        let mut scores: Vec<f64> = Vec::new();

        for (a, b) in first.iter().zip(second.iter()) {
            if let (Some(a), Some(b)) = (a, b) {
                stages.push((*first_label).to_string());
                scores.push(*a);
                stages.push((*second_label).to_string());
                scores.push(*b);
            }
        }

        let df = DataFrame::new(vec![
            Column::new("stage".into(), stages),
            Column::new("score".into(), scores),
        ])?;
        Ok(df)
    }

    /// Collect a numeric column into plain values, nulls and NaNs dropped.
    pub fn numeric_series(df: &DataFrame, column: &str) -> Result<Vec<f64>, AggError> {
        let values = df.column(column)?.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        Ok(ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_sums_count_truthy_rows() {
        let df = DataFrame::new(vec![
            Column::new("colA".into(), vec![1i64, 0, 1]),
            Column::new("colB".into(), vec![0i64, 0, 1]),
        ])
        .unwrap();

        let result =
            Aggregator::flag_sums(&df, &[("colA", "colA"), ("colB", "colB")]).unwrap();
        assert_eq!(result.get("colA"), Some(2.0));
        assert_eq!(result.get("colB"), Some(1.0));
        assert_eq!(result.labels(), vec!["colA", "colB"]);
    }

    #[test]
    fn flag_sums_treat_missing_as_zero() {
        let df = DataFrame::new(vec![Column::new(
            "flag".into(),
            vec![Some(1.0f64), None, Some(0.0)],
        )])
        .unwrap();

        let result = Aggregator::flag_sums(&df, &[("flag", "Flag")]).unwrap();
        assert_eq!(result.get("Flag"), Some(1.0));
    }

    #[test]
    fn presence_counts_any_mark() {
        let df = DataFrame::new(vec![
            Column::new("1mm".into(), vec![Some("x"), None, Some("yes")]),
            Column::new("5mm".into(), vec![None, None, Some("1")]),
        ])
        .unwrap();

        let result =
            Aggregator::presence_counts(&df, &[("1mm", "1mm"), ("5mm", "5mm")]).unwrap();
        assert_eq!(result.get("1mm"), Some(2.0));
        assert_eq!(result.get("5mm"), Some(1.0));
    }

    #[test]
    fn value_counts_rank_descending() {
        let df = DataFrame::new(vec![Column::new(
            "Side".into(),
            vec!["L", "R", "L", "L", "R", "B"],
        )])
        .unwrap();

        let result = Aggregator::value_counts(&df, "Side").unwrap();
        assert_eq!(
            result.entries,
            vec![
                ("L".to_string(), 3.0),
                ("R".to_string(), 2.0),
                ("B".to_string(), 1.0)
            ]
        );
    }

    #[test]
    fn top_n_excludes_the_sentinel_and_truncates() {
        let df = DataFrame::new(vec![Column::new(
            "Location".into(),
            vec!["Frontal", "frontal ", "none", "Parietal", "NONE", "Occipital"],
        )])
        .unwrap();

        let result = Aggregator::top_n_normalized(&df, "Location", 2, Some("none")).unwrap();
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0], ("frontal".to_string(), 2.0));
        assert!(result.get("none").is_none());
    }

    #[test]
    fn paired_long_drops_incomplete_rows() {
        let admission = [Some(15.0), None, Some(9.0)];
        let discharge = [Some(15.0), Some(12.0), None];

        let long = Aggregator::paired_long(&[
            ("Admission", admission.as_slice()),
            ("Discharge", discharge.as_slice()),
        ])
        .unwrap();

        // Only the first row survives, reshaped to one row per stage.
        assert_eq!(long.height(), 2);
        let stages = Aggregator::value_counts(&long, "stage").unwrap();
        assert_eq!(stages.get("Admission"), Some(1.0));
        assert_eq!(stages.get("Discharge"), Some(1.0));
    }
}
