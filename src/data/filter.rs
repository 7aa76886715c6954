//! Filter Stage Module
//! Applies the sidebar category selection to the loaded table.

use polars::prelude::*;

/// Sidebar selector literal meaning "no filter".
pub const ALL_SENTINEL: &str = "All";

/// The user's selector state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSelection {
    All,
    Value(String),
}

impl FilterSelection {
    /// Interpret a raw selector string; the exact literal `"All"` is the
    /// no-filter sentinel, everything else is a category value.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_SENTINEL {
            FilterSelection::All
        } else {
            FilterSelection::Value(raw.to_string())
        }
    }
}

/// Applies a categorical filter without mutating the source table, so it can
/// be re-run on every selector change.
pub struct DataFilter;

impl DataFilter {
    /// Return the subset of rows whose `column` equals the selection.
    /// `All` returns the table unchanged (same rows, same order).
    pub fn apply(
        df: &DataFrame,
        column: &str,
        selection: &FilterSelection,
    ) -> PolarsResult<DataFrame> {
        match selection {
            FilterSelection::All => Ok(df.clone()),
            FilterSelection::Value(value) => df
                .clone()
                .lazy()
                .filter(col(column).eq(lit(value.as_str())))
                .collect(),
        }
    }

    /// Observed categories for the selector, sorted, nulls dropped.
    pub fn options(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut values: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                values.sort();
                values
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Gender".into(), vec!["Female", "Male", "Female"]),
            Column::new("Age".into(), vec![34i64, 61, 27]),
        ])
        .unwrap()
    }

    #[test]
    fn value_filter_keeps_matching_rows_unchanged() {
        let df = table();
        let filtered =
            DataFilter::apply(&df, "Gender", &FilterSelection::Value("Female".into())).unwrap();

        assert_eq!(filtered.height(), 2);
        let ages: Vec<i64> = filtered
            .column("Age")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ages, vec![34, 27]);
    }

    #[test]
    fn all_is_identity() {
        let df = table();
        let filtered = DataFilter::apply(&df, "Gender", &FilterSelection::All).unwrap();
        assert!(df.equals(&filtered));
    }

    #[test]
    fn parse_recognizes_the_sentinel() {
        assert_eq!(FilterSelection::parse("All"), FilterSelection::All);
        // Case-sensitive on purpose; "all" is a real category value.
        assert_eq!(
            FilterSelection::parse("all"),
            FilterSelection::Value("all".into())
        );
    }

    #[test]
    fn options_are_sorted_unique() {
        let opts = DataFilter::options(&table(), "Gender");
        assert_eq!(opts, vec!["Female".to_string(), "Male".to_string()]);
    }
}
