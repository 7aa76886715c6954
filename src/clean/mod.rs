//! Clean module - pure field cleaners for the messy clinical columns
//!
//! Every cleaner is total: absent or unparseable input degrades to `None`,
//! never an error. Bad cells are counted so sections can report them.

pub mod age;
pub mod category;
pub mod gcs;

use polars::prelude::*;

/// A column run through a cell-level cleaner, with the count of non-null
/// cells the cleaner could not make sense of.
#[derive(Debug, Clone)]
pub struct CleanedColumn<T> {
    pub values: Vec<Option<T>>,
    pub unparseable: usize,
}

impl<T> CleanedColumn<T> {
    /// The successfully cleaned values, nulls dropped.
    pub fn present(&self) -> Vec<T>
    where
        T: Copy,
    {
        self.values.iter().flatten().copied().collect()
    }
}

/// Map every cell of `column` through `parse`. Null cells stay null and are
/// not counted as unparseable.
pub fn clean_column<T>(
    df: &DataFrame,
    column: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> PolarsResult<CleanedColumn<T>> {
    let series = df.column(column)?;
    let mut values = Vec::with_capacity(df.height());
    let mut unparseable = 0;

    for i in 0..df.height() {
        let cell = series.get(i)?;
        if cell.is_null() {
            values.push(None);
            continue;
        }
        let raw = cell.to_string();
        let cleaned = parse(raw.trim_matches('"'));
        if cleaned.is_none() {
            unparseable += 1;
        }
        values.push(cleaned);
    }

    Ok(CleanedColumn {
        values,
        unparseable,
    })
}

/// Clean an age column (free text or numeric) into fractional years.
pub fn clean_age_column(df: &DataFrame, column: &str) -> PolarsResult<CleanedColumn<f64>> {
    clean_column(df, column, age::parse_age)
}

/// Clean a GCS column (free text or numeric) into integer scores.
pub fn clean_gcs_column(df: &DataFrame, column: &str) -> PolarsResult<CleanedColumn<i64>> {
    clean_column(df, column, gcs::parse_gcs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_unparseable_but_not_null() {
        let df = DataFrame::new(vec![Column::new(
            "Age".into(),
            vec![Some("2w"), Some("abc"), None, Some("45")],
        )])
        .unwrap();

        let cleaned = clean_age_column(&df, "Age").unwrap();
        assert_eq!(cleaned.values.len(), 4);
        assert_eq!(cleaned.unparseable, 1);
        assert_eq!(cleaned.present(), vec![2.0 / 52.0, 45.0]);
    }

    #[test]
    fn numeric_columns_clean_through_display() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![34i64, 61])]).unwrap();
        let cleaned = clean_age_column(&df, "Age").unwrap();
        assert_eq!(cleaned.present(), vec![34.0, 61.0]);
        assert_eq!(cleaned.unparseable, 0);
    }
}
