//! Schema Module
//! Column-label normalization and per-feature column availability checks.

use polars::prelude::*;

/// Trim whitespace from every column label. Runs once, right after load;
/// downstream code only ever sees the trimmed names.
pub fn normalize_columns(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let renames: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .filter_map(|name| {
            let trimmed = name.trim();
            if trimmed == name.as_str() {
                None
            } else {
                Some((name.to_string(), trimmed.to_string()))
            }
        })
        .collect();

    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }
    Ok(df)
}

/// Schema-capability query: does the table carry this column?
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Check every column a feature needs, up front. `Err` carries the full list
/// of missing names so the notice can show all of them at once.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<(), Vec<String>> {
    let missing: Vec<String> = names
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataFrame {
        DataFrame::new(vec![
            Column::new(" Age ".into(), vec![34i64, 61]),
            Column::new("Gender".into(), vec!["Female", "Male"]),
        ])
        .unwrap()
    }

    #[test]
    fn trims_column_labels() {
        let df = normalize_columns(table()).unwrap();
        assert!(has_column(&df, "Age"));
        assert!(!has_column(&df, " Age "));
    }

    #[test]
    fn reports_all_missing_columns() {
        let df = normalize_columns(table()).unwrap();
        assert_eq!(require_columns(&df, &["Age", "Gender"]), Ok(()));

        let missing = require_columns(&df, &["Age", "Volume in mm", "Bleed Subcategory"])
            .unwrap_err();
        assert_eq!(missing, vec!["Volume in mm", "Bleed Subcategory"]);
    }
}
