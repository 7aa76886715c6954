//! Dataset Loader Module
//! Loads the patient table from a local CSV file or a remote Excel sheet.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("failed to parse dataset: {0}")]
    ParseError(String),
    #[error("dataset contains no rows")]
    EmptyTable,
}

/// Where the dataset comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Local CSV file.
    Csv(PathBuf),
    /// URL of an Excel-format spreadsheet.
    RemoteSheet(String),
}

/// Loads the raw patient table. One load per session; the returned frame is
/// treated as immutable by everything downstream.
pub struct DataLoader;

impl DataLoader {
    /// Load the dataset described by `source`. No retries; a failure here
    /// halts the whole page.
    pub fn load(source: &Source) -> Result<DataFrame, LoaderError> {
        let df = match source {
            Source::Csv(path) => Self::load_csv(path)?,
            Source::RemoteSheet(url) => Self::load_remote_sheet(url)?,
        };

        if df.height() == 0 {
            return Err(LoaderError::EmptyTable);
        }
        tracing::info!(rows = df.height(), columns = df.width(), "dataset loaded");
        Ok(df)
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::SourceUnavailable(format!(
                "no such file: {}",
                path.display()
            )));
        }

        // Lazy scan with inference over a generous prefix; malformed cells
        // become nulls instead of aborting the read.
        LazyCsvReader::new(path.to_string_lossy().as_ref())
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .and_then(LazyFrame::collect)
            .map_err(|e| LoaderError::ParseError(e.to_string()))
    }

    /// Fetch a remote Excel sheet and parse its first worksheet.
    ///
    /// Every cell is read as a string; the field cleaners own all numeric
    /// coercion because the source sheet mixes numbers and free text in the
    /// same columns.
    pub fn load_remote_sheet(url: &str) -> Result<DataFrame, LoaderError> {
        let response = reqwest::blocking::get(url)
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| LoaderError::SourceUnavailable(e.to_string()))?;
        let bytes = response
            .bytes()
            .map_err(|e| LoaderError::SourceUnavailable(e.to_string()))?;

        Self::sheet_to_dataframe(&bytes)
    }

    /// Parse xlsx bytes into a string-typed DataFrame (header row first).
    fn sheet_to_dataframe(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| LoaderError::ParseError(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoaderError::ParseError("workbook has no sheets".to_string()))?
            .map_err(|e| LoaderError::ParseError(e.to_string()))?;

        let mut rows = range.rows();
        let header = rows.next().ok_or(LoaderError::EmptyTable)?;
        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("column_{i}"),
                other => other.to_string(),
            })
            .collect();

        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for row in rows {
            for (i, values) in columns.iter_mut().enumerate() {
                let cell = row.get(i).unwrap_or(&Data::Empty);
                values.push(Self::cell_to_string(cell));
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name.into(), values))
            .collect();

        DataFrame::new(columns).map_err(|e| LoaderError::ParseError(e.to_string()))
    }

    fn cell_to_string(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty => None,
            Data::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Gender,Age").unwrap();
        writeln!(file, "Female,34").unwrap();
        writeln!(file, "Male,61").unwrap();

        let df = DataLoader::load(&Source::Csv(path)).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let err = DataLoader::load(&Source::Csv(PathBuf::from("/nonexistent/ct.csv"))).unwrap_err();
        assert!(matches!(err, LoaderError::SourceUnavailable(_)));
    }

    #[test]
    fn header_only_csv_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Gender,Age").unwrap();

        let err = DataLoader::load(&Source::Csv(path)).unwrap_err();
        assert!(matches!(err, LoaderError::EmptyTable));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let err = DataLoader::sheet_to_dataframe(b"not a workbook").unwrap_err();
        assert!(matches!(err, LoaderError::ParseError(_)));
    }
}
