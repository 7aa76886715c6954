//! Startup Configuration Module
//! Resolves the dataset source from the environment (no CLI flags).

use std::env;
use std::path::PathBuf;

use crate::data::Source;

/// Environment variable holding the remote spreadsheet URL, populated from
/// the deployment's secret store.
pub const SHEET_URL_ENV: &str = "CT_INSIGHT_SHEET_URL";

/// Environment variable overriding the local CSV path.
pub const CSV_PATH_ENV: &str = "CT_INSIGHT_CSV";

/// Local dataset used when no remote sheet is configured.
pub const DEFAULT_CSV_PATH: &str = "sample_ct_data.csv";

/// Resolve the dataset source. A configured sheet URL wins over the local
/// CSV fallback.
pub fn source_from_env() -> Source {
    if let Ok(url) = env::var(SHEET_URL_ENV) {
        if !url.trim().is_empty() {
            return Source::RemoteSheet(url);
        }
    }

    let path = env::var(CSV_PATH_ENV).unwrap_or_else(|_| DEFAULT_CSV_PATH.to_string());
    Source::Csv(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_local_csv() {
        // Env-free call path: neither variable is set under `cargo test`.
        if env::var(SHEET_URL_ENV).is_err() && env::var(CSV_PATH_ENV).is_err() {
            match source_from_env() {
                Source::Csv(path) => assert_eq!(path, PathBuf::from(DEFAULT_CSV_PATH)),
                Source::RemoteSheet(url) => panic!("unexpected remote source: {url}"),
            }
        }
    }
}
