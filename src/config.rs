//! Where the default airports dataset lives on disk.

use std::path::PathBuf;

/// Environment variable overriding [`DEFAULT_CSV_PATH`].
pub const CSV_PATH_ENV: &str = "AIRPORTS_CSV_PATH";

/// Relative to the working directory; matches the fetcher's "latest" copy.
pub const DEFAULT_CSV_PATH: &str = "data/airports-latest.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub csv_path: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

impl IndexConfig {
    /// `AIRPORTS_CSV_PATH` if set and non-empty, else the default path.
    pub fn from_env() -> Self {
        Self::from_override(std::env::var_os(CSV_PATH_ENV).map(PathBuf::from))
    }

    fn from_override(csv_path: Option<PathBuf>) -> Self {
        match csv_path {
            Some(path) if !path.as_os_str().is_empty() => Self { csv_path: path },
            _ => Self::default(),
        }
    }
}
