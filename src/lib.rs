//! In-memory airport lookup by IATA code, built from the OurAirports CSV.
//!
//! - Build: `AirportIndex::from_reader` (any tokio `AsyncRead`) or
//!   `AirportIndex::from_path` (plain, `.gz` or `.zst` files).
//! - Lookup: `AirportIndex::get`, case-insensitive, `None` on a miss.
//! - Sharing: `SharedIndex` for an injectable handle that can be rebuilt,
//!   `lookup_iata` for the lazily loaded process-wide default.
//! - Fetching (feature `fetch`): download the dataset with atomic placement.
//!
//! Data shape:
//! - `AirportRecord` per CSV row that has a numeric `id` and an `iata_code`.
#![cfg_attr(docsrs, feature(doc_cfg))]
//
mod codec;
pub mod config;
#[cfg(feature = "fetch")]
pub mod fetch;
mod index;
mod io;
pub mod logging;
mod record;
mod shared;

pub use crate::config::IndexConfig;
pub use crate::index::AirportIndex;
pub use crate::io::{build_csv_reader, reader_from_path, CsvMeta};
pub use crate::record::{columns, AirportRecord, ColumnMap};
pub use crate::shared::{default_index, lookup_iata, SharedIndex};

use std::path::PathBuf;
use thiserror::Error;

/// Failure that prevents an index from being built at all.
///
/// Per-row problems never surface here; bad rows are skipped and bad
/// optional cells fall back to their defaults.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open airports csv {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read header: stream is empty")]
    MissingHeader,
    #[error("read header: {0}")]
    Header(#[source] csv_async::Error),
    #[error("read record: {0}")]
    Csv(#[from] csv_async::Error),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
