//! Dataset fetcher: download the airports CSV and place it atomically.
//!
//! Each run writes `airports-<UTC timestamp>.csv` and refreshes
//! `airports-latest.csv`. Both are written to a `.tmp` sibling first and
//! renamed into place, so a reader never sees a partially written file.

use std::error::Error as StdError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use crc32fast::Hasher as Crc32;
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_URL: &str = "https://ourairports.com/airports.csv";
pub const DEFAULT_OUT_DIR: &str = "data";
pub const LATEST_FILE_NAME: &str = "airports-latest.csv";

const USER_AGENT: &str = concat!("airport_index/", env!("CARGO_PKG_VERSION"));

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status code {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("read response body: {0}")]
    Body(#[source] BoxError),
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    fn io(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub url: String,
    pub out_dir: PathBuf,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

/// What a successful fetch left on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// The timestamped copy.
    pub path: PathBuf,
    /// The refreshed `airports-latest.csv`.
    pub latest: PathBuf,
    pub bytes: u64,
    pub crc32: u32,
}

/// HTTP client with this crate's user agent.
pub fn http_client() -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

/// `airports-YYYYMMDD-HHMMSS.csv` for the given instant.
pub fn dataset_file_name(at: DateTime<Utc>) -> String {
    format!("airports-{}.csv", at.format("%Y%m%d-%H%M%S"))
}

fn temp_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Download `options.url` into `options.out_dir`, then refresh the latest copy.
pub async fn fetch_dataset(
    client: &reqwest::Client,
    options: &FetchOptions,
) -> Result<FetchReport, FetchError> {
    tokio::fs::create_dir_all(&options.out_dir)
        .await
        .map_err(FetchError::io("create output dir", &options.out_dir))?;

    let path = options.out_dir.join(dataset_file_name(Utc::now()));
    let latest = options.out_dir.join(LATEST_FILE_NAME);

    tracing::info!(url = %options.url, "Downloading airports data");
    let response = client.get(&options.url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: options.url.clone(),
            status: status.as_u16(),
        });
    }
    if let Some(len) = response.content_length() {
        tracing::debug!(content_length = len, "Response headers received");
    }

    let (bytes, crc32) = persist_stream(response.bytes_stream(), &path).await?;
    tracing::info!(path = %path.display(), bytes, crc32 = format_args!("{crc32:08x}"), "Saved airports csv");

    copy_atomic(&path, &latest).await?;
    tracing::info!(path = %latest.display(), "Updated latest copy");

    Ok(FetchReport {
        path,
        latest,
        bytes,
        crc32,
    })
}

/// Write a byte stream to `dest` via a `.tmp` sibling and a rename.
///
/// Returns the byte count and CRC32 of what was written. On any failure
/// the temp file is removed and `dest` is left untouched.
pub async fn persist_stream<S, E>(stream: S, dest: &Path) -> Result<(u64, u32), FetchError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let tmp = temp_path(dest);
    let written = match write_chunks(stream, &tmp).await {
        Ok(written) => written,
        Err(err) => {
            discard_temp(&tmp).await;
            return Err(err);
        }
    };
    if let Err(source) = tokio::fs::rename(&tmp, dest).await {
        discard_temp(&tmp).await;
        return Err(FetchError::io("move temp file into place", dest)(source));
    }
    Ok(written)
}

async fn discard_temp(tmp: &Path) {
    if let Err(cleanup) = tokio::fs::remove_file(tmp).await {
        tracing::debug!(path = %tmp.display(), error = %cleanup, "Temp file cleanup failed");
    }
}

async fn write_chunks<S, E>(stream: S, tmp: &Path) -> Result<(u64, u32), FetchError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let mut file = tokio::fs::File::create(tmp)
        .await
        .map_err(FetchError::io("create temp file", tmp))?;
    let mut stream = std::pin::pin!(stream);
    let mut crc = Crc32::new();
    let mut total: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::Body(e.into()))?;
        file.write_all(&chunk)
            .await
            .map_err(FetchError::io("write temp file", tmp))?;
        crc.update(&chunk);
        total += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(FetchError::io("flush temp file", tmp))?;
    file.sync_all()
        .await
        .map_err(FetchError::io("sync temp file", tmp))?;

    Ok((total, crc.finalize()))
}

/// Copy `src` over `dst` without exposing a half-written `dst`.
pub async fn copy_atomic(src: &Path, dst: &Path) -> Result<u64, FetchError> {
    let tmp = temp_path(dst);
    let copied = match tokio::fs::copy(src, &tmp).await {
        Ok(n) => n,
        Err(source) => {
            discard_temp(&tmp).await;
            return Err(FetchError::io("copy", src)(source));
        }
    };
    if let Err(source) = tokio::fs::rename(&tmp, dst).await {
        discard_temp(&tmp).await;
        return Err(FetchError::io("rename", dst)(source));
    }
    Ok(copied)
}
