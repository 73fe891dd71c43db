//! Runs in its own process: the default index is process-global.

use airport_index::config::CSV_PATH_ENV;
use airport_index::{default_index, lookup_iata, LoadError};

#[tokio::test]
async fn failed_default_load_degrades_to_misses() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::env::set_var(CSV_PATH_ENV, dir.path().join("not-downloaded-yet.csv"));

    assert!(lookup_iata("JFK").await.is_none());
    assert!(lookup_iata("").await.is_none());

    // The error is cached, not retried, even once the file appears.
    std::fs::write(dir.path().join("not-downloaded-yet.csv"), "id,iata_code\n1,JFK\n")?;
    let first = default_index().await.unwrap_err();
    let second = default_index().await.unwrap_err();
    assert!(matches!(first, LoadError::Open { .. }));
    assert!(std::ptr::eq(first, second));
    assert!(lookup_iata("JFK").await.is_none());
    Ok(())
}
