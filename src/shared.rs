use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::io::AsyncRead;
use tokio::sync::OnceCell;

use crate::config::IndexConfig;
use crate::index::AirportIndex;
use crate::record::AirportRecord;
use crate::{LoadError, LoadResult};

/// A cloneable handle to the current index that can be rebuilt in place.
///
/// Readers take a snapshot (`Arc`) and are never disturbed by a rebuild;
/// a new index is swapped in only after it has been fully built.
#[derive(Debug, Clone)]
pub struct SharedIndex {
    current: Arc<RwLock<Arc<AirportIndex>>>,
}

impl Default for SharedIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl SharedIndex {
    pub fn new(index: AirportIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    /// A handle whose lookups all miss until something is loaded.
    pub fn empty() -> Self {
        Self::new(AirportIndex::empty())
    }

    pub fn snapshot(&self) -> Arc<AirportIndex> {
        // The lock only guards a pointer swap; a poisoned guard still holds a valid Arc.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lookup(&self, code: &str) -> Option<AirportRecord> {
        self.snapshot().get(code).cloned()
    }

    /// Swap in `index`, returning the one it replaced.
    pub fn replace(&self, index: AirportIndex) -> Arc<AirportIndex> {
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, Arc::new(index))
    }

    /// Rebuild from `path`. On failure the current index stays in place.
    pub async fn reload_from_path(&self, path: impl AsRef<Path>) -> LoadResult<usize> {
        let index = AirportIndex::from_path(path).await?;
        Ok(self.install(index))
    }

    /// Rebuild from a stream. On failure the current index stays in place.
    pub async fn reload_from_reader<R>(&self, reader: R) -> LoadResult<usize>
    where
        R: AsyncRead + Unpin + Send,
    {
        let index = AirportIndex::from_reader(reader).await?;
        Ok(self.install(index))
    }

    fn install(&self, index: AirportIndex) -> usize {
        let len = index.len();
        let previous = self.replace(index);
        tracing::info!(airports = len, previous = previous.len(), "Swapped in rebuilt airport index");
        len
    }
}

static DEFAULT_INDEX: OnceCell<LoadResult<AirportIndex>> = OnceCell::const_new();

/// The process-wide index, loaded on first use from [`IndexConfig::from_env`].
///
/// Concurrent first callers wait on a single build. The outcome, including
/// a load error, is kept for the life of the process and never retried.
pub async fn default_index() -> Result<&'static AirportIndex, &'static LoadError> {
    DEFAULT_INDEX
        .get_or_init(|| async {
            let config = IndexConfig::from_env();
            let loaded = AirportIndex::from_path(&config.csv_path).await;
            if let Err(err) = &loaded {
                tracing::warn!(
                    path = %config.csv_path.display(),
                    error = %err,
                    "Failed to load default airport index; lookups will miss"
                );
            }
            loaded
        })
        .await
        .as_ref()
}

/// Look up `code` in the process-wide index. A failed load reads as a miss.
pub async fn lookup_iata(code: &str) -> Option<&'static AirportRecord> {
    default_index().await.ok()?.get(code)
}
