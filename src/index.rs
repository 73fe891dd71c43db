use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use csv_async::{AsyncReaderBuilder, ByteRecord};
use tokio::io::AsyncRead;

use crate::io::reader_from_path;
use crate::record::{AirportRecord, ColumnMap};
use crate::{LoadError, LoadResult};

/// OurAirports lists ~80k airports; only a fraction carry an IATA code.
const EXPECTED_ENTRIES: usize = 16_384;

/// Airports keyed by uppercase IATA code. Immutable once built.
#[derive(Debug, Default)]
pub struct AirportIndex {
    by_iata: HashMap<String, AirportRecord>,
}

impl AirportIndex {
    /// An index with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Open `path` (plain, `.gz` or `.zst`) and build from its contents.
    pub async fn from_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let (reader, meta) = reader_from_path(path).await?;
        tracing::debug!(
            path = %path.display(),
            content_type = %meta.content_type,
            "Loading airports csv"
        );
        Self::from_reader(reader).await
    }

    /// Build from a CSV stream with a header row.
    ///
    /// Rows without a numeric `id` or without an `iata_code` are skipped.
    /// When several rows share an IATA code the first one read is kept.
    /// Fails only if the header cannot be read or the stream errors.
    pub async fn from_reader<R>(reader: R) -> LoadResult<Self>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut rdr = AsyncReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .buffer_capacity(1 << 20) // 1 MiB
            .create_reader(reader);

        let headers = rdr.headers().await.map_err(LoadError::Header)?;
        if headers.is_empty() {
            return Err(LoadError::MissingHeader);
        }
        let columns = ColumnMap::new(headers.iter());

        let mut by_iata = HashMap::with_capacity(EXPECTED_ENTRIES);
        let mut rows = 0usize;
        let mut record = ByteRecord::new();

        while rdr.read_byte_record(&mut record).await? {
            rows += 1;
            let Some(airport) = AirportRecord::from_row(&columns, &record) else {
                continue;
            };
            if let Entry::Vacant(slot) = by_iata.entry(airport.iata_code.clone()) {
                slot.insert(airport);
            }
        }

        tracing::info!(rows, airports = by_iata.len(), "Built airport index");
        Ok(Self { by_iata })
    }

    /// Look up an airport by IATA code, ignoring ASCII case.
    pub fn get(&self, code: &str) -> Option<&AirportRecord> {
        if code.is_empty() {
            return None;
        }
        self.by_iata.get(&code.to_ascii_uppercase())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_iata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_iata.is_empty()
    }

    /// All indexed airports, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &AirportRecord> {
        self.by_iata.values()
    }
}
