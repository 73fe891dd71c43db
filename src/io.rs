use crate::{LoadError, LoadResult};
use async_compression::tokio::bufread::{GzipDecoder, ZstdDecoder};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

use crate::codec::Transcoder;

/// Describes how the bytes of a dataset source are packaged.
#[derive(Debug, Clone)]
pub struct CsvMeta {
    /// e.g. "application/gzip" or "text/csv"
    pub content_type: String,
    /// e.g. "gzip", "zstd", or empty
    pub content_encoding: String,
    /// file name, used for extension fallback
    pub name_hint: String,
    /// Source character encoding; OurAirports publishes UTF-8
    pub charset: &'static encoding_rs::Encoding,
}

impl Default for CsvMeta {
    fn default() -> Self {
        Self {
            content_type: String::new(),
            content_encoding: String::new(),
            name_hint: String::new(),
            charset: encoding_rs::UTF_8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    None,
    Gzip,
    Zstd,
}

impl CsvMeta {
    /// Metadata guessed from a file name's extension.
    pub fn from_file_name(name: &str) -> Self {
        let (content_type, content_encoding) = if name.ends_with(".gz") {
            ("application/gzip", "gzip")
        } else if name.ends_with(".zst") {
            ("application/zstd", "zstd")
        } else {
            ("text/csv", "")
        };
        Self {
            content_type: content_type.into(),
            content_encoding: content_encoding.into(),
            name_hint: name.to_string(),
            ..Default::default()
        }
    }

    /// Encoding header first, then content type, then file extension.
    fn compression(&self) -> Compression {
        let encoding = self.content_encoding.to_ascii_lowercase();
        let content_type = self.content_type.to_ascii_lowercase();
        let encoded_as = |name: &str| encoding.split(',').any(|s| s.trim() == name);

        if encoded_as("gzip")
            || matches!(content_type.as_str(), "application/gzip" | "application/x-gzip")
            || self.name_hint.ends_with(".gz")
        {
            Compression::Gzip
        } else if encoded_as("zstd")
            || content_type == "application/zstd"
            || self.name_hint.ends_with(".zst")
        {
            Compression::Zstd
        } else {
            Compression::None
        }
    }
}

/// Wrap a raw source with decompression and, for non-UTF-8 charsets,
/// transcoding, yielding UTF-8 CSV bytes.
pub fn build_csv_reader<R>(raw: R, meta: CsvMeta) -> (impl AsyncRead + Unpin + Send, CsvMeta)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buf = BufReader::with_capacity(1 << 20, raw);
    let decompressed: Box<dyn AsyncRead + Unpin + Send> = match meta.compression() {
        Compression::Gzip => Box::new(GzipDecoder::new(buf)),
        Compression::Zstd => Box::new(ZstdDecoder::new(buf)),
        Compression::None => Box::new(buf),
    };

    let utf8: Box<dyn AsyncRead + Unpin + Send> = if meta.charset == encoding_rs::UTF_8 {
        decompressed
    } else {
        let framed = FramedRead::new(decompressed, Transcoder::new(meta.charset));
        Box::new(StreamReader::new(framed))
    };

    (utf8, meta)
}

/// Open a local dataset file. Compression is inferred from the extension.
pub async fn reader_from_path(path: &Path) -> LoadResult<(impl AsyncRead + Unpin + Send, CsvMeta)> {
    let file = File::open(path).await.map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    Ok(build_csv_reader(file, CsvMeta::from_file_name(name)))
}
