use bytes::{Buf, BytesMut};
use encoding_rs::{Decoder as CharsetDecoder, Encoding};
use std::io;
use tokio_util::codec::Decoder;

/// Frames a byte stream in some legacy charset into UTF-8 chunks.
pub struct Transcoder {
    decoder: CharsetDecoder,
}

impl Transcoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder(),
        }
    }

    /// Decode as much of `src` as possible. Malformed sequences become U+FFFD.
    fn transcode(&mut self, src: &mut BytesMut, last: bool) -> Option<BytesMut> {
        let capacity = self
            .decoder
            .max_utf8_buffer_length(src.len())
            .unwrap_or(src.len() * 3 + 16);
        let mut out = vec![0u8; capacity];

        let (_result, read, written, _replaced) = self.decoder.decode_to_utf8(src, &mut out, last);
        src.advance(read);

        if written == 0 {
            return None;
        }
        out.truncate(written);
        Some(BytesMut::from(&out[..]))
    }
}

impl Decoder for Transcoder {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        Ok(self.transcode(src, false))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let chunk = self.transcode(buf, true);
        buf.clear();
        Ok(chunk)
    }
}
