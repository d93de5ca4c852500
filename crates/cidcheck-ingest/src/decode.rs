//! Streaming text decoding into UTF-8.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use encoding_rs::{Decoder, Encoding};

use crate::error::{IngestError, Result};

const CHUNK_SIZE: usize = 8 * 1024;

/// Buffered UTF-8 view of a text file.
pub(crate) type TextReader = BufReader<DecodeReader<File>>;

/// Open `path` for reading as text in `encoding`.
pub(crate) fn open_text(path: &Path, encoding: &'static Encoding) -> Result<TextReader> {
    let file = File::open(path).map_err(|err| IngestError::open(path.to_path_buf(), err))?;
    Ok(BufReader::with_capacity(
        CHUNK_SIZE * 4,
        DecodeReader::new(file, encoding),
    ))
}

/// Reader yielding the UTF-8 form of text read in `encoding`.
///
/// A byte order mark overrides the declared encoding and is dropped.
/// Malformed input is an [`io::ErrorKind::InvalidData`] error rather than
/// replacement characters.
pub(crate) struct DecodeReader<R> {
    inner: R,
    encoding: &'static Encoding,
    decoder: Decoder,
    raw: Vec<u8>,
    decoded: Vec<u8>,
    position: usize,
    finished: bool,
}

impl<R: Read> DecodeReader<R> {
    pub(crate) fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            decoder: encoding.new_decoder(),
            raw: vec![0; CHUNK_SIZE],
            decoded: Vec::new(),
            position: 0,
            finished: false,
        }
    }

    fn refill(&mut self) -> io::Result<()> {
        let read = self.inner.read(&mut self.raw)?;
        let last = read == 0;
        let capacity = self
            .decoder
            .max_utf8_buffer_length(read)
            .ok_or_else(|| io::Error::other("decoded chunk is too large"))?;
        self.decoded.clear();
        self.decoded.resize(capacity, 0);
        self.position = 0;
        let (_, _, written, had_errors) =
            self.decoder
                .decode_to_utf8(&self.raw[..read], &mut self.decoded, last);
        self.decoded.truncate(written);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("input is not valid {}", self.encoding.name()),
            ));
        }
        self.finished = last;
        Ok(())
    }
}

impl<R: Read> Read for DecodeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.position == self.decoded.len() {
            if self.finished {
                return Ok(0);
            }
            self.refill()?;
        }
        let available = &self.decoded[self.position..];
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.position += count;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], encoding: &'static Encoding) -> io::Result<String> {
        let mut text = String::new();
        DecodeReader::new(bytes, encoding).read_to_string(&mut text)?;
        Ok(text)
    }

    #[test]
    fn decodes_legacy_encodings() {
        let text = decode(b"Gr\xf6\xdfe", encoding_rs::WINDOWS_1252).expect("decode");
        assert_eq!(text, "Größe");
    }

    #[test]
    fn bom_wins_over_declared_encoding() {
        let text = decode(b"\xef\xbb\xbfx\xc3\xa4", encoding_rs::WINDOWS_1252).expect("decode");
        assert_eq!(text, "xä");
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = decode(b"ab\xff", encoding_rs::UTF_8).expect_err("invalid input");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn handles_input_larger_than_one_chunk() {
        let input = "ä".repeat(CHUNK_SIZE);
        let text = decode(input.as_bytes(), encoding_rs::UTF_8).expect("decode");
        assert_eq!(text, input);
    }
}
