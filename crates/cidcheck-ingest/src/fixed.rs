//! Fixed-width text as rows of cells.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use cidcheck_model::{Cid, Delimiter, FormatTag};
use tracing::debug;

use crate::decode::{TextReader, open_text};
use crate::error::{IngestError, Result};

/// Lazily read lines of a fixed-width file, split by field widths.
pub struct FixedRows {
    path: PathBuf,
    reader: TextReader,
    widths: Vec<usize>,
    terminator: u8,
    strip_cr: bool,
    buffer: Vec<u8>,
}

impl std::fmt::Debug for FixedRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedRows")
            .field("path", &self.path)
            .field("widths", &self.widths)
            .finish_non_exhaustive()
    }
}

impl FixedRows {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(self.terminator, &mut self.buffer)? == 0 {
            return Ok(None);
        }
        if self.buffer.last() == Some(&self.terminator) {
            self.buffer.pop();
        }
        if self.strip_cr && self.buffer.last() == Some(&b'\r') {
            self.buffer.pop();
        }
        String::from_utf8(std::mem::take(&mut self.buffer))
            .map(Some)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

impl Iterator for FixedRows {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_line() {
            Ok(Some(line)) => Some(Ok(split_fixed(&line, &self.widths))),
            Ok(None) => None,
            Err(source) => Some(Err(IngestError::FileRead {
                path: self.path.clone(),
                source,
            })),
        }
    }
}

/// Cut `line` into cells of `widths` characters. A short line yields fewer
/// cells; characters beyond the last width become one extra cell.
fn split_fixed(line: &str, widths: &[usize]) -> Vec<String> {
    let mut cells = Vec::with_capacity(widths.len());
    let mut rest = line;
    for &width in widths {
        if rest.is_empty() {
            break;
        }
        let end = rest
            .char_indices()
            .nth(width)
            .map_or(rest.len(), |(index, _)| index);
        cells.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        cells.push(rest.to_string());
    }
    cells
}

/// Read data rows from a fixed-width file described by `cid`.
pub fn fixed_rows(path: &Path, cid: &Cid) -> Result<FixedRows> {
    let data_format = cid.data_format();
    if data_format.tag() != FormatTag::Fixed {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: data_format.tag(),
        });
    }
    // Every fixed field declares an exact positive length.
    let widths: Vec<usize> = cid
        .fields()
        .iter()
        .map(|field| {
            field
                .length()
                .exact()
                .and_then(|width| usize::try_from(width).ok())
                .unwrap_or(0)
        })
        .collect();
    let (terminator, strip_cr) = match data_format.line_delimiter() {
        Delimiter::Char(ch) if ch.is_ascii() && ch != '\n' => (ch as u8, false),
        _ => (b'\n', true),
    };
    debug!(path = %path.display(), widths = ?widths, "opening fixed-width data");
    Ok(FixedRows {
        path: path.to_path_buf(),
        reader: open_text(path, data_format.encoding())?,
        widths,
        terminator,
        strip_cr,
        buffer: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_by_character_widths() {
        assert_eq!(split_fixed("38000ä23", &[5, 1, 2]), ["38000", "ä", "23"]);
    }

    #[test]
    fn short_and_long_lines() {
        assert_eq!(split_fixed("380", &[5, 2]), ["380"]);
        assert_eq!(split_fixed("3800023xyz", &[5, 2]), ["38000", "23", "xyz"]);
        assert!(split_fixed("", &[5, 2]).is_empty());
    }
}
