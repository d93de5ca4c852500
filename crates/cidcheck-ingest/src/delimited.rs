//! Delimited text (CSV and friends) as rows of cells.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use cidcheck_model::{DataFormatSpec, Delimiter, FormatTag, PropertyKey};
use csv::{ReaderBuilder, StringRecordsIntoIter, Terminator};
use tracing::debug;

use crate::decode::{TextReader, open_text};
use crate::error::{IngestError, Result};
use crate::sniff::sniff_item_delimiter;

/// Lazily read rows of a delimited text file.
pub struct DelimitedRows {
    path: PathBuf,
    records: StringRecordsIntoIter<TextReader>,
}

impl std::fmt::Debug for DelimitedRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelimitedRows")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Iterator for DelimitedRows {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(|source| IngestError::CsvParse {
                    path: self.path.clone(),
                    source,
                }),
        )
    }
}

/// How to split a delimited file; `delimiter: None` means sniff it.
pub(crate) struct Layout {
    pub(crate) delimiter: Option<u8>,
    pub(crate) quote: u8,
    pub(crate) escape: Option<u8>,
    pub(crate) terminator: Terminator,
}

pub(crate) fn read_delimited(
    mut reader: TextReader,
    path: &Path,
    layout: &Layout,
) -> Result<DelimitedRows> {
    let delimiter = match layout.delimiter {
        Some(delimiter) => delimiter,
        None => {
            let sample = reader.fill_buf().map_err(|source| IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
            let sniffed = sniff_item_delimiter(sample, layout.quote);
            debug!(
                path = %path.display(),
                delimiter = %char::from(sniffed).escape_default(),
                "sniffed item delimiter"
            );
            sniffed
        }
    };
    let records = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote(layout.quote)
        .escape(layout.escape)
        .double_quote(layout.escape.is_none())
        .terminator(layout.terminator)
        .from_reader(reader)
        .into_records();
    Ok(DelimitedRows {
        path: path.to_path_buf(),
        records,
    })
}

fn ascii(path: &Path, key: PropertyKey, value: char) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| IngestError::UnrepresentableDelimiter {
            path: path.to_path_buf(),
            key: key.name(),
            value,
        })
}

/// Read data rows from a delimited file laid out as `data_format` says.
///
/// Header rows are returned like any other row; skipping them is up to the
/// validation pipeline so row numbers stay physical.
pub fn delimited_rows(path: &Path, data_format: &DataFormatSpec) -> Result<DelimitedRows> {
    if data_format.tag() != FormatTag::Delimited {
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: data_format.tag(),
        });
    }
    let delimiter = match data_format.item_delimiter() {
        Delimiter::Any => None,
        Delimiter::Char(ch) => Some(ascii(path, PropertyKey::ItemDelimiter, ch)?),
        Delimiter::CrLf => {
            return Err(IngestError::UnrepresentableDelimiter {
                path: path.to_path_buf(),
                key: PropertyKey::ItemDelimiter.name(),
                value: '\r',
            });
        }
    };
    let terminator = match data_format.line_delimiter() {
        Delimiter::Any | Delimiter::CrLf => Terminator::CRLF,
        Delimiter::Char(ch) => Terminator::Any(ascii(path, PropertyKey::LineDelimiter, ch)?),
    };
    let quote_character = data_format.quote_character();
    let quote = ascii(path, PropertyKey::QuoteCharacter, quote_character)?;
    let escape_character = data_format.escape_character();
    let escape = if escape_character == quote_character {
        None
    } else {
        Some(ascii(path, PropertyKey::EscapeCharacter, escape_character)?)
    };
    debug!(
        path = %path.display(),
        encoding = data_format.encoding().name(),
        "opening delimited data"
    );
    let reader = open_text(path, data_format.encoding())?;
    read_delimited(
        reader,
        path,
        &Layout {
            delimiter,
            quote,
            escape,
            terminator,
        },
    )
}
