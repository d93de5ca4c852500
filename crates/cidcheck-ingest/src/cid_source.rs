//! Interface descriptions stored as delimited text.

use std::path::Path;

use csv::Terminator;
use encoding_rs::UTF_8;
use tracing::debug;

use crate::decode::open_text;
use crate::delimited::{DelimitedRows, Layout, read_delimited};
use crate::error::Result;

/// Read the rows of an interface description file.
///
/// The file is UTF-8 unless it starts with a byte order mark. The item
/// delimiter is detected from the first non-blank line among `,` `;` tab
/// and `|`.
pub fn read_cid_rows(path: &Path) -> Result<DelimitedRows> {
    debug!(path = %path.display(), "opening interface description");
    let reader = open_text(path, UTF_8)?;
    read_delimited(
        reader,
        path,
        &Layout {
            delimiter: None,
            quote: b'"',
            escape: None,
            terminator: Terminator::CRLF,
        },
    )
}
