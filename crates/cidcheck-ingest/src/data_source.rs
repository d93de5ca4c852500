//! Data rows for any supported data format.

use std::path::Path;

use cidcheck_model::{Cid, FormatTag};

use crate::delimited::{DelimitedRows, delimited_rows};
use crate::error::{IngestError, Result};
use crate::fixed::{FixedRows, fixed_rows};

/// Rows of a data file, whatever its layout.
#[derive(Debug)]
pub enum DataRows {
    Delimited(DelimitedRows),
    Fixed(FixedRows),
}

impl Iterator for DataRows {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Delimited(rows) => rows.next(),
            Self::Fixed(rows) => rows.next(),
        }
    }
}

/// Open `path` with the reader matching the data format of `cid`.
pub fn data_rows(path: &Path, cid: &Cid) -> Result<DataRows> {
    match cid.data_format().tag() {
        FormatTag::Delimited => delimited_rows(path, cid.data_format()).map(DataRows::Delimited),
        FormatTag::Fixed => fixed_rows(path, cid).map(DataRows::Fixed),
        format @ FormatTag::Spreadsheet => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            format,
        }),
    }
}
