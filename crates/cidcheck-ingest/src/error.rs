//! Error types for reading row sources.

use std::path::PathBuf;

use cidcheck_model::FormatTag;
use thiserror::Error;

/// Errors that can occur while reading rows from a file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read or decode the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// The delimited text could not be parsed.
    #[error("failed to parse delimited data in {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // === Layout Errors ===
    /// The data format has no reader for this kind of file.
    #[error("cannot read {path}: data format {format} is not supported by this reader")]
    UnsupportedFormat { path: PathBuf, format: FormatTag },

    /// The delimited reader only handles single-byte delimiters and quotes.
    #[error("cannot read {path}: {key} {value:?} must be an ASCII character")]
    UnrepresentableDelimiter {
        path: PathBuf,
        key: &'static str,
        value: char,
    },
}

impl IngestError {
    pub(crate) fn open(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
