//! Row sources for interface descriptions and data files.
//!
//! Every reader yields a lazy sequence of `Result<Vec<String>>`, one item
//! per physical row, decoded to UTF-8 from the declared encoding.
//!
//! # Features
//!
//! - **Interface descriptions**: [`read_cid_rows`] reads a description
//!   stored as delimited text, detecting the item delimiter
//! - **Delimited data**: [`delimited_rows`] honors the delimiters, quote and
//!   escape characters of a data format
//! - **Fixed-width data**: [`fixed_rows`] cuts lines by field lengths
//!
//! Spreadsheet data formats are rejected with
//! [`IngestError::UnsupportedFormat`].

mod cid_source;
mod data_source;
mod decode;
mod delimited;
mod error;
mod fixed;
mod sniff;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use cid_source::read_cid_rows;
pub use data_source::{DataRows, data_rows};
pub use delimited::{DelimitedRows, delimited_rows};
pub use fixed::{FixedRows, fixed_rows};
