//! Interface description model.
//!
//! An interface description (CID) declares how a tabular data file looks:
//! its physical layout ([`DataFormatSpec`]), one [`FieldFormat`] per column,
//! and named cross-row checks ([`CheckSpec`]). [`Cid::read`] builds one from
//! description rows; the `cidcheck-validate` crate applies it to data.
//!
//! # Example
//!
//! ```ignore
//! use cidcheck_model::Cid;
//!
//! let cid = Cid::read(
//!     "customers.cid",
//!     [
//!         vec!["d", "format", "delimited"],
//!         vec!["f", "customer_id", "38000", "", "", "Integer", "0...99999"],
//!         vec!["c", "customer must be unique", "IsUnique", "customer_id"],
//!     ],
//! )?;
//! assert_eq!(cid.field_names(), ["customer_id"]);
//! ```

pub mod check;
pub mod cid;
pub mod data_format;
pub mod diagnostic;
pub mod error;
pub mod field;
pub mod range;

// === Schema ===
pub use cid::{Cid, CidBuilder};

// === Building blocks ===
pub use check::{Check, CheckSpec, CheckType, Comparison};
pub use data_format::{DataFormatSpec, Delimiter, FormatTag, PropertyKey, PropertyValue};
pub use field::{FieldFormat, FieldType};
pub use range::{RangeItem, RangeSpec};

// === Diagnostics and errors ===
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{
    CheckError, CheckSyntaxError, DataFormatSyntaxError, FieldSyntaxError, FieldValueError,
    InterfaceError, Location, RangeSyntaxError, RangeValueError,
};
