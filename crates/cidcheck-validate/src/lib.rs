//! Validation of data rows against an interface description.
//!
//! # Example
//!
//! ```ignore
//! use cidcheck_model::Cid;
//! use cidcheck_validate::{Pipeline, ValidationOptions};
//!
//! let cid = Cid::read("customers.cid", description_rows)?;
//! let report = Pipeline::new(&cid)
//!     .with_options(ValidationOptions::new().with_max_diagnostics(100))
//!     .validate("customers.csv", data_rows);
//! for diagnostic in &report.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

mod error;
mod pipeline;
mod report;

pub use error::{Result, SourceError, ValidateError};
pub use pipeline::{Pipeline, ValidationOptions, ValidationRun};
pub use report::ValidationReport;
