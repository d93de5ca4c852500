//! Error types for validation runs.

use thiserror::Error;

/// Boxed error raised by a row source.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Contract failures while running a validation.
///
/// Problems with the data itself never surface here; they become
/// diagnostics in the report.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The row source failed before all rows were read.
    #[error("failed to read row {row} of {name}: {source}")]
    RowSource {
        name: String,
        /// 1-based physical row that could not be read.
        row: usize,
        #[source]
        source: SourceError,
    },
}

/// Result type for validation runs.
pub type Result<T> = std::result::Result<T, ValidateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_source_error_display() {
        let err = ValidateError::RowSource {
            name: "customers.csv".to_string(),
            row: 7,
            source: "unexpected end of file".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read row 7 of customers.csv: unexpected end of file"
        );
    }
}
