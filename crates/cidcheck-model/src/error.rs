//! Error types for interface descriptions and the data validated against them.
//!
//! Errors raised while interpreting the description itself (ranges, data
//! format properties, field rules, check rules) end up as a single
//! [`InterfaceError`] carrying the offending location. Errors raised while
//! interpreting data ([`FieldValueError`], [`CheckError`]) are recoverable
//! and get collected as diagnostics by the validation pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed range text such as `"5...3"` or `"..."`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid range {text:?}: {reason}")]
pub struct RangeSyntaxError {
    pub text: String,
    pub reason: String,
}

impl RangeSyntaxError {
    pub(crate) fn new(text: &str, reason: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// A number outside the range it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} is {value} but must be within range: {expected}")]
pub struct RangeValueError {
    pub name: String,
    pub value: i64,
    pub expected: String,
}

/// Unknown, invalid or missing data format property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFormatSyntaxError {
    /// The `format` value does not name a known data format.
    #[error("data format is {name:?} but must be one of: delimited, fixed, spreadsheet")]
    UnknownFormat { name: String },

    /// The property is not recognized for this data format.
    #[error("data format property {key:?} is not supported for format {format}")]
    UnknownProperty { format: &'static str, key: String },

    /// The property value failed its per-key validation.
    #[error("value {value:?} for data format property {key} is invalid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// A mandatory property was never set.
    #[error("required data format property {key} must be set")]
    MissingProperty { key: &'static str },

    /// Two properties hold values that cannot be used together.
    #[error("data format properties {first} and {second} must be different but both are {value:?}")]
    Conflict {
        first: &'static str,
        second: &'static str,
        value: char,
    },
}

/// A field rule or length that cannot be compiled into a field format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldSyntaxError {
    #[error("field type is {name:?} but must be one of: {known}")]
    UnknownType { name: String, known: String },

    #[error("rule {rule:?} for {field_type} field is invalid: {reason}")]
    InvalidRule {
        field_type: &'static str,
        rule: String,
        reason: String,
    },

    #[error(transparent)]
    Range(#[from] RangeSyntaxError),
}

/// A check rule or field list that does not fit its check type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckSyntaxError {
    #[error("check type is {name:?} but must be one of: {known}")]
    UnknownType { name: String, known: String },

    #[error("{check_type} check requires {expected} but got {actual} field(s)")]
    FieldCount {
        check_type: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("rule {rule:?} for {check_type} check is invalid: {reason}")]
    InvalidRule {
        check_type: &'static str,
        rule: String,
        reason: String,
    },

    #[error(transparent)]
    Range(#[from] RangeSyntaxError),
}

/// Position inside an interface description source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub source: String,
    /// 1-based row; `None` when the error concerns the description as a whole.
    pub row: Option<usize>,
    /// 1-based column.
    pub column: Option<usize>,
}

impl Location {
    pub fn new(source: impl Into<String>, row: Option<usize>, column: Option<usize>) -> Self {
        Self {
            source: source.into(),
            row,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.column) {
            (Some(row), Some(column)) => write!(f, "{} (R{}C{})", self.source, row, column),
            (Some(row), None) => write!(f, "{} (R{})", self.source, row),
            _ => write!(f, "{}", self.source),
        }
    }
}

/// Structural violation found while reading an interface description.
///
/// Always fatal: no partial schema is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct InterfaceError {
    pub location: Location,
    pub message: String,
}

impl InterfaceError {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A cell value rejected by its field format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldValueError {
    pub message: String,
}

impl FieldValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<RangeValueError> for FieldValueError {
    fn from(err: RangeValueError) -> Self {
        Self::new(err.to_string())
    }
}

/// A check invariant violated by the data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("check {check} failed: {message}")]
pub struct CheckError {
    pub check: String,
    pub message: String,
}

impl CheckError {
    pub fn new(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
        }
    }
}
