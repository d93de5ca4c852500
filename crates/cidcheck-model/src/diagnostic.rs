//! Located reports of validation failures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, FieldValueError};

/// What produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The row has more or fewer cells than the interface declares fields.
    RowShape,
    /// A cell was rejected by its field format.
    FieldValue,
    /// A check invariant was violated.
    Check,
}

impl DiagnosticKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::RowShape => "row shape",
            Self::FieldValue => "field value",
            Self::Check => "check",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One validation failure found in the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// 1-based physical row; `None` for failures decided at end of data.
    pub row_number: Option<usize>,
    /// Field or check the diagnostic is about.
    pub field: Option<String>,
    pub fatal: bool,
}

impl Diagnostic {
    pub fn row_shape(row_number: usize, actual: usize, expected: usize) -> Self {
        Self {
            kind: DiagnosticKind::RowShape,
            message: format!("row has {actual} cell(s) but must have {expected}"),
            row_number: Some(row_number),
            field: None,
            fatal: false,
        }
    }

    pub fn field_value(row_number: usize, field: &str, error: &FieldValueError) -> Self {
        Self {
            kind: DiagnosticKind::FieldValue,
            message: error.message.clone(),
            row_number: Some(row_number),
            field: Some(field.to_string()),
            fatal: false,
        }
    }

    pub fn check(row_number: Option<usize>, error: &CheckError) -> Self {
        Self {
            kind: DiagnosticKind::Check,
            message: error.message.clone(),
            row_number,
            field: Some(error.check.clone()),
            fatal: false,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row_number {
            write!(f, "row {row}: ")?;
        }
        match (self.kind, &self.field) {
            (DiagnosticKind::Check, Some(check)) => write!(f, "check {check}: ")?,
            (_, Some(field)) => write!(f, "field {field}: ")?,
            _ => {}
        }
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_row_and_field() {
        let diagnostic =
            Diagnostic::field_value(4, "age", &FieldValueError::new("value must not be empty"));
        assert_eq!(diagnostic.to_string(), "row 4: field age: value must not be empty");

        let end = Diagnostic::check(None, &CheckError::new("rows", "too few"));
        assert_eq!(end.to_string(), "check rows: too few");
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let json = serde_json::to_value(Diagnostic::row_shape(2, 3, 4)).expect("serialize");
        assert_eq!(json["kind"], "row_shape");
        assert_eq!(json["row_number"], 2);
        assert_eq!(json["fatal"], false);
    }
}
