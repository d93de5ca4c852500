//! Outcome of one validation run.

use serde::{Deserialize, Serialize};

use cidcheck_model::{Diagnostic, DiagnosticKind};

/// Diagnostics collected while validating one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub source: String,
    /// Data rows validated, not counting header and empty rows.
    pub rows_read: usize,
    /// Diagnostics in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the run hit its diagnostics limit; end-of-data checks did
    /// not run.
    pub stopped_early: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.kind == kind)
            .count()
    }
}
