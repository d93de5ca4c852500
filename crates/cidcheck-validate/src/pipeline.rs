//! Drives data rows through a [`Cid`]'s fields and checks.
//!
//! A run never fails because of the data: every rejected cell and every
//! violated check becomes a [`Diagnostic`] and the run moves on to the next
//! row. Only a failing row source ends a run with an error.

use tracing::{Span, debug, info, info_span, warn};

use cidcheck_model::{Check, Cid, Diagnostic};

use crate::error::{Result, SourceError, ValidateError};
use crate::report::ValidationReport;

/// Knobs for a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Stop pulling rows once this many diagnostics were collected. With
    /// `0` the run stops at the first diagnostic without recording it.
    pub max_diagnostics: Option<usize>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_diagnostics(mut self, max_diagnostics: usize) -> Self {
        self.max_diagnostics = Some(max_diagnostics);
        self
    }
}

/// Validates data sources against one interface description.
///
/// Holds no per-run state, so one pipeline can run any number of
/// validations, one after another or from several threads.
#[derive(Debug, Clone)]
pub struct Pipeline<'c> {
    cid: &'c Cid,
    options: ValidationOptions,
}

impl<'c> Pipeline<'c> {
    pub fn new(cid: &'c Cid) -> Self {
        Self {
            cid,
            options: ValidationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cid(&self) -> &'c Cid {
        self.cid
    }

    /// Begin a run with fresh check state.
    pub fn start(&self, source: impl Into<String>) -> ValidationRun<'c> {
        ValidationRun::new(self.cid, self.options.clone(), source.into())
    }

    /// Validate every row of an infallible source.
    pub fn validate<I, R, S>(&self, source: impl Into<String>, rows: I) -> ValidationReport
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut run = self.start(source);
        for row in rows {
            if run.is_stopped() {
                break;
            }
            run.feed(row.as_ref());
        }
        run.finish()
    }

    /// Validate rows from a fallible source such as a file reader.
    ///
    /// The first source error aborts the run.
    pub fn validate_results<I, R, S, E>(
        &self,
        source: impl Into<String>,
        rows: I,
    ) -> Result<ValidationReport>
    where
        I: IntoIterator<Item = std::result::Result<R, E>>,
        R: AsRef<[S]>,
        S: AsRef<str>,
        E: Into<SourceError>,
    {
        let mut run = self.start(source);
        for row in rows {
            if run.is_stopped() {
                break;
            }
            let row = row.map_err(|err| ValidateError::RowSource {
                name: run.source.clone(),
                row: run.row_number + 1,
                source: err.into(),
            })?;
            run.feed(row.as_ref());
        }
        Ok(run.finish())
    }
}

/// State of one validation run.
///
/// Feed rows in physical order, starting with the first row of the source
/// (header rows included), then call [`finish`](Self::finish).
#[derive(Debug)]
pub struct ValidationRun<'c> {
    cid: &'c Cid,
    options: ValidationOptions,
    source: String,
    checks: Vec<Check<'c>>,
    row_number: usize,
    rows_read: usize,
    diagnostics: Vec<Diagnostic>,
    stopped_early: bool,
    span: Span,
}

impl<'c> ValidationRun<'c> {
    fn new(cid: &'c Cid, options: ValidationOptions, source: String) -> Self {
        let span = info_span!("validate", source = %source);
        span.in_scope(|| {
            debug!(
                field_count = cid.field_count(),
                check_count = cid.checks().len(),
                header = cid.data_format().header(),
                "starting validation run"
            );
        });
        Self {
            cid,
            checks: cid.checks().iter().map(Check::new).collect(),
            options,
            source,
            row_number: 0,
            rows_read: 0,
            diagnostics: Vec::new(),
            stopped_early: false,
            span,
        }
    }

    /// True once the diagnostics limit was reached; further rows are
    /// ignored.
    pub fn is_stopped(&self) -> bool {
        self.stopped_early
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Validate the next physical row.
    pub fn feed<S: AsRef<str>>(&mut self, row: &[S]) {
        if self.stopped_early {
            return;
        }
        let span = self.span.clone();
        let _guard = span.enter();
        self.row_number += 1;
        let row_number = self.row_number;
        if row_number <= self.cid.data_format().header() {
            debug!(row = row_number, "skipping header row");
            return;
        }
        if row.is_empty() {
            debug!(row = row_number, "skipping empty row");
            return;
        }
        self.rows_read += 1;

        let expected = self.cid.field_count();
        if row.len() != expected {
            warn!(
                row = row_number,
                cells = row.len(),
                expected,
                "row cell count differs from field count"
            );
            self.record(Diagnostic::row_shape(row_number, row.len(), expected));
        }
        let cid = self.cid;
        for (field, value) in cid.fields().iter().zip(row) {
            if self.stopped_early {
                return;
            }
            if let Err(err) = field.validate(value.as_ref()) {
                debug!(row = row_number, field = %field.name(), "field value rejected");
                self.record(Diagnostic::field_value(row_number, field.name(), &err));
            }
        }

        let mut failures = Vec::new();
        for check in &mut self.checks {
            if let Err(err) = check.check_row(row, row_number) {
                debug!(row = row_number, check = %check.name(), "check failed");
                failures.push(err);
            }
        }
        for err in &failures {
            if self.stopped_early {
                return;
            }
            self.record(Diagnostic::check(Some(row_number), err));
        }
    }

    /// Run end-of-data checks, unless the run stopped early, and produce
    /// the report.
    pub fn finish(mut self) -> ValidationReport {
        let span = self.span.clone();
        let _guard = span.enter();
        if !self.stopped_early {
            let failures: Vec<_> = self
                .checks
                .iter_mut()
                .filter_map(|check| check.check_at_end().err())
                .collect();
            for err in &failures {
                if self.stopped_early {
                    break;
                }
                self.record(Diagnostic::check(None, err));
            }
        }
        info!(
            rows_read = self.rows_read,
            diagnostics = self.diagnostics.len(),
            stopped_early = self.stopped_early,
            "validation run finished"
        );
        ValidationReport {
            source: self.source,
            rows_read: self.rows_read,
            diagnostics: self.diagnostics,
            stopped_early: self.stopped_early,
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        if self
            .options
            .max_diagnostics
            .is_none_or(|max| self.diagnostics.len() < max)
        {
            self.diagnostics.push(diagnostic);
        }
        if let Some(max) = self.options.max_diagnostics
            && self.diagnostics.len() >= max
        {
            info!(max_diagnostics = max, row = self.row_number, "diagnostics limit reached");
            self.stopped_early = true;
        }
    }
}
