use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use cidcheck_ingest::{data_rows, read_cid_rows};
use cidcheck_model::Cid;
use cidcheck_validate::{Pipeline, ValidationOptions, ValidationReport};

use crate::logging::redact_value;

/// Read and parse an interface description file.
pub fn load_cid(path: &Path) -> Result<Cid> {
    let rows = read_cid_rows(path)
        .with_context(|| format!("open interface description {}", path.display()))?
        .collect::<cidcheck_ingest::Result<Vec<_>>>()
        .with_context(|| format!("read interface description {}", path.display()))?;
    let cid = Cid::read(path.display().to_string(), rows)?;
    info!(
        cid = %path.display(),
        fields = cid.field_count(),
        checks = cid.checks().len(),
        "loaded interface description"
    );
    Ok(cid)
}

/// Validate each data file in turn, one report per file.
///
/// A file that cannot be read aborts the command; data problems end up in
/// the reports.
pub fn run_validate(
    cid_path: &Path,
    data_paths: &[PathBuf],
    options: &ValidationOptions,
) -> Result<Vec<ValidationReport>> {
    let cid = load_cid(cid_path)?;
    let pipeline = Pipeline::new(&cid).with_options(options.clone());
    let mut reports = Vec::with_capacity(data_paths.len());
    for path in data_paths {
        let span = info_span!("data_file", path = %path.display());
        let _guard = span.enter();
        let rows = data_rows(path, &cid)
            .with_context(|| format!("open data file {}", path.display()))?;
        let report = pipeline
            .validate_results(path.display().to_string(), rows)
            .with_context(|| format!("validate data file {}", path.display()))?;
        for diagnostic in &report.diagnostics {
            trace!(
                row = ?diagnostic.row_number,
                field = diagnostic.field.as_deref().unwrap_or("-"),
                message = redact_value(&diagnostic.message),
                "diagnostic"
            );
        }
        reports.push(report);
    }
    Ok(reports)
}

pub fn has_diagnostics(reports: &[ValidationReport]) -> bool {
    reports.iter().any(|report| !report.is_valid())
}
