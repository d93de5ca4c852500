//! Interface descriptions: reading description rows into an executable
//! schema.
//!
//! Rows are classified by their first non-blank cell (the marker):
//!
//! - `d`: data format property, `[d, name, value]`
//! - `f`: field, `[f, name, example, empty_marker, length, type, rule]`
//! - `c`: check, `[c, name, type, fields, rule]`
//!
//! Anything else, including blank rows, is skipped. Every structural
//! violation aborts the read with an [`InterfaceError`] naming the row and
//! column it was found in.

use std::fmt;

use tracing::{debug, info, info_span};

use crate::check::{CheckSpec, CheckType};
use crate::data_format::{DataFormatSpec, FormatTag, PropertyKey};
use crate::error::{CheckSyntaxError, DataFormatSyntaxError, InterfaceError, Location};
use crate::field::{FieldFormat, FieldType, validate_field_name};
use crate::range::RangeSpec;

/// Row kinds recognized by their marker cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    DataFormat,
    Field,
    Check,
}

impl RowKind {
    fn from_marker(marker: &str) -> Option<Self> {
        match marker.to_ascii_lowercase().as_str() {
            "d" => Some(Self::DataFormat),
            "f" => Some(Self::Field),
            "c" => Some(Self::Check),
            _ => None,
        }
    }
}

/// Cells of one description row, addressed relative to its marker.
struct MarkedRow<'r, S> {
    cells: &'r [S],
    marker_index: usize,
}

impl<S: AsRef<str>> MarkedRow<'_, S> {
    /// Cell `offset` places after the marker, `""` when missing.
    fn raw(&self, offset: usize) -> &str {
        self.cells
            .get(self.marker_index + offset)
            .map_or("", AsRef::as_ref)
    }

    fn trimmed(&self, offset: usize) -> &str {
        self.raw(offset).trim()
    }

    /// 1-based column of the cell `offset` places after the marker.
    fn column(&self, offset: usize) -> usize {
        self.marker_index + offset + 1
    }
}

/// Push-style reader behind [`Cid::read`].
///
/// Feed rows in order with [`add_row`](Self::add_row), then call
/// [`finish`](Self::finish). Useful when rows come from a fallible source
/// the caller wants to drive itself.
#[derive(Debug)]
pub struct CidBuilder {
    source: String,
    row_number: usize,
    data_format: Option<DataFormatSpec>,
    fields: Vec<FieldFormat>,
    checks: Vec<CheckSpec>,
}

impl CidBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            row_number: 0,
            data_format: None,
            fields: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Interpret the next description row.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<(), InterfaceError> {
        self.row_number += 1;
        let Some(marker_index) = row.iter().position(|cell| !cell.as_ref().trim().is_empty())
        else {
            return Ok(());
        };
        let marked = MarkedRow {
            cells: row,
            marker_index,
        };
        let Some(kind) = RowKind::from_marker(marked.trimmed(0)) else {
            debug!(source = %self.source, row = self.row_number, "skipping row");
            return Ok(());
        };
        debug!(source = %self.source, row = self.row_number, kind = ?kind, "reading row");
        match kind {
            RowKind::DataFormat => self.add_data_format_row(&marked),
            RowKind::Field => self.add_field_row(&marked),
            RowKind::Check => self.add_check_row(&marked),
        }
    }

    /// Complete the read. Fails if no rows were added, if `format` was
    /// never set, or if required data format properties are missing.
    pub fn finish(self) -> Result<Cid, InterfaceError> {
        let location = Location::new(&self.source, None, None);
        if self.row_number == 0 {
            return Err(InterfaceError::new(
                location,
                "interface description must contain at least one row",
            ));
        }
        let Some(data_format) = self.data_format else {
            return Err(InterfaceError::new(
                location,
                DataFormatSyntaxError::MissingProperty {
                    key: PropertyKey::Format.name(),
                }
                .to_string(),
            ));
        };
        data_format
            .validate_required_properties()
            .map_err(|err| InterfaceError::new(location, err.to_string()))?;
        info!(
            source = %self.source,
            format = %data_format.tag(),
            field_count = self.fields.len(),
            check_count = self.checks.len(),
            "interface description read"
        );
        Ok(Cid {
            source: self.source,
            data_format,
            fields: self.fields,
            checks: self.checks,
        })
    }

    fn error(&self, column: usize, message: impl Into<String>) -> InterfaceError {
        InterfaceError::new(
            Location::new(&self.source, Some(self.row_number), Some(column)),
            message,
        )
    }

    fn add_data_format_row<S: AsRef<str>>(
        &mut self,
        row: &MarkedRow<'_, S>,
    ) -> Result<(), InterfaceError> {
        // Field rules are compiled against the data format as it stands.
        if !self.fields.is_empty() {
            return Err(self.error(
                row.column(0),
                "data format properties must be set before the first field",
            ));
        }
        let name = row.trimmed(1);
        if name.is_empty() {
            return Err(self.error(row.column(1), "data format property name must be specified"));
        }
        let value = row.trimmed(2);
        if value.is_empty() {
            return Err(self.error(
                row.column(2),
                format!("value for data format property {name:?} must be specified"),
            ));
        }
        let key = PropertyKey::from_name(name);
        let Some(data_format) = self.data_format.as_mut() else {
            if key != Some(PropertyKey::Format) {
                return Err(self.error(
                    row.column(1),
                    format!("data format property {name:?} must be set after format"),
                ));
            }
            let tag =
                FormatTag::parse(value).map_err(|err| self.error(row.column(2), err.to_string()))?;
            debug!(source = %self.source, format = %tag, "data format selected");
            self.data_format = Some(DataFormatSpec::new(tag));
            return Ok(());
        };
        if let Some(key) = key
            && data_format.is_set(key)
        {
            let column = row.column(1);
            return Err(self.error(
                column,
                format!("data format property {} must be set only once", key.name()),
            ));
        }
        if let Err(err) = data_format.set(name, value) {
            let column = match err {
                DataFormatSyntaxError::UnknownProperty { .. } => row.column(1),
                _ => row.column(2),
            };
            return Err(self.error(column, err.to_string()));
        }
        Ok(())
    }

    fn add_field_row<S: AsRef<str>>(
        &mut self,
        row: &MarkedRow<'_, S>,
    ) -> Result<(), InterfaceError> {
        let Some(data_format) = self.data_format.as_ref() else {
            return Err(self.error(
                row.column(0),
                "data format property format must be set before the first field",
            ));
        };
        let name = row.trimmed(1);
        validate_field_name(name).map_err(|err| self.error(row.column(1), err.to_string()))?;
        if self.fields.iter().any(|field| field.name() == name) {
            return Err(self.error(
                row.column(1),
                format!("field name {name:?} must be used only once"),
            ));
        }

        let example = Some(row.raw(2))
            .filter(|example| !example.trim().is_empty())
            .map(str::to_string);
        let allowed_to_be_empty = match row.trimmed(3) {
            "" => false,
            marker if marker.eq_ignore_ascii_case("x") => true,
            marker => {
                return Err(self.error(
                    row.column(3),
                    format!("mark for empty field is {marker:?} but must be blank or X"),
                ));
            }
        };
        let length = RangeSpec::parse(row.raw(4))
            .map_err(|err| self.error(row.column(4), err.to_string()))?;
        if data_format.tag() == FormatTag::Fixed && length.exact().is_none_or(|width| width < 1) {
            return Err(self.error(
                row.column(4),
                format!("field {name:?} must declare an exact positive length for fixed data"),
            ));
        }
        let field_type = match row.trimmed(5) {
            "" => FieldType::Text,
            type_name => FieldType::resolve(type_name)
                .map_err(|err| self.error(row.column(5), err.to_string()))?,
        };
        let field = FieldFormat::new(name, self.fields.len(), field_type, row.raw(6), data_format)
            .map_err(|err| self.error(row.column(6), err.to_string()))?
            .with_length(length)
            .with_allowed_to_be_empty(allowed_to_be_empty)
            .with_example(example);
        if let Some(example) = field.example() {
            field.validate(example).map_err(|err| {
                self.error(
                    row.column(2),
                    format!("example {example:?} for field {name:?} is invalid: {err}"),
                )
            })?;
        }
        debug!(source = %self.source, field = %name, field_type = %field_type, "field declared");
        self.fields.push(field);
        Ok(())
    }

    fn add_check_row<S: AsRef<str>>(
        &mut self,
        row: &MarkedRow<'_, S>,
    ) -> Result<(), InterfaceError> {
        let name = row.trimmed(1);
        if name.is_empty() {
            return Err(self.error(row.column(1), "check name must be specified"));
        }
        if self.checks.iter().any(|check| check.name() == name) {
            return Err(self.error(
                row.column(1),
                format!("check name {name:?} must be used only once"),
            ));
        }
        let check_type = CheckType::resolve(row.trimmed(2))
            .map_err(|err| self.error(row.column(2), err.to_string()))?;
        let mut fields = Vec::new();
        for field_name in row
            .raw(3)
            .split(',')
            .map(str::trim)
            .filter(|field_name| !field_name.is_empty())
        {
            let field = self
                .fields
                .iter()
                .find(|field| field.name() == field_name)
                .ok_or_else(|| {
                    self.error(
                        row.column(3),
                        format!(
                            "field {field_name:?} for check {name:?} must be declared before the check"
                        ),
                    )
                })?;
            fields.push(field);
        }
        let check = CheckSpec::new(name, check_type, &fields, row.raw(4)).map_err(|err| {
            let column = match err {
                CheckSyntaxError::FieldCount { .. } => row.column(3),
                _ => row.column(4),
            };
            self.error(column, err.to_string())
        })?;
        debug!(source = %self.source, check = %name, check_type = %check_type, "check declared");
        self.checks.push(check);
        Ok(())
    }
}

/// An interface description: one data format, ordered fields, named checks.
///
/// Built once and then read-only; validation runs borrow it.
#[derive(Debug, Clone)]
pub struct Cid {
    source: String,
    data_format: DataFormatSpec,
    fields: Vec<FieldFormat>,
    checks: Vec<CheckSpec>,
}

impl Cid {
    /// Read a description from `rows`. `source` names the description in
    /// error locations.
    pub fn read<I, R, S>(source: impl Into<String>, rows: I) -> Result<Self, InterfaceError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut builder = CidBuilder::new(source);
        let span = info_span!("read_cid", source = %builder.source);
        let _guard = span.enter();
        for row in rows {
            builder.add_row(row.as_ref())?;
        }
        builder.finish()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn data_format(&self) -> &DataFormatSpec {
        &self.data_format
    }

    pub fn fields(&self) -> &[FieldFormat] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldFormat::name).collect()
    }

    pub fn field_format_at(&self, index: usize) -> Option<&FieldFormat> {
        self.fields.get(index)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    pub fn checks(&self) -> &[CheckSpec] {
        &self.checks
    }

    /// Check names in declaration order.
    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(CheckSpec::name).collect()
    }

    pub fn check_for(&self, name: &str) -> Option<&CheckSpec> {
        self.checks.iter().find(|check| check.name() == name)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cid(format={}, fields=[{}], checks=[{}])",
            self.data_format.tag(),
            self.field_names().join(", "),
            self.check_names().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_may_be_indented() {
        let cid = Cid::read(
            "inline",
            [
                vec!["", "d", "format", "delimited"],
                vec!["", "F", "id", "", "", "", "Integer"],
            ],
        )
        .expect("read cid");
        assert_eq!(cid.field_names(), ["id"]);
        assert_eq!(cid.fields()[0].field_type(), FieldType::Integer);
    }

    #[test]
    fn errors_report_columns_relative_to_marker() {
        let err = Cid::read(
            "inline",
            [vec!["d", "format", "delimited"], vec!["", "f", "3"]],
        )
        .expect_err("bad field name");
        assert_eq!(err.location, Location::new("inline", Some(2), Some(3)));
    }

    #[test]
    fn unknown_markers_are_skipped() {
        let cid = Cid::read(
            "inline",
            [
                vec!["Interface for customers"],
                vec!["d", "format", "delimited"],
                vec!["x", "anything", "goes"],
                vec!["f", "name"],
            ],
        )
        .expect("read cid");
        assert_eq!(cid.field_count(), 1);
    }
}
