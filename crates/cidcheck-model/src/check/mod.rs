//! Cross-row checks.
//!
//! A [`CheckSpec`] is the immutable definition read from an interface
//! description. A [`Check`] is a run-scoped instance holding the mutable
//! state (keys seen, tallies) for one pass over the data; build a fresh one
//! per validation run with [`CheckSpec::instantiate`].
//!
//! Every check follows the same two phases: [`Check::check_row`] for each
//! data row in order, then [`Check::check_at_end`] once after the last row.

mod compare;
mod distinct;
mod unique;

use std::fmt;

use tracing::debug;

use crate::error::{CheckError, CheckSyntaxError};
use crate::field::FieldFormat;
use crate::range::RangeSpec;

pub use compare::Comparison;

use distinct::DistinctCounts;
use unique::UniqueKeys;

/// Check type tag, one per recognized type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckType {
    /// Each combination of the listed fields occurs at most once.
    IsUnique,
    /// The number of distinct combinations of the listed fields is within
    /// the rule range.
    DistinctCount,
    /// The number of data rows is within the rule range.
    RowCount,
    /// Two fields of the same row compare as the rule operator says.
    CompareFields,
}

impl CheckType {
    pub const ALL: [CheckType; 4] = [
        Self::IsUnique,
        Self::DistinctCount,
        Self::RowCount,
        Self::CompareFields,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::IsUnique => "IsUnique",
            Self::DistinctCount => "DistinctCount",
            Self::RowCount => "RowCount",
            Self::CompareFields => "CompareFields",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.type_name() == name)
    }

    pub fn resolve(name: &str) -> Result<Self, CheckSyntaxError> {
        Self::from_type_name(name).ok_or_else(|| CheckSyntaxError::UnknownType {
            name: name.to_string(),
            known: Self::ALL.map(Self::type_name).join(", "),
        })
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CheckRule {
    None,
    Count(RangeSpec),
    Compare(Comparison),
}

/// Immutable check definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSpec {
    name: String,
    check_type: CheckType,
    field_names: Vec<String>,
    field_indices: Vec<usize>,
    rule_text: String,
    rule: CheckRule,
}

impl CheckSpec {
    /// Build a check over `fields`, compiling `rule` for `check_type`.
    pub fn new(
        name: impl Into<String>,
        check_type: CheckType,
        fields: &[&FieldFormat],
        rule: &str,
    ) -> Result<Self, CheckSyntaxError> {
        let type_name = check_type.type_name();
        let field_count = |expected: &'static str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(CheckSyntaxError::FieldCount {
                    check_type: type_name,
                    expected,
                    actual: fields.len(),
                })
            }
        };
        let invalid = |reason: &str| CheckSyntaxError::InvalidRule {
            check_type: type_name,
            rule: rule.to_string(),
            reason: reason.to_string(),
        };
        let trimmed = rule.trim();
        let compiled = match check_type {
            CheckType::IsUnique => {
                field_count("at least one field", !fields.is_empty())?;
                if !trimmed.is_empty() {
                    return Err(invalid("must be empty"));
                }
                CheckRule::None
            }
            CheckType::DistinctCount | CheckType::RowCount => {
                if check_type == CheckType::DistinctCount {
                    field_count("at least one field", !fields.is_empty())?;
                } else {
                    field_count("no fields", fields.is_empty())?;
                }
                if trimmed.is_empty() {
                    return Err(invalid("must be a range for the expected count"));
                }
                CheckRule::Count(RangeSpec::parse(rule)?)
            }
            CheckType::CompareFields => {
                field_count("exactly two fields", fields.len() == 2)?;
                let comparison = Comparison::parse(rule)
                    .ok_or_else(|| invalid("must be one of: <, <=, =, !=, >=, >"))?;
                CheckRule::Compare(comparison)
            }
        };
        Ok(Self {
            name: name.into(),
            check_type,
            field_names: fields.iter().map(|field| field.name().to_string()).collect(),
            field_indices: fields.iter().map(|field| field.position()).collect(),
            rule_text: rule.to_string(),
            rule: compiled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check_type(&self) -> CheckType {
        self.check_type
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn rule(&self) -> &str {
        &self.rule_text
    }

    /// Fresh run-scoped instance with empty state.
    pub fn instantiate(&self) -> Check<'_> {
        Check::new(self)
    }

    fn key_of<S: AsRef<str>>(&self, row: &[S]) -> Vec<String> {
        self.field_indices
            .iter()
            .map(|&index| cell(row, index).to_string())
            .collect()
    }

    fn describe_key(&self, key: &[String]) -> String {
        self.field_names
            .iter()
            .zip(key)
            .map(|(name, value)| format!("{name}={value:?}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.check_type)?;
        if !self.field_names.is_empty() {
            write!(f, " on {}", self.field_names.join(", "))?;
        }
        if !self.rule_text.trim().is_empty() {
            write!(f, " rule {:?}", self.rule_text)?;
        }
        Ok(())
    }
}

/// Cells missing from short rows read as empty.
fn cell<S: AsRef<str>>(row: &[S], index: usize) -> &str {
    row.get(index).map_or("", AsRef::as_ref)
}

#[derive(Debug)]
enum CheckState {
    IsUnique(UniqueKeys),
    DistinctCount(DistinctCounts),
    RowCount(usize),
    CompareFields,
}

impl CheckState {
    fn initial(check_type: CheckType) -> Self {
        match check_type {
            CheckType::IsUnique => Self::IsUnique(UniqueKeys::default()),
            CheckType::DistinctCount => Self::DistinctCount(DistinctCounts::default()),
            CheckType::RowCount => Self::RowCount(0),
            CheckType::CompareFields => Self::CompareFields,
        }
    }
}

/// Run-scoped check instance borrowing its definition.
#[derive(Debug)]
pub struct Check<'a> {
    spec: &'a CheckSpec,
    state: CheckState,
}

impl<'a> Check<'a> {
    pub fn new(spec: &'a CheckSpec) -> Self {
        Self {
            spec,
            state: CheckState::initial(spec.check_type),
        }
    }

    pub fn spec(&self) -> &'a CheckSpec {
        self.spec
    }

    pub fn name(&self) -> &'a str {
        &self.spec.name
    }

    /// Forget everything seen so far.
    pub fn reset(&mut self) {
        match &mut self.state {
            CheckState::IsUnique(keys) => keys.clear(),
            CheckState::DistinctCount(counts) => counts.clear(),
            CheckState::RowCount(rows) => *rows = 0,
            CheckState::CompareFields => {}
        }
    }

    /// Update the state with one data row. Fails right away for violations
    /// decidable from this row.
    pub fn check_row<S: AsRef<str>>(
        &mut self,
        row: &[S],
        row_number: usize,
    ) -> Result<(), CheckError> {
        let spec = self.spec;
        match &mut self.state {
            CheckState::IsUnique(keys) => {
                let key = spec.key_of(row);
                let described = spec.describe_key(&key);
                if let Some(first_row) = keys.insert(key, row_number) {
                    return Err(CheckError::new(
                        &spec.name,
                        format!(
                            "unique key {described} in row {row_number} was already used in row {first_row}"
                        ),
                    ));
                }
            }
            CheckState::DistinctCount(counts) => counts.record(spec.key_of(row)),
            CheckState::RowCount(rows) => *rows += 1,
            CheckState::CompareFields => {
                let CheckRule::Compare(comparison) = spec.rule else {
                    return Ok(());
                };
                let (left, right) = (
                    cell(row, spec.field_indices[0]),
                    cell(row, spec.field_indices[1]),
                );
                if left.trim().is_empty() || right.trim().is_empty() {
                    return Ok(());
                }
                if !comparison.holds(left, right) {
                    return Err(CheckError::new(
                        &spec.name,
                        format!(
                            "{} ({left:?}) must be {comparison} {} ({right:?}) in row {row_number}",
                            spec.field_names[0], spec.field_names[1]
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Decide violations that need the whole data stream.
    pub fn check_at_end(&mut self) -> Result<(), CheckError> {
        let spec = self.spec;
        let CheckRule::Count(expected) = &spec.rule else {
            return Ok(());
        };
        let (subject, actual) = match &self.state {
            CheckState::DistinctCount(counts) => (
                format!("number of distinct values for {}", spec.field_names.join(", ")),
                counts.distinct(),
            ),
            CheckState::RowCount(rows) => ("number of data rows".to_string(), *rows),
            _ => return Ok(()),
        };
        debug!(check = %spec.name, actual, expected = %expected, "finalizing count check");
        if expected.matches_count(actual) {
            Ok(())
        } else {
            Err(CheckError::new(
                &spec.name,
                format!("{subject} is {actual} but must be within range: {expected}"),
            ))
        }
    }
}
