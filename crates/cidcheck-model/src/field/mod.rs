//! Field formats: per-column validators built from a type name and a rule.
//!
//! The set of field types is closed. [`FieldType::from_type_name`] is the
//! registry the interface parser consults; a type name it does not know
//! is a parse error, never a fallback.

mod datetime;
mod decimal;
mod name;

use std::fmt;

use regex::Regex;

use crate::data_format::DataFormatSpec;
use crate::error::{FieldSyntaxError, FieldValueError};
use crate::range::RangeSpec;

pub use datetime::{DEFAULT_PATTERN as DEFAULT_DATE_TIME_PATTERN, DateTimeFormat};
pub use decimal::DecimalFormat;
pub use name::{FieldNameError, validate_field_name};

/// Field type tag, one per recognized type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    DateTime,
    Choice,
    RegEx,
    Pattern,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        Self::Text,
        Self::Integer,
        Self::Decimal,
        Self::DateTime,
        Self::Choice,
        Self::RegEx,
        Self::Pattern,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::Decimal => "Decimal",
            Self::DateTime => "DateTime",
            Self::Choice => "Choice",
            Self::RegEx => "RegEx",
            Self::Pattern => "Pattern",
        }
    }

    /// Resolve a type name exactly as written in an interface description.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.type_name() == name)
    }

    /// Like [`from_type_name`](Self::from_type_name) with an error listing
    /// the known names.
    pub fn resolve(name: &str) -> Result<Self, FieldSyntaxError> {
        Self::from_type_name(name).ok_or_else(|| FieldSyntaxError::UnknownType {
            name: name.to_string(),
            known: Self::ALL.map(Self::type_name).join(", "),
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Compiled type-specific rule.
#[derive(Debug, Clone)]
enum FieldRule {
    Text,
    Integer(RangeSpec),
    Decimal(DecimalFormat),
    DateTime(DateTimeFormat),
    Choice(Vec<String>),
    RegEx(Regex),
    Pattern(Regex),
}

impl FieldRule {
    fn compile(
        field_type: FieldType,
        rule: &str,
        data_format: &DataFormatSpec,
    ) -> Result<Self, FieldSyntaxError> {
        let invalid = |reason: String| FieldSyntaxError::InvalidRule {
            field_type: field_type.type_name(),
            rule: rule.to_string(),
            reason,
        };
        let trimmed = rule.trim();
        match field_type {
            FieldType::Text => Ok(Self::Text),
            FieldType::Integer => Ok(Self::Integer(RangeSpec::parse(rule)?)),
            FieldType::Decimal => {
                let mut format = DecimalFormat {
                    decimal_separator: data_format.decimal_separator(),
                    thousands_separator: data_format.thousands_separator(),
                };
                let mut separators = trimmed.chars();
                if let Some(decimal) = separators.next() {
                    format.decimal_separator = decimal;
                    if let Some(thousands) = separators.next() {
                        format.thousands_separator = thousands;
                    }
                    if separators.next().is_some() {
                        return Err(invalid(
                            "must be at most a decimal and a thousands separator".to_string(),
                        ));
                    }
                }
                if format.decimal_separator == format.thousands_separator {
                    return Err(invalid(
                        "decimal and thousands separator must be different".to_string(),
                    ));
                }
                Ok(Self::Decimal(format))
            }
            FieldType::DateTime => {
                let pattern = if trimmed.is_empty() {
                    DEFAULT_DATE_TIME_PATTERN
                } else {
                    trimmed
                };
                DateTimeFormat::compile(pattern)
                    .map(Self::DateTime)
                    .map_err(invalid)
            }
            FieldType::Choice => {
                let mut choices: Vec<String> = Vec::new();
                for choice in rule.split(',').map(str::trim) {
                    if choice.is_empty() {
                        return Err(invalid("choices must not be empty".to_string()));
                    }
                    if choices.iter().any(|known| known == choice) {
                        return Err(invalid(format!("duplicate choice {choice:?}")));
                    }
                    choices.push(choice.to_string());
                }
                Ok(Self::Choice(choices))
            }
            FieldType::RegEx => {
                if trimmed.is_empty() {
                    return Err(invalid("regular expression must not be empty".to_string()));
                }
                Regex::new(&format!("^(?:{rule})$"))
                    .map(Self::RegEx)
                    .map_err(|err| invalid(err.to_string()))
            }
            FieldType::Pattern => {
                if trimmed.is_empty() {
                    return Err(invalid("pattern must not be empty".to_string()));
                }
                Regex::new(&wildcard_to_regex(rule))
                    .map(Self::Pattern)
                    .map_err(|err| invalid(err.to_string()))
            }
        }
    }

    fn validate(&self, value: &str) -> Result<(), FieldValueError> {
        match self {
            Self::Text => Ok(()),
            Self::Integer(range) => {
                let trimmed = value.trim();
                let number = trimmed.parse::<i64>().map_err(|err| {
                    FieldValueError::new(format!("value {trimmed:?} must be an integer: {err}"))
                })?;
                range.validate("value", number)?;
                Ok(())
            }
            Self::Decimal(format) => format
                .parse(value)
                .map(|_| ())
                .map_err(FieldValueError::new),
            Self::DateTime(format) => format.validate(value).map_err(FieldValueError::new),
            Self::Choice(choices) => {
                let trimmed = value.trim();
                if choices.iter().any(|choice| choice == trimmed) {
                    Ok(())
                } else {
                    Err(FieldValueError::new(format!(
                        "value {trimmed:?} must be one of: {}",
                        choices.join(", ")
                    )))
                }
            }
            Self::RegEx(regex) | Self::Pattern(regex) => {
                if regex.is_match(value) {
                    Ok(())
                } else {
                    Err(FieldValueError::new(format!(
                        "value {value:?} must match {}",
                        regex.as_str()
                    )))
                }
            }
        }
    }
}

/// Translate a shell-style wildcard (`*`, `?`) into an anchored regex.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::from("(?s)^");
    for ch in pattern.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            _ => regex.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push('$');
    regex
}

/// Validator for a single column.
///
/// Immutable once built; `position` is the 0-based index within the
/// interface's field list.
#[derive(Debug, Clone)]
pub struct FieldFormat {
    name: String,
    position: usize,
    field_type: FieldType,
    length: RangeSpec,
    is_allowed_to_be_empty: bool,
    example: Option<String>,
    rule_text: String,
    rule: FieldRule,
}

impl FieldFormat {
    /// Build a field format, compiling `rule` for `field_type`.
    ///
    /// Decimal fields take their default separators from `data_format`.
    pub fn new(
        name: impl Into<String>,
        position: usize,
        field_type: FieldType,
        rule: &str,
        data_format: &DataFormatSpec,
    ) -> Result<Self, FieldSyntaxError> {
        Ok(Self {
            name: name.into(),
            position,
            field_type,
            length: RangeSpec::ANY,
            is_allowed_to_be_empty: false,
            example: None,
            rule_text: rule.to_string(),
            rule: FieldRule::compile(field_type, rule, data_format)?,
        })
    }

    #[must_use]
    pub fn with_length(mut self, length: RangeSpec) -> Self {
        self.length = length;
        self
    }

    #[must_use]
    pub fn with_allowed_to_be_empty(mut self, allowed: bool) -> Self {
        self.is_allowed_to_be_empty = allowed;
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: Option<String>) -> Self {
        self.example = example;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn length(&self) -> &RangeSpec {
        &self.length
    }

    pub fn is_allowed_to_be_empty(&self) -> bool {
        self.is_allowed_to_be_empty
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    pub fn rule(&self) -> &str {
        &self.rule_text
    }

    /// Validate one cell: emptiness first, then length in characters, then
    /// the type-specific rule.
    pub fn validate(&self, value: &str) -> Result<(), FieldValueError> {
        if value.is_empty() {
            return if self.is_allowed_to_be_empty {
                Ok(())
            } else {
                Err(FieldValueError::new("value must not be empty"))
            };
        }
        let length = value.chars().count();
        if !self.length.matches_count(length) {
            return Err(FieldValueError::new(format!(
                "length is {length} but must be within range: {}",
                self.length
            )));
        }
        self.rule.validate(value)
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.field_type)?;
        if !self.length.is_any() {
            write!(f, " length {}", self.length)?;
        }
        if !self.rule_text.trim().is_empty() {
            write!(f, " rule {:?}", self.rule_text)?;
        }
        if self.is_allowed_to_be_empty {
            f.write_str(" (may be empty)")?;
        }
        Ok(())
    }
}
