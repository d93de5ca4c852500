//! Physical layout of a data file: encoding, delimiters, header rows.
//!
//! Each [`FormatTag`] recognizes its own set of property keys, each with a
//! documented default. Values are validated when set, so a
//! [`DataFormatSpec`] only ever holds usable values.

use std::collections::BTreeMap;
use std::fmt;

use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::error::DataFormatSyntaxError;

/// The kind of container a data file comes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Delimited,
    Fixed,
    Spreadsheet,
}

impl FormatTag {
    /// Parse a format name, case-insensitively. `csv` is an alias for
    /// delimited, `excel` and `ods` for spreadsheet.
    pub fn parse(name: &str) -> Result<Self, DataFormatSyntaxError> {
        match name.trim().to_lowercase().as_str() {
            "delimited" | "csv" => Ok(Self::Delimited),
            "fixed" => Ok(Self::Fixed),
            "spreadsheet" | "excel" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(DataFormatSyntaxError::UnknownFormat {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Fixed => "fixed",
            Self::Spreadsheet => "spreadsheet",
        }
    }

    /// Property keys recognized for this format.
    pub fn keys(self) -> &'static [PropertyKey] {
        use PropertyKey as K;
        match self {
            Self::Delimited => &[
                K::Format,
                K::Encoding,
                K::Header,
                K::DecimalSeparator,
                K::ThousandsSeparator,
                K::LineDelimiter,
                K::ItemDelimiter,
                K::QuoteCharacter,
                K::EscapeCharacter,
            ],
            Self::Fixed => &[
                K::Format,
                K::Encoding,
                K::Header,
                K::DecimalSeparator,
                K::ThousandsSeparator,
                K::LineDelimiter,
            ],
            Self::Spreadsheet => &[
                K::Format,
                K::Header,
                K::DecimalSeparator,
                K::ThousandsSeparator,
                K::Sheet,
            ],
        }
    }

    pub fn recognizes(self, key: PropertyKey) -> bool {
        self.keys().contains(&key)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All property keys known to any format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKey {
    Format,
    Encoding,
    Header,
    DecimalSeparator,
    ThousandsSeparator,
    LineDelimiter,
    ItemDelimiter,
    QuoteCharacter,
    EscapeCharacter,
    Sheet,
}

impl PropertyKey {
    pub const ALL: [PropertyKey; 10] = [
        Self::Format,
        Self::Encoding,
        Self::Header,
        Self::DecimalSeparator,
        Self::ThousandsSeparator,
        Self::LineDelimiter,
        Self::ItemDelimiter,
        Self::QuoteCharacter,
        Self::EscapeCharacter,
        Self::Sheet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Encoding => "encoding",
            Self::Header => "header",
            Self::DecimalSeparator => "decimal_separator",
            Self::ThousandsSeparator => "thousands_separator",
            Self::LineDelimiter => "line_delimiter",
            Self::ItemDelimiter => "item_delimiter",
            Self::QuoteCharacter => "quote_character",
            Self::EscapeCharacter => "escape_character",
            Self::Sheet => "sheet",
        }
    }

    /// Look up a key by name. Case is ignored and inner blanks match `_`,
    /// so `Item Delimiter` finds [`PropertyKey::ItemDelimiter`].
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = normalize_key(name);
        Self::ALL.into_iter().find(|key| key.name() == normalized)
    }

    fn default_value(self, tag: FormatTag) -> PropertyValue {
        match self {
            Self::Format => PropertyValue::Format(tag),
            Self::Encoding => PropertyValue::Encoding(UTF_8),
            Self::Header => PropertyValue::Count(0),
            Self::DecimalSeparator => PropertyValue::Char('.'),
            Self::ThousandsSeparator => PropertyValue::Char(','),
            Self::LineDelimiter | Self::ItemDelimiter => PropertyValue::Delimiter(Delimiter::Any),
            Self::QuoteCharacter | Self::EscapeCharacter => PropertyValue::Char('"'),
            Self::Sheet => PropertyValue::Count(1),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Line or item delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// Accept any delimiter, leaving the choice to content sniffing.
    Any,
    Char(char),
    /// Carriage return followed by line feed.
    CrLf,
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::CrLf => f.write_str("crlf"),
            Self::Char('\r') => f.write_str("cr"),
            Self::Char('\n') => f.write_str("lf"),
            Self::Char('\t') => f.write_str("tab"),
            Self::Char(ch) => write!(f, "{ch}"),
        }
    }
}

/// A validated property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Format(FormatTag),
    Encoding(&'static Encoding),
    Count(usize),
    Char(char),
    Delimiter(Delimiter),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(tag) => write!(f, "{tag}"),
            Self::Encoding(encoding) => f.write_str(encoding.name()),
            Self::Count(count) => write!(f, "{count}"),
            Self::Char(ch) => write!(f, "{ch}"),
            Self::Delimiter(delimiter) => write!(f, "{delimiter}"),
        }
    }
}

/// Data format properties keyed by a fixed [`FormatTag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFormatSpec {
    tag: FormatTag,
    properties: BTreeMap<PropertyKey, PropertyValue>,
}

impl DataFormatSpec {
    pub fn new(tag: FormatTag) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(PropertyKey::Format, PropertyValue::Format(tag));
        Self { tag, properties }
    }

    pub fn tag(&self) -> FormatTag {
        self.tag
    }

    /// Validate and store a property, returning the key it was stored under.
    ///
    /// Setting `format` to anything other than the tag fixed at
    /// construction is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<PropertyKey, DataFormatSyntaxError> {
        let property = PropertyKey::from_name(key)
            .filter(|property| self.tag.recognizes(*property))
            .ok_or_else(|| DataFormatSyntaxError::UnknownProperty {
                format: self.tag.name(),
                key: key.to_string(),
            })?;
        let parsed = parse_value(property, value)?;
        if property == PropertyKey::Format && parsed != PropertyValue::Format(self.tag) {
            return Err(invalid(
                property,
                value,
                format!("format is already {}", self.tag),
            ));
        }
        self.properties.insert(property, parsed);
        Ok(property)
    }

    /// The value set for `key`, or its default. `None` if the key is not
    /// recognized for this format.
    pub fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        if !self.tag.recognizes(key) {
            return None;
        }
        Some(
            self.properties
                .get(&key)
                .copied()
                .unwrap_or_else(|| key.default_value(self.tag)),
        )
    }

    pub fn is_set(&self, key: PropertyKey) -> bool {
        self.properties.contains_key(&key)
    }

    /// Properties that were set explicitly, in key order.
    pub fn properties(&self) -> impl Iterator<Item = (PropertyKey, PropertyValue)> + '_ {
        self.properties.iter().map(|(key, value)| (*key, *value))
    }

    pub fn encoding(&self) -> &'static Encoding {
        match self.get(PropertyKey::Encoding) {
            Some(PropertyValue::Encoding(encoding)) => encoding,
            _ => UTF_8,
        }
    }

    pub fn header(&self) -> usize {
        self.count(PropertyKey::Header).unwrap_or(0)
    }

    pub fn sheet(&self) -> usize {
        self.count(PropertyKey::Sheet).unwrap_or(1)
    }

    pub fn line_delimiter(&self) -> Delimiter {
        self.delimiter(PropertyKey::LineDelimiter)
    }

    pub fn item_delimiter(&self) -> Delimiter {
        self.delimiter(PropertyKey::ItemDelimiter)
    }

    pub fn quote_character(&self) -> char {
        self.char(PropertyKey::QuoteCharacter).unwrap_or('"')
    }

    pub fn escape_character(&self) -> char {
        self.char(PropertyKey::EscapeCharacter).unwrap_or('"')
    }

    pub fn decimal_separator(&self) -> char {
        self.char(PropertyKey::DecimalSeparator).unwrap_or('.')
    }

    pub fn thousands_separator(&self) -> char {
        self.char(PropertyKey::ThousandsSeparator).unwrap_or(',')
    }

    /// Check that the property values fit together: separators differ
    /// and a delimited item delimiter is not the quote character.
    pub fn validate_required_properties(&self) -> Result<(), DataFormatSyntaxError> {
        let decimal = self.decimal_separator();
        if decimal == self.thousands_separator() {
            return Err(DataFormatSyntaxError::Conflict {
                first: PropertyKey::DecimalSeparator.name(),
                second: PropertyKey::ThousandsSeparator.name(),
                value: decimal,
            });
        }
        if self.tag == FormatTag::Delimited
            && let Delimiter::Char(item) = self.item_delimiter()
            && item == self.quote_character()
        {
            return Err(DataFormatSyntaxError::Conflict {
                first: PropertyKey::ItemDelimiter.name(),
                second: PropertyKey::QuoteCharacter.name(),
                value: item,
            });
        }
        Ok(())
    }

    fn count(&self, key: PropertyKey) -> Option<usize> {
        match self.get(key) {
            Some(PropertyValue::Count(count)) => Some(count),
            _ => None,
        }
    }

    fn char(&self, key: PropertyKey) -> Option<char> {
        match self.get(key) {
            Some(PropertyValue::Char(ch)) => Some(ch),
            _ => None,
        }
    }

    fn delimiter(&self, key: PropertyKey) -> Delimiter {
        match self.get(key) {
            Some(PropertyValue::Delimiter(delimiter)) => delimiter,
            _ => Delimiter::Any,
        }
    }
}

impl fmt::Display for DataFormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .properties()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        f.write_str(&rendered.join(", "))
    }
}

fn invalid(key: PropertyKey, value: &str, reason: impl Into<String>) -> DataFormatSyntaxError {
    DataFormatSyntaxError::InvalidValue {
        key: key.name(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_value(key: PropertyKey, value: &str) -> Result<PropertyValue, DataFormatSyntaxError> {
    match key {
        PropertyKey::Format => FormatTag::parse(value).map(PropertyValue::Format),
        PropertyKey::Encoding => Encoding::for_label(value.trim().as_bytes())
            .map(PropertyValue::Encoding)
            .ok_or_else(|| invalid(key, value, "unknown text encoding")),
        PropertyKey::Header => value
            .trim()
            .parse::<usize>()
            .map(PropertyValue::Count)
            .map_err(|_| invalid(key, value, "must be a non-negative integer")),
        PropertyKey::Sheet => match value.trim().parse::<usize>() {
            Ok(sheet) if sheet >= 1 => Ok(PropertyValue::Count(sheet)),
            _ => Err(invalid(key, value, "must be a positive integer")),
        },
        PropertyKey::DecimalSeparator
        | PropertyKey::ThousandsSeparator
        | PropertyKey::QuoteCharacter
        | PropertyKey::EscapeCharacter => single_char(value)
            .map(PropertyValue::Char)
            .ok_or_else(|| invalid(key, value, "must be a single character")),
        PropertyKey::LineDelimiter => match parse_delimiter(value) {
            Some(delimiter @ (Delimiter::Any | Delimiter::CrLf)) => {
                Ok(PropertyValue::Delimiter(delimiter))
            }
            Some(delimiter @ Delimiter::Char('\r' | '\n')) => {
                Ok(PropertyValue::Delimiter(delimiter))
            }
            _ => Err(invalid(key, value, "must be one of: any, cr, lf, crlf")),
        },
        PropertyKey::ItemDelimiter => match parse_delimiter(value) {
            Some(Delimiter::CrLf) | None => Err(invalid(
                key,
                value,
                "must be a single character, a character code or one of: any, tab",
            )),
            Some(delimiter) => Ok(PropertyValue::Delimiter(delimiter)),
        },
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// Parse a delimiter: a character code in decimal (`44`) or hex (`0x2c`),
/// a symbolic name, or a literal character. A lone digit is a code.
fn parse_delimiter(value: &str) -> Option<Delimiter> {
    let symbol = value.trim().to_lowercase();
    if let Some(code) = character_code(&symbol) {
        return char::from_u32(code).map(Delimiter::Char);
    }
    match symbol.as_str() {
        "any" => Some(Delimiter::Any),
        "cr" => Some(Delimiter::Char('\r')),
        "lf" => Some(Delimiter::Char('\n')),
        "crlf" => Some(Delimiter::CrLf),
        "tab" => Some(Delimiter::Char('\t')),
        _ => single_char(value).map(Delimiter::Char),
    }
}

fn character_code(symbol: &str) -> Option<u32> {
    if let Some(hex) = symbol.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).ok();
    }
    if !symbol.is_empty() && symbol.bytes().all(|byte| byte.is_ascii_digit()) {
        return symbol.parse().ok();
    }
    None
}
