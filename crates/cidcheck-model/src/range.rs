//! Interval-union ranges such as `"2...6"`, `"...60"` or `"1, 3...5, 9..."`.
//!
//! Ranges bound both the length of a cell and, for some field formats and
//! checks, a numeric value. Empty text means "unconstrained".

use std::fmt;
use std::str::FromStr;

use crate::error::{RangeSyntaxError, RangeValueError};

const ELLIPSIS: &str = "...";

/// One sub-interval of a [`RangeSpec`]; missing bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeItem {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl RangeItem {
    pub fn contains(&self, value: i64) -> bool {
        self.lower.is_none_or(|lower| value >= lower)
            && self.upper.is_none_or(|upper| value <= upper)
    }
}

impl fmt::Display for RangeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) if lower == upper => write!(f, "{lower}"),
            (Some(lower), Some(upper)) => write!(f, "{lower}{ELLIPSIS}{upper}"),
            (Some(lower), None) => write!(f, "{lower}{ELLIPSIS}"),
            (None, Some(upper)) => write!(f, "{ELLIPSIS}{upper}"),
            // Never produced by the parser.
            (None, None) => f.write_str(ELLIPSIS),
        }
    }
}

/// An ordered union of inclusive intervals.
///
/// Two ranges are equal when their parsed items are equal, so differences
/// in whitespace do not matter. The [`description`](Self::description)
/// re-renders the items canonically and parses back to an equal range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RangeSpec {
    items: Vec<RangeItem>,
}

impl RangeSpec {
    /// The unconstrained range; matches every value.
    pub const ANY: RangeSpec = RangeSpec { items: Vec::new() };

    /// Parse range text. Blank text yields [`RangeSpec::ANY`].
    pub fn parse(text: &str) -> Result<Self, RangeSyntaxError> {
        if text.trim().is_empty() {
            return Ok(Self::ANY);
        }
        let items = text
            .split(',')
            .map(|item| parse_item(text, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }

    /// Range matching exactly one value.
    pub fn exactly(value: i64) -> Self {
        Self {
            items: vec![RangeItem {
                lower: Some(value),
                upper: Some(value),
            }],
        }
    }

    pub fn is_any(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RangeItem] {
        &self.items
    }

    pub fn matches(&self, value: i64) -> bool {
        self.is_any() || self.items.iter().any(|item| item.contains(value))
    }

    /// Like [`matches`](Self::matches) but with an error naming `name`.
    pub fn validate(&self, name: &str, value: i64) -> Result<(), RangeValueError> {
        if self.matches(value) {
            Ok(())
        } else {
            Err(RangeValueError {
                name: name.to_string(),
                value,
                expected: self.description(),
            })
        }
    }

    /// Convenience for lengths and counts.
    pub fn matches_count(&self, count: usize) -> bool {
        self.matches(i64::try_from(count).unwrap_or(i64::MAX))
    }

    /// The single value this range allows, if it allows exactly one.
    pub fn exact(&self) -> Option<i64> {
        match self.items.as_slice() {
            [
                RangeItem {
                    lower: Some(lower),
                    upper: Some(upper),
                },
            ] if lower == upper => Some(*lower),
            _ => None,
        }
    }

    /// Smallest lower bound, if every item is bounded below.
    pub fn lower_limit(&self) -> Option<i64> {
        self.items
            .iter()
            .map(|item| item.lower)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .min()
    }

    /// Largest upper bound, if every item is bounded above.
    pub fn upper_limit(&self) -> Option<i64> {
        self.items
            .iter()
            .map(|item| item.upper)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .max()
    }

    /// Canonical text; empty for [`RangeSpec::ANY`].
    pub fn description(&self) -> String {
        self.items
            .iter()
            .map(RangeItem::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl FromStr for RangeSpec {
    type Err = RangeSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_item(text: &str, item: &str) -> Result<RangeItem, RangeSyntaxError> {
    let item = item.trim();
    if item.is_empty() {
        return Err(RangeSyntaxError::new(text, "range items must not be empty"));
    }
    let Some((lower, upper)) = item.split_once(ELLIPSIS) else {
        let value = parse_number(text, item)?;
        return Ok(RangeItem {
            lower: Some(value),
            upper: Some(value),
        });
    };
    let (lower, upper) = (lower.trim(), upper.trim());
    if lower.is_empty() && upper.is_empty() {
        return Err(RangeSyntaxError::new(
            text,
            format!("{ELLIPSIS} must have a lower or upper limit"),
        ));
    }
    let lower = (!lower.is_empty())
        .then(|| parse_number(text, lower))
        .transpose()?;
    let upper = (!upper.is_empty())
        .then(|| parse_number(text, upper))
        .transpose()?;
    if let (Some(lower), Some(upper)) = (lower, upper)
        && lower > upper
    {
        return Err(RangeSyntaxError::new(
            text,
            format!("lower limit {lower} must be less than or equal to upper limit {upper}"),
        ));
    }
    Ok(RangeItem { lower, upper })
}

fn parse_number(text: &str, number: &str) -> Result<i64, RangeSyntaxError> {
    number
        .parse::<i64>()
        .map_err(|err| RangeSyntaxError::new(text, format!("{number:?} is not an integer: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_item_shapes() {
        let range = RangeSpec::parse("1, 3...5, ...-2, 9...").expect("range");
        assert_eq!(range.items().len(), 4);
        assert_eq!(range.description(), "1, 3...5, ...-2, 9...");
    }

    #[test]
    fn single_value_item_renders_without_ellipsis() {
        assert_eq!(RangeSpec::parse("4...4").expect("range").description(), "4");
        assert_eq!(RangeSpec::parse("4...4").expect("range").exact(), Some(4));
    }

    #[test]
    fn limits_require_bounded_items() {
        let range = RangeSpec::parse("2...4, 7").expect("range");
        assert_eq!(range.lower_limit(), Some(2));
        assert_eq!(range.upper_limit(), Some(7));
        assert_eq!(RangeSpec::parse("2...").expect("range").upper_limit(), None);
        assert_eq!(RangeSpec::ANY.lower_limit(), None);
    }

    #[test]
    fn validate_reports_expected_range() {
        let err = RangeSpec::parse("1...3")
            .expect("range")
            .validate("length", 5)
            .expect_err("out of range");
        assert_eq!(err.to_string(), "length is 5 but must be within range: 1...3");
    }

    #[test]
    fn rejects_empty_items() {
        assert!(RangeSpec::parse("1,,3").is_err());
        assert!(RangeSpec::parse("1,").is_err());
    }
}
