//! Date/time patterns such as `YYYY-MM-DD` or `DD.MM.YYYY hh:mm`.
//!
//! Patterns are translated to chrono format strings once, when the field
//! format is built.

use chrono::format::{Parsed, StrftimeItems, parse};

pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD";

/// Pattern tokens in matching order; longer tokens first.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("hh", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    pattern: String,
    strftime: String,
    has_year: bool,
    has_month: bool,
    has_day: bool,
}

impl DateTimeFormat {
    pub fn compile(pattern: &str) -> Result<Self, String> {
        let mut strftime = String::new();
        let (mut has_year, mut has_month, mut has_day) = (false, false, false);
        let mut token_count = 0;
        let mut rest = pattern;
        while !rest.is_empty() {
            if let Some((token, spec)) = TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
                strftime.push_str(spec);
                match *token {
                    "YYYY" | "YY" => has_year = true,
                    "MM" => has_month = true,
                    "DD" => has_day = true,
                    _ => {}
                }
                token_count += 1;
                rest = &rest[token.len()..];
                continue;
            }
            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                if ch == '%' {
                    strftime.push_str("%%");
                } else {
                    strftime.push(ch);
                }
            }
            rest = chars.as_str();
        }
        if token_count == 0 {
            return Err(format!(
                "pattern {pattern:?} must contain at least one of: YYYY, YY, MM, DD, hh, mm, ss"
            ));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
            has_year,
            has_month,
            has_day,
        })
    }

    /// Check that `text` matches the pattern and, if the pattern holds a
    /// full date, that the date exists in the calendar.
    pub fn validate(&self, text: &str) -> Result<(), String> {
        let mut parsed = Parsed::default();
        parse(&mut parsed, text, StrftimeItems::new(&self.strftime))
            .map_err(|err| format!("date {text:?} must match format {}: {err}", self.pattern))?;
        if self.has_year && self.has_month && self.has_day {
            parsed
                .to_naive_date()
                .map_err(|err| format!("date {text:?} is not a valid calendar date: {err}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_tokens_and_literals() {
        let format = DateTimeFormat::compile("DD.MM.YYYY hh:mm").expect("pattern");
        assert_eq!(format.strftime, "%d.%m.%Y %H:%M");
        assert_eq!(DateTimeFormat::compile("YYYY%").expect("pattern").strftime, "%Y%%");
    }

    #[test]
    fn validates_calendar_dates() {
        let format = DateTimeFormat::compile("YYYY-MM-DD").expect("pattern");
        assert!(format.validate("2024-02-29").is_ok());
        assert!(format.validate("2023-02-29").is_err());
        assert!(format.validate("2024-13-01").is_err());
        assert!(format.validate("2024-01-01x").is_err());
    }

    #[test]
    fn accepts_partial_patterns() {
        let month = DateTimeFormat::compile("MM/YYYY").expect("pattern");
        assert!(month.validate("12/1999").is_ok());
        let time = DateTimeFormat::compile("hh:mm:ss").expect("pattern");
        assert!(time.validate("23:59:01").is_ok());
        assert!(time.validate("24:00:00").is_err());
    }

    #[test]
    fn rejects_patterns_without_tokens() {
        assert!(DateTimeFormat::compile("date").is_err());
    }
}
