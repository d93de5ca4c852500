//! Locale-aware decimal numbers such as `1,234.5` or `1.234,5`.

/// Separators used to read a decimal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalFormat {
    pub decimal_separator: char,
    pub thousands_separator: char,
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            thousands_separator: ',',
        }
    }
}

impl DecimalFormat {
    /// Parse `text` into a number.
    ///
    /// Accepts an optional sign, digits optionally grouped in threes by the
    /// thousands separator, and an optional fraction after the decimal
    /// separator.
    pub fn parse(&self, text: &str) -> Result<f64, String> {
        let trimmed = text.trim();
        let (sign, unsigned) = match trimmed.strip_prefix(['+', '-']) {
            Some(rest) => (&trimmed[..1], rest),
            None => ("", trimmed),
        };
        let (integral, fraction) = match unsigned.split_once(self.decimal_separator) {
            Some((integral, fraction)) => (integral, Some(fraction)),
            None => (unsigned, None),
        };
        let digits = self.integral_digits(integral)?;
        if let Some(fraction) = fraction {
            if fraction.is_empty() || !fraction.chars().all(|ch| ch.is_ascii_digit()) {
                return Err(format!(
                    "decimal part of {text:?} must consist of digits after {:?}",
                    self.decimal_separator
                ));
            }
        } else if digits.is_empty() {
            return Err(format!("{text:?} must contain digits"));
        }
        let normalized = match fraction {
            Some(fraction) => format!("{sign}{digits}.{fraction}"),
            None => format!("{sign}{digits}"),
        };
        normalized
            .parse::<f64>()
            .map_err(|err| format!("{text:?} is not a decimal number: {err}"))
    }

    fn integral_digits(&self, integral: &str) -> Result<String, String> {
        let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if !integral.contains(self.thousands_separator) {
            if !all_digits(integral) {
                return Err(format!("{integral:?} must consist of digits"));
            }
            return Ok(integral.to_string());
        }
        let groups: Vec<&str> = integral.split(self.thousands_separator).collect();
        let first_ok = matches!(groups[0].len(), 1..=3) && all_digits(groups[0]);
        let rest_ok = groups[1..]
            .iter()
            .all(|group| group.len() == 3 && all_digits(group));
        if !(first_ok && rest_ok) {
            return Err(format!(
                "{integral:?} must group digits in threes separated by {:?}",
                self.thousands_separator
            ));
        }
        Ok(groups.concat())
    }
}
