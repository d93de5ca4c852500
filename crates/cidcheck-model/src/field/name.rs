//! Field name rules.

use thiserror::Error;

/// Words that cannot be used as field names.
const RESERVED_WORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "false", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "none", "nonlocal", "not", "or", "pass", "raise", "return", "true", "try", "while",
    "with", "yield",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldNameError {
    #[error("field name must not be empty")]
    Empty,

    #[error("field name {0:?} must start with a letter or underscore")]
    NotAnIdentifier(String),

    #[error("field name {name:?} must contain only letters, digits and underscores but contains {found:?}")]
    SpecialCharacter { name: String, found: char },

    #[error("field name {0:?} must not be a reserved word")]
    Reserved(String),
}

/// Check that `name` can be used as a field name.
pub fn validate_field_name(name: &str) -> Result<(), FieldNameError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(FieldNameError::Empty);
    };
    if let Some(found) = name
        .chars()
        .find(|ch| !(ch.is_alphanumeric() || *ch == '_'))
    {
        return Err(FieldNameError::SpecialCharacter {
            name: name.to_string(),
            found,
        });
    }
    if !(first.is_alphabetic() || first == '_') {
        return Err(FieldNameError::NotAnIdentifier(name.to_string()));
    }
    if RESERVED_WORDS.contains(&name.to_lowercase().as_str()) {
        return Err(FieldNameError::Reserved(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers() {
        assert!(validate_field_name("branch_id").is_ok());
        assert!(validate_field_name("_x1").is_ok());
        assert!(validate_field_name("größe").is_ok());
    }

    #[test]
    fn rejects_each_kind_of_bad_name() {
        assert_eq!(validate_field_name(""), Err(FieldNameError::Empty));
        assert!(matches!(
            validate_field_name("3"),
            Err(FieldNameError::NotAnIdentifier(_))
        ));
        assert!(matches!(
            validate_field_name("%"),
            Err(FieldNameError::SpecialCharacter { found: '%', .. })
        ));
        assert!(matches!(
            validate_field_name("first name"),
            Err(FieldNameError::SpecialCharacter { found: ' ', .. })
        ));
        assert!(matches!(
            validate_field_name("class"),
            Err(FieldNameError::Reserved(_))
        ));
        assert!(matches!(
            validate_field_name("None"),
            Err(FieldNameError::Reserved(_))
        ));
    }
}
