use cidcheck_model::{
    DataFormatSpec, FieldFormat, FieldSyntaxError, FieldType, FormatTag, RangeSpec,
};

fn delimited() -> DataFormatSpec {
    DataFormatSpec::new(FormatTag::Delimited)
}

fn field(field_type: FieldType, rule: &str) -> FieldFormat {
    FieldFormat::new("value", 0, field_type, rule, &delimited()).expect("build field format")
}

#[test]
fn emptiness_is_checked_before_length_and_rule() {
    let strict = field(FieldType::Integer, "").with_length(RangeSpec::parse("3").expect("range"));
    assert_eq!(
        strict.validate("").expect_err("empty").message,
        "value must not be empty"
    );

    let optional = strict.clone().with_allowed_to_be_empty(true);
    assert!(optional.validate("").is_ok());
    // Length fails before the integer rule is consulted.
    let err = optional.validate("abcd").expect_err("too long");
    assert!(err.message.starts_with("length is 4"), "{}", err.message);
}

#[test]
fn length_counts_characters() {
    let text = field(FieldType::Text, "").with_length(RangeSpec::parse("...3").expect("range"));
    assert!(text.validate("äöü").is_ok());
    assert!(text.validate("äöüß").is_err());
}

#[test]
fn integer_rule_bounds_the_value() {
    let age = field(FieldType::Integer, "0...120");
    assert!(age.validate("23").is_ok());
    assert!(age.validate(" 7 ").is_ok());
    assert!(age.validate("121").is_err());
    assert!(age.validate("-1").is_err());
    assert!(age.validate("12.5").is_err());
    assert!(age.validate("99999999999999999999").is_err());
}

#[test]
fn integer_rule_must_be_a_range() {
    let err = FieldFormat::new("age", 0, FieldType::Integer, "young", &delimited())
        .expect_err("bad rule");
    assert!(matches!(err, FieldSyntaxError::Range(_)));
}

#[test]
fn decimal_uses_data_format_separators() {
    let mut data_format = delimited();
    data_format.set("decimal_separator", ",").expect("set");
    data_format.set("thousands_separator", ".").expect("set");
    let amount =
        FieldFormat::new("amount", 0, FieldType::Decimal, "", &data_format).expect("build");
    assert!(amount.validate("1.234,5").is_ok());
    assert!(amount.validate("1,234.5").is_err());
}

#[test]
fn decimal_rule_overrides_separators() {
    let amount = field(FieldType::Decimal, ",'");
    assert!(amount.validate("1'234,5").is_ok());
    assert!(field(FieldType::Decimal, "").validate("1,234.5").is_ok());

    let err = FieldFormat::new("amount", 0, FieldType::Decimal, "..", &delimited())
        .expect_err("same separators");
    assert!(matches!(err, FieldSyntaxError::InvalidRule { .. }));
}

#[test]
fn date_time_patterns() {
    let born = field(FieldType::DateTime, "DD.MM.YYYY");
    assert!(born.validate("08.03.1957").is_ok());
    assert!(born.validate("31.02.1957").is_err());
    assert!(born.validate("1957-03-08").is_err());

    let default = field(FieldType::DateTime, "");
    assert!(default.validate("1957-03-08").is_ok());
}

#[test]
fn choice_matches_trimmed_values() {
    let gender = field(FieldType::Choice, "male, female");
    assert!(gender.validate("male").is_ok());
    assert!(gender.validate(" female ").is_ok());
    assert!(gender.validate("Male").is_err());

    for rule in ["", "a,,b", "a,b,a"] {
        assert!(
            FieldFormat::new("gender", 0, FieldType::Choice, rule, &delimited()).is_err(),
            "{rule:?} should be rejected"
        );
    }
}

#[test]
fn regex_must_match_whole_value() {
    let code = field(FieldType::RegEx, "[A-Z]{2}[0-9]+");
    assert!(code.validate("AB12").is_ok());
    assert!(code.validate("xAB12").is_err());
    assert!(code.validate("AB12x").is_err());
    assert!(FieldFormat::new("code", 0, FieldType::RegEx, "([a-z", &delimited()).is_err());
}

#[test]
fn pattern_uses_wildcards() {
    let file = field(FieldType::Pattern, "*.csv");
    assert!(file.validate("customers.csv").is_ok());
    assert!(file.validate("customers.txt").is_err());
    assert!(field(FieldType::Pattern, "A?").validate("AB").is_ok());
}

#[test]
fn unknown_type_names_list_known_ones() {
    let err = FieldType::resolve("Float").expect_err("unknown");
    assert_eq!(
        err.to_string(),
        "field type is \"Float\" but must be one of: Text, Integer, Decimal, DateTime, Choice, RegEx, Pattern"
    );
}

#[test]
fn display_summarizes_field() {
    let gender = FieldFormat::new("gender", 4, FieldType::Choice, "male,female", &delimited())
        .expect("build")
        .with_length(RangeSpec::parse("2...6").expect("range"))
        .with_allowed_to_be_empty(true);
    assert_eq!(
        gender.to_string(),
        "gender: Choice length 2...6 rule \"male,female\" (may be empty)"
    );
}
