use cidcheck_model::{Cid, DiagnosticKind};
use cidcheck_validate::{Pipeline, ValidateError, ValidationOptions};

fn customers_cid(header: &str) -> Cid {
    let rows: Vec<Vec<&str>> = vec![
        vec!["d", "format", "delimited"],
        vec!["d", "header", header],
        vec!["f", "branch_id", "38000", "", "5"],
        vec!["f", "customer_id", "23", "", "2...", "Integer", "10...65535"],
        vec!["f", "first_name", "John", "", "...60"],
        vec!["f", "surname", "Doe", "", "...60"],
        vec!["f", "gender", "male", "", "2...6", "Choice", "male, female"],
        vec!["f", "date_of_birth", "08.03.1957", "X", "10", "DateTime", "DD.MM.YYYY"],
        vec!["c", "customer must be unique", "IsUnique", "branch_id, customer_id"],
        vec!["c", "few branches", "DistinctCount", "branch_id", "...2"],
    ];
    Cid::read("customers.cid", rows).expect("read cid")
}

const VALID_ROW: [&str; 6] = ["38000", "23", "John", "Doe", "male", "08.03.1957"];

#[test]
fn valid_row_has_no_diagnostics() {
    let cid = customers_cid("0");
    let report = Pipeline::new(&cid).validate("customers.csv", [VALID_ROW]);
    assert!(report.is_valid(), "{:?}", report.diagnostics);
    assert_eq!(report.rows_read, 1);
    assert!(!report.stopped_early);
}

#[test]
fn every_bad_cell_is_reported() {
    let cid = customers_cid("0");
    let report = Pipeline::new(&cid).validate(
        "customers.csv",
        [["3800", "x", "John", "Doe", "other", "31.02.1957"]],
    );
    let fields: Vec<_> = report
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.field.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(fields, ["branch_id", "customer_id", "gender", "date_of_birth"]);
    assert!(
        report
            .diagnostics
            .iter()
            .all(|diagnostic| diagnostic.kind == DiagnosticKind::FieldValue
                && diagnostic.row_number == Some(1)
                && !diagnostic.fatal)
    );
}

#[test]
fn header_and_empty_rows_are_skipped() {
    let cid = customers_cid("1");
    let rows: Vec<Vec<&str>> = vec![
        vec!["branch_id", "customer_id", "first_name", "surname", "gender", "date_of_birth"],
        vec![],
        VALID_ROW.to_vec(),
        vec!["38000", "24", "Jane", "Doe", "female", "x"],
    ];
    let report = Pipeline::new(&cid).validate("customers.csv", rows);
    assert_eq!(report.rows_read, 2);
    assert_eq!(report.error_count(), 1);
    // Physical row numbers count header and empty rows.
    assert_eq!(report.diagnostics[0].row_number, Some(4));
    assert_eq!(report.diagnostics[0].field.as_deref(), Some("date_of_birth"));
}

#[test]
fn blank_cells_are_validated_and_counted() {
    let cid = Cid::read(
        "ids.cid",
        [
            vec!["d", "format", "delimited"],
            vec!["f", "id", "", "", "", "Integer"],
            vec!["f", "name"],
            vec!["c", "two rows", "RowCount", "", "2"],
        ],
    )
    .expect("read cid");
    let report = Pipeline::new(&cid).validate("ids.csv", [["1", "a"], ["", ""]]);
    assert_eq!(report.rows_read, 2);
    let fields: Vec<_> = report
        .diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.row_number, diagnostic.field.as_deref()))
        .collect();
    assert_eq!(fields, [(Some(2), Some("id")), (Some(2), Some("name"))]);
}

#[test]
fn check_errors_become_diagnostics() {
    let cid = customers_cid("0");
    let report = Pipeline::new(&cid).validate(
        "customers.csv",
        [
            VALID_ROW,
            ["38001", "23", "Jane", "Doe", "female", ""],
            VALID_ROW,
            ["38002", "23", "Jim", "Doe", "male", ""],
        ],
    );
    assert_eq!(report.error_count(), 2);

    let duplicate = &report.diagnostics[0];
    assert_eq!(duplicate.kind, DiagnosticKind::Check);
    assert_eq!(duplicate.row_number, Some(3));
    assert_eq!(duplicate.field.as_deref(), Some("customer must be unique"));

    let distinct = &report.diagnostics[1];
    assert_eq!(distinct.row_number, None);
    assert_eq!(distinct.field.as_deref(), Some("few branches"));
    assert!(distinct.message.contains("is 3"), "{}", distinct.message);
}

#[test]
fn short_and_long_rows_validate_overlapping_cells() {
    let cid = customers_cid("0");
    let report = Pipeline::new(&cid).validate(
        "customers.csv",
        vec![
            vec!["38000", "x"],
            vec!["38001", "23", "John", "Doe", "male", "08.03.1957", "extra"],
        ],
    );
    let kinds: Vec<_> = report
        .diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.row_number, diagnostic.kind))
        .collect();
    assert_eq!(
        kinds,
        [
            (Some(1), DiagnosticKind::RowShape),
            (Some(1), DiagnosticKind::FieldValue),
            (Some(2), DiagnosticKind::RowShape),
        ]
    );
    assert_eq!(report.diagnostics[1].field.as_deref(), Some("customer_id"));
    assert!(report.diagnostics.iter().all(|diagnostic| !diagnostic.fatal));
}

#[test]
fn max_diagnostics_stops_the_run() {
    let cid = customers_cid("0");
    let bad = ["x", "x", "John", "Doe", "male", ""];
    let rows = vec![bad; 10];
    let report = Pipeline::new(&cid)
        .with_options(ValidationOptions::new().with_max_diagnostics(3))
        .validate("customers.csv", rows);
    assert!(report.stopped_early);
    assert_eq!(report.error_count(), 3);
    assert_eq!(report.rows_read, 2);
    // The distinct count check would fail at end of data but never runs.
    assert!(
        report
            .diagnostics
            .iter()
            .all(|diagnostic| diagnostic.row_number.is_some())
    );
}

#[test]
fn zero_max_diagnostics_records_nothing() {
    let cid = customers_cid("0");
    let report = Pipeline::new(&cid)
        .with_options(ValidationOptions::new().with_max_diagnostics(0))
        .validate("customers.csv", [["x", "x", "John", "Doe", "male", ""], VALID_ROW]);
    assert!(report.stopped_early);
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.rows_read, 1);
}

#[test]
fn each_run_starts_with_fresh_checks() {
    let cid = customers_cid("0");
    let pipeline = Pipeline::new(&cid);
    assert!(pipeline.validate("first.csv", [VALID_ROW]).is_valid());
    assert!(pipeline.validate("second.csv", [VALID_ROW]).is_valid());
}

#[test]
fn runs_can_be_fed_row_by_row() {
    let cid = customers_cid("0");
    let pipeline = Pipeline::new(&cid);
    let mut run = pipeline.start("pushed.csv");
    run.feed(&VALID_ROW);
    run.feed(&VALID_ROW);
    assert_eq!(run.diagnostics().len(), 1);
    let report = run.finish();
    assert_eq!(report.source, "pushed.csv");
    assert_eq!(report.rows_read, 2);
}

#[test]
fn source_errors_abort_the_run() {
    let cid = customers_cid("0");
    let rows: Vec<Result<[&str; 6], std::io::Error>> = vec![
        Ok(VALID_ROW),
        Err(std::io::Error::other("disk on fire")),
        Ok(VALID_ROW),
    ];
    let err = Pipeline::new(&cid)
        .validate_results("broken.csv", rows)
        .expect_err("source failure");
    let ValidateError::RowSource { name, row, .. } = &err;
    assert_eq!(name, "broken.csv");
    assert_eq!(*row, 2);
    assert!(err.to_string().contains("disk on fire"));
}

#[test]
fn fallible_source_without_errors_validates() {
    let cid = customers_cid("0");
    let rows: Vec<Result<Vec<String>, std::io::Error>> =
        vec![Ok(VALID_ROW.iter().map(|cell| (*cell).to_string()).collect())];
    let report = Pipeline::new(&cid)
        .validate_results("ok.csv", rows)
        .expect("no source error");
    assert!(report.is_valid());
}

#[test]
fn report_serializes_diagnostics() {
    let cid = customers_cid("0");
    let report = Pipeline::new(&cid).validate("c.csv", [["38000", "23", "John", "Doe", "male"]]);
    let json = serde_json::to_value(&report).expect("json");
    assert_eq!(json["diagnostics"][0]["kind"], "row_shape");
    assert_eq!(json["rows_read"], 1);
}
