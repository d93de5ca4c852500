use std::fs;
use std::path::{Path, PathBuf};

use cidcheck_ingest::{IngestError, data_rows, delimited_rows, fixed_rows, read_cid_rows};
use cidcheck_model::{Cid, DataFormatSpec, FormatTag};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn collect<I: Iterator<Item = cidcheck_ingest::Result<Vec<String>>>>(rows: I) -> Vec<Vec<String>> {
    rows.collect::<Result<Vec<_>, _>>().expect("read rows")
}

fn fixed_cid() -> Cid {
    Cid::read(
        "fixed.cid",
        [
            vec!["d", "format", "fixed"],
            vec!["f", "branch_id", "", "", "5"],
            vec!["f", "customer_id", "", "", "2", "Integer"],
        ],
    )
    .expect("read cid")
}

#[test]
fn reads_cid_with_sniffed_delimiter() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "customers.cid",
        b"D;Format;delimited\n ;Name;;;Length;Type;Rule\nF;name;;;...50\nF;height;;;;Decimal\nF;kind;;;;Choice;\"a;b,c\"\n",
    );
    let rows = collect(read_cid_rows(&path).expect("open"));
    assert_eq!(rows[0], ["D", "Format", "delimited"]);
    assert_eq!(rows[4][6], "a;b,c");

    let cid = Cid::read(path.display().to_string(), &rows).expect("valid cid");
    assert_eq!(cid.field_names(), ["name", "height", "kind"]);
}

#[test]
fn cid_file_may_start_with_bom() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "bom.cid", b"\xef\xbb\xbfd,format,delimited\r\nf,id\r\n");
    let rows = collect(read_cid_rows(&path).expect("open"));
    assert_eq!(rows, [vec!["d", "format", "delimited"], vec!["f", "id"]]);
}

#[test]
fn reads_delimited_data_with_quotes() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "customers.csv",
        b"branch_id,customer_id,first_name,surname,gender,date_of_birth\n38000,23,John,\"Doe, Jr.\",male,08.03.1957\n38000,59,Bill,Doe\n",
    );
    let data_format = DataFormatSpec::new(FormatTag::Delimited);
    let rows = collect(delimited_rows(&path, &data_format).expect("open"));
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], ["38000", "23", "John", "Doe, Jr.", "male", "08.03.1957"]);
    // Short rows are kept as they are.
    assert_eq!(rows[2], ["38000", "59", "Bill", "Doe"]);
}

#[test]
fn delimited_rows_are_records_not_lines() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "notes.csv", b"id,note

1,\"two\nlines\"
2,plain
");
    let mut data_format = DataFormatSpec::new(FormatTag::Delimited);
    data_format.set("item_delimiter", ",").expect("delimiter");
    let rows = collect(delimited_rows(&path, &data_format).expect("open"));
    assert_eq!(
        rows,
        [
            vec!["id", "note"],
            vec!["1", "two\nlines"],
            vec!["2", "plain"],
        ]
    );
}

#[test]
fn honors_declared_delimiter_escape_and_encoding() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "legacy.csv", b"Gr\xf6\xdfe|\"say \\\"hi\\\"\"\n");
    let mut data_format = DataFormatSpec::new(FormatTag::Delimited);
    data_format.set("encoding", "cp1252").expect("encoding");
    data_format.set("item_delimiter", "|").expect("delimiter");
    data_format.set("escape_character", "\\").expect("escape");
    let rows = collect(delimited_rows(&path, &data_format).expect("open"));
    assert_eq!(rows, [vec!["Größe", "say \"hi\""]]);
}

#[test]
fn malformed_text_is_a_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "broken.csv", b"a,b\n\xff\xfe,c\n");
    let mut data_format = DataFormatSpec::new(FormatTag::Delimited);
    data_format.set("item_delimiter", ",").expect("delimiter");
    let result: Result<Vec<_>, _> = delimited_rows(&path, &data_format)
        .expect("open")
        .collect();
    assert!(matches!(result, Err(IngestError::CsvParse { .. })));
}

#[test]
fn reads_fixed_width_data() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "customers.txt", b"3800023\r\n38001\n3800299x\n");
    let rows = collect(fixed_rows(&path, &fixed_cid()).expect("open"));
    assert_eq!(
        rows,
        [
            vec!["38000", "23"],
            vec!["38001"],
            vec!["38002", "99", "x"],
        ]
    );
}

#[test]
fn data_rows_dispatches_on_format() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "customers.txt", b"3800023\n");
    let rows = collect(data_rows(&path, &fixed_cid()).expect("open"));
    assert_eq!(rows, [vec!["38000", "23"]]);

    let spreadsheet = Cid::read("book.cid", [vec!["d", "format", "excel"]]).expect("read cid");
    let err = data_rows(Path::new("book.xls"), &spreadsheet).expect_err("unsupported");
    assert!(matches!(
        err,
        IngestError::UnsupportedFormat {
            format: FormatTag::Spreadsheet,
            ..
        }
    ));
}

#[test]
fn formats_must_match_reader() {
    let data_format = DataFormatSpec::new(FormatTag::Fixed);
    let err = delimited_rows(Path::new("data.txt"), &data_format).expect_err("not delimited");
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));

    let delimited = Cid::read("d.cid", [vec!["d", "format", "delimited"]]).expect("read cid");
    assert!(fixed_rows(Path::new("data.csv"), &delimited).is_err());
}

#[test]
fn non_ascii_delimiter_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "data.csv", b"a\xc2\xa7b\n");
    let mut data_format = DataFormatSpec::new(FormatTag::Delimited);
    data_format.set("item_delimiter", "§").expect("delimiter");
    let err = delimited_rows(&path, &data_format).expect_err("not ascii");
    assert!(matches!(
        err,
        IngestError::UnrepresentableDelimiter {
            key: "item_delimiter",
            value: '§',
            ..
        }
    ));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let err = read_cid_rows(&dir.path().join("missing.cid")).expect_err("missing");
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
