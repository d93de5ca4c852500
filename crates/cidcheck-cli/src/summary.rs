//! Terminal rendering of interface descriptions and validation reports.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use cidcheck_model::{Cid, Diagnostic, DiagnosticKind};
use cidcheck_validate::ValidationReport;

pub fn print_schema(cid: &Cid) {
    println!("Interface: {}", cid.source());
    println!("Data format: {}", cid.data_format());
    println!("{}", fields_table(cid));
    if !cid.checks().is_empty() {
        println!();
        println!("Checks:");
        println!("{}", checks_table(cid));
    }
}

pub fn print_reports(reports: &[ValidationReport]) {
    for report in reports {
        println!("Data: {}", report.source);
        if report.is_valid() {
            println!("No diagnostics.");
        } else {
            println!("{}", diagnostics_table(report));
        }
        println!();
    }
    println!("{}", summary_line(reports));
}

pub fn fields_table(cid: &Cid) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Length"),
        header_cell("Empty"),
        header_cell("Rule"),
        header_cell("Example"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for field in cid.fields() {
        table.add_row(vec![
            dim_cell(field.position() + 1),
            Cell::new(field.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(field.field_type()),
            text_cell(&field.length().description()),
            if field.is_allowed_to_be_empty() {
                Cell::new("X").fg(Color::Green)
            } else {
                dim_cell("-")
            },
            text_cell(field.rule()),
            text_cell(field.example().unwrap_or("")),
        ]);
    }
    table
}

pub fn checks_table(cid: &Cid) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Type"),
        header_cell("Fields"),
        header_cell("Rule"),
    ]);
    apply_table_style(&mut table);
    for check in cid.checks() {
        table.add_row(vec![
            Cell::new(check.name()).add_attribute(Attribute::Bold),
            Cell::new(check.check_type()),
            text_cell(&check.field_names().join(", ")),
            text_cell(check.rule()),
        ]);
    }
    table
}

pub fn diagnostics_table(report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Kind"),
        header_cell("Field / Check"),
        header_cell("Message"),
    ]);
    apply_diagnostic_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for diagnostic in &report.diagnostics {
        table.add_row(diagnostic_row(diagnostic));
    }
    table
}

/// One line totalling files, rows and diagnostics.
pub fn summary_line(reports: &[ValidationReport]) -> String {
    let rows: usize = reports.iter().map(|report| report.rows_read).sum();
    let diagnostics: usize = reports.iter().map(ValidationReport::error_count).sum();
    let mut line = format!(
        "{} file(s), {rows} row(s), {diagnostics} diagnostic(s)",
        reports.len()
    );
    let stopped: Vec<&str> = reports
        .iter()
        .filter(|report| report.stopped_early)
        .map(|report| report.source.as_str())
        .collect();
    if !stopped.is_empty() {
        line.push_str(&format!("; stopped early: {}", stopped.join(", ")));
    }
    line
}

fn diagnostic_row(diagnostic: &Diagnostic) -> Vec<Cell> {
    let row = match diagnostic.row_number {
        Some(row) => Cell::new(row),
        None => dim_cell("end"),
    };
    vec![
        row,
        kind_cell(diagnostic.kind),
        text_cell(diagnostic.field.as_deref().unwrap_or("")),
        Cell::new(&diagnostic.message),
    ]
}

fn kind_cell(kind: DiagnosticKind) -> Cell {
    match kind {
        DiagnosticKind::RowShape => Cell::new(kind).fg(Color::Yellow),
        DiagnosticKind::FieldValue => Cell::new(kind).fg(Color::Red),
        DiagnosticKind::Check => Cell::new(kind)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_diagnostic_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::UpperBoundary(Width::Fixed(13)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ColumnConstraint::LowerBoundary(Width::Percentage(40)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Blank text renders as a dimmed dash.
fn text_cell(value: &str) -> Cell {
    if value.trim().is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(source: &str, rows_read: usize, diagnostics: Vec<Diagnostic>) -> ValidationReport {
        ValidationReport {
            source: source.to_string(),
            rows_read,
            diagnostics,
            stopped_early: false,
        }
    }

    #[test]
    fn summary_line_totals_reports() {
        let mut stopped = report("b.csv", 2, vec![Diagnostic::row_shape(1, 1, 2)]);
        stopped.stopped_early = true;
        let line = summary_line(&[report("a.csv", 3, Vec::new()), stopped]);
        assert_eq!(
            line,
            "2 file(s), 5 row(s), 1 diagnostic(s); stopped early: b.csv"
        );
    }

    #[test]
    fn diagnostics_table_has_one_row_per_diagnostic() {
        let report = report(
            "a.csv",
            2,
            vec![Diagnostic::row_shape(1, 1, 2), Diagnostic::row_shape(2, 3, 2)],
        );
        let table = diagnostics_table(&report);
        assert_eq!(table.row_iter().count(), 2);
    }
}
