use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use sdtm_core::supp_domain_code;
use sdtm_model::{Severity, ValidationIssue};

use crate::types::StudyResult;

pub fn print_summary(result: &StudyResult) {
    let report = &result.report;
    println!("Study: {}", report.study_id);
    match &result.output_dir {
        Some(dir) => println!("Output: {}", dir.display()),
        None => println!("Output: (dry run)"),
    }
    if let Some(path) = &result.conformance_report {
        println!("Conformance report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Domain"),
        header_cell("Description"),
        header_cell("Records"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Info"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut total_records = 0usize;
    for domain in &report.results {
        let description = result
            .descriptions
            .get(&domain.domain_code)
            .map_or("", String::as_str);
        total_records += domain.records;
        table.add_row(vec![
            domain_cell(&domain.domain_code),
            Cell::new(description),
            Cell::new(domain.records),
            count_cell(Some(domain.report.error_count()), Color::Red),
            count_cell(Some(domain.report.warning_count()), Color::Yellow),
            count_cell(Some(domain.report.info_count()), Color::Blue),
        ]);
        if domain.supplemental_records > 0 {
            table.add_row(vec![
                supp_cell(&supp_domain_code(&domain.domain_code)),
                dim_cell(format!("Supplemental Qualifiers for {}", domain.domain_code)),
                Cell::new(domain.supplemental_records).fg(Color::DarkGrey),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]);
        }
    }
    for failure in &report.failures {
        table.add_row(vec![
            domain_cell(&failure.domain_code),
            Cell::new(format!("FAILED: {}", failure.message)).fg(Color::Red),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All domains")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        count_cell(Some(report.error_count()), Color::Red).add_attribute(Attribute::Bold),
        count_cell(Some(report.warning_count()), Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_issue_table(result);

    if !result.skipped_files.is_empty() {
        eprintln!("Skipped files:");
        for path in &result.skipped_files {
            eprintln!("- {}", path.display());
        }
    }
    if report.was_cancelled() {
        eprintln!("Cancelled before start: {}", report.cancelled.join(", "));
    }
}

fn print_issue_table(result: &StudyResult) {
    let mut issues: Vec<(&str, &ValidationIssue)> = result
        .report
        .results
        .iter()
        .flat_map(|domain| {
            domain
                .report
                .issues
                .iter()
                .map(|issue| (domain.domain_code.as_str(), issue))
        })
        .collect();
    if issues.is_empty() {
        return;
    }
    // Stable: keeps report order within a severity and domain.
    issues.sort_by(|a, b| {
        severity_rank(b.1.severity)
            .cmp(&severity_rank(a.1.severity))
            .then_with(|| a.0.cmp(b.0))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Domain"),
        header_cell("Severity"),
        header_cell("Variable"),
        header_cell("Code"),
        header_cell("Rows"),
        header_cell("Codelist"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for (domain, issue) in issues {
        table.add_row(vec![
            domain_cell(domain),
            severity_cell(issue.severity),
            Cell::new(issue.variable.as_deref().unwrap_or("-")),
            Cell::new(&issue.code),
            issue_count_cell(issue.row_count, issue.severity),
            Cell::new(issue.codelist_code.as_deref().unwrap_or("-")),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(4)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(180);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::Blue),
    }
}

fn issue_count_cell(count: Option<u64>, severity: Severity) -> Cell {
    match count {
        Some(value) => Cell::new(value).fg(severity_color(severity)),
        None => dim_cell("-"),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 3,
        Severity::Warning => 2,
        Severity::Info => 1,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Blue,
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn domain_cell(code: &str) -> Cell {
    Cell::new(code)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn supp_cell(code: &str) -> Cell {
    Cell::new(format!("  -> {code}")).fg(Color::DarkGrey)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
