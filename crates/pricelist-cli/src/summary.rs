use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pricelist_core::ValidationOutcome;
use pricelist_model::{FieldStatistics, FieldStatus, Finding, FindingType, Importance};

pub fn print_summary(outcome: &ValidationOutcome) {
    let summary = &outcome.summary;
    println!("Template: {}", outcome.context.template_kind.label());
    println!(
        "Rows: {}{}",
        summary.rows,
        if outcome.truncated {
            format!(" (truncated from {})", outcome.source_rows)
        } else {
            String::new()
        }
    );
    println!(
        "Mandatory fields: {} ({:?}), {} correct, {} incorrect, {} not present",
        summary.mandatory_total,
        outcome.mandatory.source,
        summary.mandatory_correct,
        summary.mandatory_incorrect,
        summary.mandatory_not_present
    );
    println!("Fill rate: {:.1}%", summary.fill_rate);
    if !outcome.headers.unmapped.is_empty() {
        let names: Vec<&str> = outcome
            .headers
            .unmapped
            .iter()
            .map(|column| column.name.as_str())
            .collect();
        println!("Unmapped columns: {}", names.join(", "));
    }

    print_field_table(&outcome.statistics);
    print_finding_table(&outcome.findings);

    if !outcome.anomalies.is_empty() {
        eprintln!("Anomalies:");
        for anomaly in &outcome.anomalies {
            eprintln!(
                "- {:?} {}: {} ({}x)",
                anomaly.kind, anomaly.subject, anomaly.detail, anomaly.occurrences
            );
        }
    }
    println!(
        "Findings: {} ({} rejections, {} corrections, {} flags)",
        summary.total_findings, summary.rejections, summary.corrections, summary.flags
    );
}

fn print_field_table(statistics: &[FieldStatistics]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Importance"),
        header_cell("Status"),
        header_cell("Filled"),
        header_cell("Empty"),
        header_cell("Errors"),
        header_cell("Fill %"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 3..7 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for stats in statistics {
        let importance = match stats.importance {
            Importance::Mandatory => Cell::new("mandatory").add_attribute(Attribute::Bold),
            Importance::Optional => dim_cell("optional"),
        };
        table.add_row(vec![
            Cell::new(&stats.field),
            importance,
            status_cell(stats.status),
            Cell::new(stats.filled),
            Cell::new(stats.empty),
            count_cell(stats.error_count, Color::Red),
            Cell::new(format!("{:.1}", stats.fill_rate())),
        ]);
    }
    println!("{table}");
}

fn print_finding_table(findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Code"),
        header_cell("Type"),
        header_cell("Message"),
    ]);
    apply_finding_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for finding in findings {
        table.add_row(vec![
            finding.row.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&finding.field),
            Cell::new(&finding.original_column),
            Cell::new(&finding.code),
            type_cell(finding.finding_type),
            Cell::new(&finding.message),
        ]);
    }
    println!();
    println!("Findings:");
    println!("{table}");
}

fn status_cell(status: FieldStatus) -> Cell {
    match status {
        FieldStatus::Correct => Cell::new("correct").fg(Color::Green),
        FieldStatus::Incorrect => Cell::new("incorrect")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FieldStatus::NotPresent => Cell::new("not present").fg(Color::Yellow),
        FieldStatus::Informational => dim_cell("-"),
    }
}

fn type_cell(finding_type: FindingType) -> Cell {
    let color = match finding_type {
        FindingType::Rejection => Color::Red,
        FindingType::Correction => Color::Yellow,
        FindingType::Flag => Color::Cyan,
    };
    Cell::new(finding_type.label()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
        .set_width(120);
}

fn apply_finding_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
