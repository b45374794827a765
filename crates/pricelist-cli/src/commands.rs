use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use pricelist_cli::pipeline::{ValidateRequest, load_standards, validate_file};
use pricelist_core::ValidationOutcome;
use pricelist_map::normalize;

use crate::cli::{FieldsArgs, ReportFormatArg, ValidateArgs};
use crate::summary::{apply_table_style, header_cell, print_summary};

pub fn run_validate(args: &ValidateArgs) -> Result<ValidationOutcome> {
    let outcome = validate_file(ValidateRequest {
        file: &args.file,
        standards_dir: &args.standards,
        options: args.options.as_deref(),
        metadata: args.metadata.as_deref(),
        delimiter: args.delimiter,
    })?;
    match args.format {
        ReportFormatArg::Table => print_summary(&outcome),
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(&outcome).context("serialize outcome")?;
            println!("{json}");
        }
    }
    Ok(outcome)
}

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let standards = load_standards(&args.standards)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Importance"),
        header_cell("Format"),
        header_cell("Schema"),
        header_cell("Alternatives"),
    ]);
    apply_table_style(&mut table);
    let entries = standards.alternative_entries();
    for definition in standards.rules.iter() {
        let alternatives = entries
            .iter()
            .find(|(field, _)| *field == definition.name)
            .map(|(_, alts)| alts.join(", "))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&definition.name),
            Cell::new(format!("{:?}", definition.importance).to_lowercase()),
            Cell::new(format!("{:?}", definition.format).to_lowercase()),
            Cell::new(definition.schema().label()),
            Cell::new(alternatives),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_normalize(headers: &[String]) {
    for header in headers {
        println!("{header}\t{}", normalize(header).as_str());
    }
}
