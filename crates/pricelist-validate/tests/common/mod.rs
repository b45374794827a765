#![allow(dead_code)]

use std::path::Path;

use pricelist_model::{CellValue, Finding, Table, TableColumn};
use pricelist_standards::{FieldRuleSet, HeaderAlternatives, Standards};
use serde_json::Value;

/// Table whose columns are already canonical; rows start at ordinal 2.
pub fn table(columns: &[&str], rows: &[Vec<&str>]) -> Table {
    let columns = columns
        .iter()
        .enumerate()
        .map(|(position, name)| TableColumn {
            name: name.to_string(),
            original_name: name.to_string(),
            position,
        })
        .collect();
    let cells: Vec<Vec<CellValue>> = rows
        .iter()
        .map(|row| row.iter().map(|value| CellValue::from(*value)).collect())
        .collect();
    Table::from_cells(columns, &cells, 2)
}

pub fn standards(rules: Value) -> Standards {
    let rules = FieldRuleSet::from_value(Path::new("field_rules.json"), rules).expect("rules");
    Standards::new(HeaderAlternatives::new(), rules)
}

pub fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

/// `(row, field, code)` triples for compact assertions.
pub fn keys(findings: &[Finding]) -> Vec<(Option<usize>, &str, &str)> {
    findings
        .iter()
        .map(|f| (f.row, f.field.as_str(), f.code.as_str()))
        .collect()
}
