//! File-level validation runs with a standards directory on disk.

use std::fs;
use std::path::Path;

use pricelist_cli::pipeline::{ValidateRequest, validate_file};
use pricelist_core::MandatorySource;
use pricelist_model::TemplateKind;
use tempfile::TempDir;

fn write_standards(dir: &Path) {
    fs::write(
        dir.join("header_alternatives.json"),
        r#"{"Price": ["Prijs", "Netto prijs"], "Currency": ["Valuta"]}"#,
    )
    .expect("write alternatives");
    fs::write(
        dir.join("field_rules.json"),
        r#"{"field_validations": {"Price": [{"condition": "not_numeric", "code": "P01"}]}}"#,
    )
    .expect("write rules");
    fs::write(
        dir.join("mandatory_baseline.json"),
        r#"{"mandatory_fields": ["Price", "Currency"]}"#,
    )
    .expect("write baseline");
}

fn request<'a>(file: &'a Path, standards_dir: &'a Path) -> ValidateRequest<'a> {
    ValidateRequest {
        file,
        standards_dir,
        options: None,
        metadata: None,
        delimiter: None,
    }
}

#[test]
fn validates_csv_against_standards_directory() {
    let dir = TempDir::new().expect("tempdir");
    write_standards(dir.path());
    let file = dir.path().join("prices.csv");
    fs::write(&file, "Prijs;Valuta\nabc;EUR\n12,5;\n").expect("write csv");

    let outcome = validate_file(request(&file, dir.path())).expect("validate");

    assert_eq!(outcome.mandatory.source, MandatorySource::ConfiguredBaseline);
    let found: Vec<(Option<usize>, &str, &str)> = outcome
        .findings
        .iter()
        .map(|f| (f.row, f.field.as_str(), f.code.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![(Some(2), "Price", "P01"), (Some(3), "Currency", "M001")]
    );
    assert!(outcome.has_rejections());

    let json = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(json["summary"]["rows"], 2);
}

#[test]
fn options_file_moves_the_header_row() {
    let dir = TempDir::new().expect("tempdir");
    write_standards(dir.path());
    let file = dir.path().join("prices.csv");
    fs::write(&file, "Price list 2026,\nPrijs,Valuta\n10,EUR\n").expect("write csv");
    let options = dir.path().join("options.toml");
    fs::write(&options, "header_row = 2\n").expect("write options");

    let outcome = validate_file(ValidateRequest {
        options: Some(&options),
        delimiter: Some(','),
        ..request(&file, dir.path())
    })
    .expect("validate");

    assert_eq!(outcome.header_offset, 3);
    assert!(outcome.findings.is_empty());
    assert!(!outcome.has_rejections());
}

#[test]
fn missing_standards_are_reported_with_context() {
    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("prices.csv");
    fs::write(&file, "Price\n1\n").expect("write csv");

    let error = validate_file(request(&file, &dir.path().join("standards")))
        .expect_err("standards directory is missing");

    assert!(format!("{error:#}").contains("load standards from"));
}

#[test]
fn corrupt_sidecar_classifies_as_alternative() {
    let dir = TempDir::new().expect("tempdir");
    write_standards(dir.path());
    let file = dir.path().join("prices.csv");
    fs::write(&file, "Prijs,Valuta\n10,EUR\n").expect("write csv");
    fs::write(dir.path().join("prices.csv.metadata.json"), "{not json").expect("write sidecar");

    let outcome = validate_file(request(&file, dir.path())).expect("validate");

    assert_eq!(outcome.context.template_kind, TemplateKind::Alternative);
    assert_eq!(outcome.mandatory.source, MandatorySource::ConfiguredBaseline);
    assert!(outcome.findings.is_empty());
}
