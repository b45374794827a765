//! Loading standards directories and run options from disk.

use std::fs;
use std::path::Path;

use pricelist_model::{FindingType, FormatHint, Importance};
use pricelist_standards::{
    BaselineSource, Condition, FieldRules, FindingCodes, GlobalValidation, RuleSchema, Standards,
    StandardsError, ValidatorOptions,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}

fn legacy_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "header_alternatives.json",
        r#"{
            "Price": ["Prijs", "Netto prijs"],
            "GTIN": ["EAN"],
            "Net Price": ["prijs"]
        }"#,
    );
    write(
        dir.path(),
        "field_rules.json",
        r#"{
            "fields": {
                "Price": {
                    "mandatory": true,
                    "format": "numeric",
                    "decimal_separator": ",",
                    "max_decimal_digits": 2
                },
                "GTIN": {"pattern": "\\d{8}|\\d{12,14}"},
                "Remarks": {"max_length": 200, "severity": "flag"}
            }
        }"#,
    );
    dir
}

#[test]
fn loads_legacy_standards_in_file_order() {
    let dir = legacy_dir();
    let standards = Standards::load(dir.path()).expect("load standards");

    assert_eq!(standards.schema(), RuleSchema::Legacy);
    let names: Vec<&str> = standards.rules.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Price", "GTIN", "Remarks"]);

    let price = standards.field("Price").expect("price");
    assert_eq!(price.importance, Importance::Mandatory);
    assert_eq!(price.format, FormatHint::Numeric);
    let FieldRules::Legacy(rules) = &price.rules else {
        panic!("expected legacy rules");
    };
    assert_eq!(rules.max_decimal_digits, Some(2));

    let alternatives: Vec<&str> = standards.alternatives.iter().map(|(f, _)| f).collect();
    assert_eq!(alternatives, vec!["Price", "GTIN", "Net Price"]);

    assert!(standards.reference_lists.is_empty());
    assert!(standards.institutions.is_empty());
    assert_eq!(standards.baseline.source, BaselineSource::BuiltIn);
    assert_eq!(standards.baseline.fields.len(), 17);
}

#[test]
fn legacy_standards_use_cross_check_options() {
    let dir = legacy_dir();
    let standards = Standards::load(dir.path()).expect("load standards");
    let options = ValidatorOptions::default();
    let checks = standards.global_validations(&options.cross_checks);
    let kinds: Vec<&str> = checks.iter().map(GlobalValidation::name).collect();
    assert_eq!(
        kinds,
        vec![
            "uom_relationship",
            "packaging_plausibility",
            "duplicate_url",
            "dimension_set"
        ]
    );
}

#[test]
fn loads_native_standards_with_globals_and_lists() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "header_alternatives.json", r#"{"Currency": ["Valuta"]}"#);
    write(
        dir.path(),
        "field_rules.json",
        r#"{
            "field_validations": {
                "Currency": {
                    "mandatory": true,
                    "rules": [
                        {"type": "rejection", "condition": "is_empty", "code": "C01", "message": "{field} is empty"},
                        {"type": "rejection", "condition": "not_in_list", "code": "C02", "params": {"list": "currencies"}},
                        {"type": "flag", "condition": "no_such_condition", "code": "C03"}
                    ]
                },
                "Product URL": [
                    {"type": "correction", "condition": "missing_prefix", "code": "U01", "params": {"prefixes": ["http://", "https://"]}}
                ]
            },
            "global_validations": [
                {"type": "duplicate_url", "identifier_fields": ["CAS Number"]},
                {"type": "unknown_check"}
            ]
        }"#,
    );
    write(
        dir.path(),
        "reference_lists.json",
        r#"{"currencies": ["EUR", "USD"]}"#,
    );
    write(
        dir.path(),
        "institution_mandatory.json",
        r#"{"umc": ["Sterile"]}"#,
    );
    write(
        dir.path(),
        "mandatory_baseline.json",
        r#"{"mandatory_fields": ["Currency", "Price", "Currency"]}"#,
    );

    let standards = Standards::load(dir.path()).expect("load standards");
    assert_eq!(standards.schema(), RuleSchema::Native);

    let currency = standards.field("Currency").expect("currency");
    assert_eq!(currency.importance, Importance::Mandatory);
    assert!(currency.has_empty_rule());
    let FieldRules::Native(rules) = &currency.rules else {
        panic!("expected native rules");
    };
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].condition, Condition::IsEmpty);

    let url = standards.field("Product URL").expect("url");
    assert_eq!(url.importance, Importance::Optional);
    assert!(!url.has_empty_rule());
    let FieldRules::Native(rules) = &url.rules else {
        panic!("expected native rules");
    };
    assert_eq!(rules[0].finding_type, FindingType::Correction);

    let options = ValidatorOptions::default();
    let checks = standards.global_validations(&options.cross_checks);
    assert_eq!(checks.len(), 1);
    let GlobalValidation::DuplicateUrl(check) = &checks[0] else {
        panic!("expected duplicate_url");
    };
    assert!(check.is_chemical_aware());
    assert_eq!(check.threshold, 3);

    assert_eq!(standards.reference_lists.contains("currencies", "eur"), Some(true));
    assert_eq!(standards.institutions.fields_for("UMC"), ["Sterile"]);
    assert_eq!(standards.baseline.source, BaselineSource::Configured);
    assert_eq!(standards.baseline.fields, vec!["Currency", "Price"]);
    assert!(standards.is_known_field("Product URL"));
    assert!(!standards.is_known_field("Sterile"));
}

#[test]
fn rule_file_without_known_shape_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "header_alternatives.json", "{}");
    write(dir.path(), "field_rules.json", r#"{"validations": {}}"#);

    let err = Standards::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::UnknownRuleSchema { .. }));
}

#[test]
fn field_names_must_be_unique_after_trimming() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "header_alternatives.json", "{}");
    write(
        dir.path(),
        "field_rules.json",
        r#"{"fields": {"Price": {}, "Price ": {"mandatory": true}}}"#,
    );

    let err = Standards::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::DuplicateField { field, .. } if field == "Price"));
}

#[test]
fn unparsable_baseline_falls_back_to_builtin_list() {
    let dir = legacy_dir();
    write(dir.path(), "mandatory_baseline.json", "{ not json");
    let standards = Standards::load(dir.path()).expect("load standards");
    assert_eq!(standards.baseline.source, BaselineSource::BuiltIn);
    assert!(standards.baseline.fields.iter().any(|f| f == "Start Date"));
}

#[test]
fn missing_rule_file_is_an_io_error() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "header_alternatives.json", "{}");
    let err = Standards::load(dir.path()).unwrap_err();
    assert!(matches!(err, StandardsError::Io { .. }));
}

#[test]
fn options_load_from_toml_with_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("options.toml");
    fs::write(
        &path,
        r#"
max_rows = 250
invalid_values = ["", "n/a"]

[cross_checks]
url_threshold = 5
chemical_identifier_fields = ["CAS Number", "UN Number"]

[codes]
mandatory_empty = "M900"
"#,
    )
    .expect("write options");

    let options = ValidatorOptions::load(&path).expect("load options");
    assert_eq!(options.max_rows, 250);
    assert_eq!(options.header_row, 1);
    assert_eq!(options.invalid_values, vec!["", "n/a"]);
    assert_eq!(options.ignore_prefixes, vec!["unnamed"]);
    assert_eq!(options.cross_checks.url_threshold, 5);
    assert_eq!(options.cross_checks.orderable_uom, "Orderable Unit UOM");
    assert_eq!(options.codes.mandatory_empty, "M900");
    assert_eq!(options.codes.relationship_conflict, "X001");
    assert_eq!(options.classifier.context_sheet, "TemplateContext");
}

#[test]
fn invalid_options_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("options.toml");

    fs::write(&path, "max_rows = 0\n").expect("write options");
    assert!(matches!(
        ValidatorOptions::load(&path),
        Err(StandardsError::InvalidOptions { .. })
    ));

    fs::write(&path, "[classifier]\nstamp_cells = [\"1A\"]\n").expect("write options");
    assert!(matches!(
        ValidatorOptions::load(&path),
        Err(StandardsError::InvalidOptions { .. })
    ));

    fs::write(&path, "[classifier]\nstamp_cells = [\"ZZZZZZZZZZZZZZZZ1\"]\n").expect("write options");
    assert!(matches!(
        ValidatorOptions::load(&path),
        Err(StandardsError::InvalidOptions { .. })
    ));

    fs::write(&path, "max_rowz = 10\n").expect("write options");
    assert!(matches!(
        ValidatorOptions::load(&path),
        Err(StandardsError::Toml { .. })
    ));
}

#[test]
fn default_finding_codes() {
    insta::assert_json_snapshot!(FindingCodes::default(), @r#"
    {
      "mandatory_empty": "M001",
      "relationship_conflict": "X001",
      "packaging_mismatch": "X002",
      "duplicate_url": "X003",
      "incomplete_dimensions": "X004"
    }
    "#);
}
