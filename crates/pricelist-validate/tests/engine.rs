//! Rule engine behavior for both schema generations.

mod common;

use std::collections::BTreeMap;

use pricelist_model::FindingType;
use pricelist_standards::{FindingCodes, ReferenceLists, RuleSchema};
use pricelist_validate::{AnomalyKind, Diagnostics, Emptiness, RuleEngine};
use serde_json::json;

use common::{fields, keys, standards, table};

fn legacy_rules() -> serde_json::Value {
    json!({
        "fields": {
            "Price": {
                "format": "numeric",
                "decimal_separator": ",",
                "max_decimal_digits": 2,
                "pattern": "[0-9.,]+"
            },
            "GTIN": {"pattern": "\\d{8}|\\d{12,14}"},
            "Remarks": {"max_length": 5, "severity": "flag"},
            "Hazard Class": {"depends_on": {"field": "Hazardous", "value": "yes"}}
        }
    })
}

#[test]
fn legacy_checks_follow_format_and_severity() {
    let standards = standards(legacy_rules());
    let emptiness = Emptiness::new(["n/a"]);
    let codes = FindingCodes::default();
    let mandatory = fields(&["Price"]);
    let engine = RuleEngine::new(&standards, &mandatory, &emptiness, &codes);
    let table = table(
        &["Price", "GTIN", "Remarks"],
        &[
            vec!["12,345", "12345678", ""],
            vec!["abc", "1234567", "short"],
            vec!["N/A", "", "too long"],
            vec!["1.250,5", "1234567890123", ""],
        ],
    );

    let mut diagnostics = Diagnostics::new();
    let findings = engine.execute(&table, &mut diagnostics);

    assert_eq!(
        keys(&findings),
        vec![
            (Some(2), "Price", "L007"),
            (Some(3), "Price", "L005"),
            (Some(3), "Price", "L008"),
            (Some(3), "GTIN", "L008"),
            (Some(4), "Price", "L001"),
            (Some(4), "Remarks", "L003"),
        ]
    );
    assert_eq!(findings[4].finding_type, FindingType::Rejection);
    assert_eq!(findings[4].message, "Price is mandatory but empty");
    assert_eq!(findings[4].value.as_deref(), Some("N/A"));
    assert_eq!(findings[5].finding_type, FindingType::Flag);
    assert!(diagnostics.is_empty());
}

#[test]
fn legacy_required_empty_skips_remaining_checks() {
    let standards = standards(json!({
        "fields": {
            "GTIN": {"mandatory": true, "min_length": 8, "pattern": "\\d+"}
        }
    }));
    let emptiness = Emptiness::default();
    let codes = FindingCodes::default();
    let mandatory = fields(&["GTIN"]);
    let engine = RuleEngine::new(&standards, &mandatory, &emptiness, &codes);
    let table = table(&["GTIN"], &[vec!["   "]]);

    let findings = engine.execute(&table, &mut Diagnostics::new());

    assert_eq!(keys(&findings), vec![(Some(2), "GTIN", "L001")]);
}

#[test]
fn legacy_dependency_makes_field_required() {
    let standards = standards(legacy_rules());
    let emptiness = Emptiness::default();
    let codes = FindingCodes::default();
    let engine = RuleEngine::new(&standards, &[], &emptiness, &codes);
    let table = table(
        &["Hazardous", "Hazard Class"],
        &[vec!["YES", ""], vec!["no", ""], vec!["yes", "3"]],
    );

    let findings = engine.execute(&table, &mut Diagnostics::new());

    assert_eq!(keys(&findings), vec![(Some(2), "Hazard Class", "L001")]);
}

#[test]
fn legacy_dependency_on_missing_column_is_diagnosed() {
    let standards = standards(legacy_rules());
    let emptiness = Emptiness::default();
    let codes = FindingCodes::default();
    let engine = RuleEngine::new(&standards, &[], &emptiness, &codes);
    let table = table(&["Hazard Class"], &[vec![""], vec![""]]);

    let mut diagnostics = Diagnostics::new();
    let findings = engine.execute(&table, &mut diagnostics);

    assert!(findings.is_empty());
    let anomalies = diagnostics.into_anomalies();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::MissingField);
    assert_eq!(anomalies[0].occurrences, 2);
}

#[test]
fn legacy_digits_and_allowed_values() {
    let standards = standards(json!({
        "fields": {
            "Quantity": {"format": "numeric", "max_integer_digits": 3},
            "Unit": {"allowed_values": ["EA", "BOX"]},
            "Valid From": {"format": "date", "max_length": 4, "allowed_values": ["x"]}
        }
    }));
    let emptiness = Emptiness::new(["n/a"]);
    let codes = FindingCodes::default();
    let engine = RuleEngine::new(&standards, &[], &emptiness, &codes);
    let table = table(
        &["Quantity", "Unit", "Valid From"],
        &[
            vec!["1234", "ea", "2026-01-01"],
            vec!["999", "PCS", "2026-01-01"],
            vec!["0012,5", "n/a", "n/a"],
        ],
    );

    let findings = engine.execute(&table, &mut Diagnostics::new());

    assert_eq!(
        keys(&findings),
        vec![(Some(2), "Quantity", "L006"), (Some(3), "Unit", "L004")]
    );
}

fn native_rules() -> serde_json::Value {
    json!({
        "field_validations": {
            "Price": [
                {"condition": "not_numeric", "code": "P01", "message": "{field} '{value}' is not a number"}
            ],
            "Unit Price": [
                {
                    "condition": "calculation_mismatch",
                    "code": "P10",
                    "type": "flag",
                    "params": {"left": "Price", "right": "Content", "operation": "divide"}
                }
            ],
            "Currency": [
                {"condition": "not_in_list", "code": "C01", "params": {"list": "currencies"}}
            ],
            "Description": [{"condition": "is_empty", "code": "D01"}],
            "Content": {"mandatory": true, "rules": []}
        }
    })
}

fn currencies() -> ReferenceLists {
    ReferenceLists::from_map(BTreeMap::from([(
        "currencies".to_string(),
        vec!["EUR".to_string(), "USD".to_string()],
    )]))
}

#[test]
fn native_rules_fire_independently() {
    let standards = standards(native_rules()).with_reference_lists(currencies());
    let emptiness = Emptiness::new(["n/a"]);
    let codes = FindingCodes::default();
    let mandatory = fields(&["Content", "Description", "Brand"]);
    let engine = RuleEngine::new(&standards, &mandatory, &emptiness, &codes);
    let table = table(
        &["Price", "Content", "Unit Price", "Currency", "Description", "Brand"],
        &[
            vec!["10,00", "4", "2,50", "eur", "Gloves", "Acme"],
            vec!["ten", "2", "5", "GBP", "", "n/a"],
            vec!["10", "0", "1", "USD", "Tape", "Acme"],
            vec!["9", "", "3", "USD", "Tape", "Acme"],
            vec!["9", "2", "3", "USD", "Tape", "Acme"],
        ],
    );

    let mut diagnostics = Diagnostics::new();
    let findings = engine.execute(&table, &mut diagnostics);

    assert_eq!(
        keys(&findings),
        vec![
            (Some(3), "Price", "P01"),
            (Some(3), "Currency", "C01"),
            (Some(3), "Description", "D01"),
            (Some(3), "Brand", "M001"),
            (Some(5), "Content", "M001"),
            (Some(6), "Unit Price", "P10"),
        ]
    );
    assert_eq!(findings[0].message, "Price 'ten' is not a number");
    assert_eq!(findings[5].finding_type, FindingType::Flag);

    let anomalies = diagnostics.into_anomalies();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].kind, AnomalyKind::DivisionByZero);
    assert_eq!(anomalies[0].subject, "Unit Price [P10]");
    assert_eq!(anomalies[0].first_row, Some(4));
}

#[test]
fn unknown_reference_list_skips_the_rule() {
    let standards = standards(native_rules());
    let emptiness = Emptiness::default();
    let codes = FindingCodes::default();
    let engine = RuleEngine::new(&standards, &[], &emptiness, &codes);
    let table = table(&["Currency"], &[vec!["XYZ"], vec!["EUR"]]);

    let mut diagnostics = Diagnostics::new();
    let findings = engine.execute(&table, &mut diagnostics);

    assert!(findings.is_empty());
    let anomalies = diagnostics.into_anomalies();
    assert_eq!(anomalies[0].kind, AnomalyKind::UnknownReferenceList);
    assert_eq!(anomalies[0].occurrences, 2);
}

#[test]
fn invalid_values_are_empty_in_both_schemas() {
    let emptiness = Emptiness::new(["N/A", "-"]);
    let codes = FindingCodes::default();
    let mandatory = fields(&["Price"]);
    let rows = table(&["Price"], &[vec![" n/a "], vec!["-"], vec!["5"]]);

    let legacy = standards(json!({"fields": {"Price": {"format": "numeric"}}}));
    let engine = RuleEngine::new(&legacy, &mandatory, &emptiness, &codes);
    let legacy_findings = engine.execute(&rows, &mut Diagnostics::new());
    assert_eq!(
        keys(&legacy_findings),
        vec![(Some(2), "Price", "L001"), (Some(3), "Price", "L001")]
    );

    let native = standards(json!({
        "field_validations": {
            "Price": [{"condition": "not_numeric", "code": "P01"}]
        }
    }));
    let engine = RuleEngine::new(&native, &mandatory, &emptiness, &codes);
    let native_findings = engine.execute(&rows, &mut Diagnostics::new());
    assert_eq!(
        keys(&native_findings),
        vec![(Some(2), "Price", "M001"), (Some(3), "Price", "M001")]
    );
}

#[test]
fn engine_reports_schema_per_field() {
    let standards = standards(native_rules());
    let emptiness = Emptiness::default();
    let codes = FindingCodes::default();
    let mandatory = fields(&["Brand"]);
    let engine = RuleEngine::new(&standards, &mandatory, &emptiness, &codes);

    let planned: Vec<(&str, RuleSchema)> = engine.fields().collect();
    assert_eq!(planned.len(), 6);
    assert_eq!(planned.last(), Some(&("Brand", RuleSchema::Native)));
}

#[test]
fn absent_columns_are_not_evaluated() {
    let standards = standards(native_rules());
    let emptiness = Emptiness::default();
    let codes = FindingCodes::default();
    let mandatory = fields(&["Content"]);
    let engine = RuleEngine::new(&standards, &mandatory, &emptiness, &codes);
    let table = table(&["Price"], &[vec!["1"]]);

    let findings = engine.execute(&table, &mut Diagnostics::new());
    assert!(findings.is_empty());
}
