//! Field statistics and run summaries.

mod common;

use pricelist_model::{FieldPresence, FieldStatus, Finding, FindingType, Importance};
use pricelist_validate::{Emptiness, aggregate};
use proptest::prelude::*;
use serde_json::json;

use common::{fields, standards, table};

fn finding(row: usize, field: &str, finding_type: FindingType) -> Finding {
    Finding {
        row: Some(row),
        field: field.to_string(),
        original_column: field.to_string(),
        value: None,
        message: "bad".to_string(),
        code: "T01".to_string(),
        finding_type,
    }
}

fn known_fields() -> pricelist_standards::Standards {
    standards(json!({
        "field_validations": {
            "Price": [{"condition": "not_numeric", "code": "P01"}],
            "Brand": [],
            "Color": []
        }
    }))
}

#[test]
fn error_count_is_capped_at_filled_cells() {
    let table = table(
        &["Price"],
        &[vec!["a"], vec!["b"], vec!["c"], vec![""], vec![""]],
    );
    let findings: Vec<Finding> = (2..7)
        .map(|row| finding(row, "Price", FindingType::Rejection))
        .collect();

    let result = aggregate(
        &findings,
        &table,
        &known_fields(),
        &fields(&["Price"]),
        &Emptiness::default(),
    );

    let price = result.field("Price").expect("price stats");
    assert_eq!(price.filled, 3);
    assert_eq!(price.empty, 2);
    assert_eq!(price.error_count, 3);
    assert_eq!(price.status, FieldStatus::Incorrect);
    assert!((price.error_rate() - 100.0).abs() < f64::EPSILON);
}

#[test]
fn mandatory_and_optional_fields_are_classified() {
    let table = table(
        &["Price", "Color", "Internal Note"],
        &[vec!["1", "red", "x"], vec!["2", "", "y"]],
    );
    let findings = vec![
        finding(2, "Color", FindingType::Flag),
        Finding {
            row: None,
            ..finding(0, "Price", FindingType::Correction)
        },
    ];

    let result = aggregate(
        &findings,
        &table,
        &known_fields(),
        &fields(&["Brand", "Price"]),
        &Emptiness::default(),
    );

    let names: Vec<&str> = result.statistics.iter().map(|s| s.field.as_str()).collect();
    assert_eq!(names, vec!["Brand", "Price", "Color"]);

    let brand = result.field("Brand").expect("brand");
    assert_eq!(brand.presence, FieldPresence::NotPresent);
    assert_eq!(brand.status, FieldStatus::NotPresent);

    let price = result.field("Price").expect("price");
    assert_eq!(price.status, FieldStatus::Incorrect);
    assert_eq!(price.error_count, 1);

    let color = result.field("Color").expect("color");
    assert_eq!(color.importance, Importance::Optional);
    assert_eq!(color.status, FieldStatus::Informational);
    assert_eq!(color.filled, 1);

    let summary = &result.summary;
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.total_findings, 2);
    assert_eq!(summary.flags, 1);
    assert_eq!(summary.corrections, 1);
    assert_eq!(summary.rejections, 0);
    assert_eq!(summary.mandatory_total, 2);
    assert_eq!(summary.mandatory_incorrect, 1);
    assert_eq!(summary.mandatory_not_present, 1);
    assert_eq!(summary.optional_present, 1);
    assert!((summary.fill_rate - 75.0).abs() < 1e-9);
}

#[test]
fn clean_mandatory_field_is_correct() {
    let table = table(&["Price"], &[vec!["1"]]);
    let result = aggregate(
        &[],
        &table,
        &known_fields(),
        &fields(&["Price"]),
        &Emptiness::default(),
    );
    assert_eq!(result.summary.mandatory_correct, 1);
    assert_eq!(result.summary.total_findings, 0);
}

proptest! {
    #[test]
    fn error_count_never_exceeds_filled(
        cells in prop::collection::vec(prop::bool::ANY, 1..20),
        extra in 0usize..40,
    ) {
        let rows: Vec<Vec<&str>> = cells
            .iter()
            .map(|filled| vec![if *filled { "x" } else { "" }])
            .collect();
        let table = table(&["Price"], &rows);
        let findings: Vec<Finding> = (0..extra)
            .map(|idx| finding(idx + 2, "Price", FindingType::Rejection))
            .collect();

        let result = aggregate(
            &findings,
            &table,
            &known_fields(),
            &fields(&["Price"]),
            &Emptiness::default(),
        );
        let price = result.field("Price").expect("price");
        prop_assert!(price.error_count <= price.filled);
        prop_assert!(price.error_rate() <= 100.0);
        prop_assert_eq!(price.filled + price.empty, cells.len());
        prop_assert_eq!(price.status == FieldStatus::Incorrect, extra > 0);
    }
}
