//! Table-level validation across rows and fields.
//!
//! These checks relate values that single-field rules cannot see:
//!
//! - **UOM relationship**: orderable/base-unit indicators constrain the two
//!   UOM codes and the orderable-unit content.
//! - **Packaging plausibility**: the packaging description should mention the
//!   content and the UOM; one workbook-level flag summarizes mismatches.
//! - **Duplicate URL**: many rows sharing one product URL, optionally judged by
//!   their chemical identifiers.
//! - **Dimension set**: related measurements filled only partially.
//!
//! A check whose columns are not all present is skipped and recorded once in
//! [`Diagnostics`]. Results do not depend on row iteration order.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info_span};

use pricelist_model::{Finding, FindingType, Row, Table};
use pricelist_standards::{
    DimensionSetCheck, DuplicateUrlCheck, FindingCodes, GlobalValidation, PackagingCheck,
    UomRelationshipCheck,
};

use crate::diagnostics::{AnomalyKind, Diagnostics};
use crate::emptiness::Emptiness;
use crate::numeric::{parse_boolean, parse_number};

/// Input for cross-row validation.
#[derive(Debug, Clone, Copy)]
pub struct CrossRowInput<'a> {
    pub table: &'a Table,
    pub checks: &'a [GlobalValidation],
    pub codes: &'a FindingCodes,
    pub emptiness: &'a Emptiness,
}

/// Run every configured check once over the table.
pub fn validate_cross_row(input: &CrossRowInput<'_>, diagnostics: &mut Diagnostics) -> Vec<Finding> {
    let span = info_span!("cross_row", checks = input.checks.len(), rows = input.table.len());
    let _guard = span.enter();

    let mut findings = Vec::new();
    for check in input.checks {
        let missing = missing_columns(input.table, check);
        if !missing.is_empty() {
            diagnostics.record(
                AnomalyKind::CrossCheckSkipped,
                check.name(),
                None,
                format!("missing columns: {}", missing.join(", ")),
            );
            continue;
        }
        let code = check.code(input.codes);
        let before = findings.len();
        match check {
            GlobalValidation::UomRelationship(uom) => {
                check_uom_relationship(input, uom, code, &mut findings);
            }
            GlobalValidation::PackagingPlausibility(packaging) => {
                check_packaging(input, packaging, code, &mut findings);
            }
            GlobalValidation::DuplicateUrl(urls) => {
                check_duplicate_urls(input, urls, code, &mut findings);
            }
            GlobalValidation::DimensionSet(dimensions) => {
                check_dimension_set(input, dimensions, code, &mut findings);
            }
        }
        debug!(
            check = check.name(),
            findings = findings.len() - before,
            "cross-row check finished"
        );
    }
    findings
}

fn required_columns(check: &GlobalValidation) -> Vec<&str> {
    match check {
        GlobalValidation::UomRelationship(uom) => vec![
            uom.orderable_flag.as_str(),
            uom.base_flag.as_str(),
            uom.orderable_uom.as_str(),
            uom.base_uom.as_str(),
            uom.content.as_str(),
        ],
        GlobalValidation::PackagingPlausibility(packaging) => vec![
            packaging.description.as_str(),
            packaging.content.as_str(),
            packaging.uom.as_str(),
        ],
        GlobalValidation::DuplicateUrl(urls) => std::iter::once(urls.url_field.as_str())
            .chain(urls.identifier_fields.iter().map(String::as_str))
            .collect(),
        GlobalValidation::DimensionSet(dimensions) => {
            dimensions.fields.iter().map(String::as_str).collect()
        }
    }
}

fn missing_columns<'c>(table: &Table, check: &'c GlobalValidation) -> Vec<&'c str> {
    required_columns(check)
        .into_iter()
        .filter(|field| !table.has_column(field))
        .collect()
}

fn row_finding(
    table: &Table,
    row: &Row,
    field: &str,
    code: &str,
    finding_type: FindingType,
    message: String,
) -> Finding {
    Finding {
        row: Some(row.ordinal),
        field: field.to_string(),
        original_column: table.original_name(field).to_string(),
        value: row.text(field).map(|value| value.into_owned()),
        message,
        code: code.to_string(),
        finding_type,
    }
}

fn check_uom_relationship(
    input: &CrossRowInput<'_>,
    check: &UomRelationshipCheck,
    code: &str,
    findings: &mut Vec<Finding>,
) {
    let emptiness = input.emptiness;
    for row in &input.table.rows {
        let flag = |field: &str| {
            emptiness
                .value(row, field)
                .and_then(|value| parse_boolean(&value))
        };
        let (Some(orderable), Some(base)) = (flag(&check.orderable_flag), flag(&check.base_flag))
        else {
            continue;
        };
        if !orderable && !base {
            continue;
        }
        let both = orderable && base;
        let orderable_uom = emptiness.value(row, &check.orderable_uom);
        let base_uom = emptiness.value(row, &check.base_uom);
        if let (Some(orderable_uom), Some(base_uom)) = (&orderable_uom, &base_uom) {
            let same = orderable_uom.eq_ignore_ascii_case(base_uom);
            if both && !same {
                findings.push(row_finding(
                    input.table,
                    row,
                    &check.orderable_uom,
                    code,
                    check.finding_type,
                    check.message.clone().unwrap_or_else(|| {
                        format!(
                            "{} '{orderable_uom}' must equal {} '{base_uom}' when the article is both orderable and base unit",
                            check.orderable_uom, check.base_uom
                        )
                    }),
                ));
            } else if !both && same {
                findings.push(row_finding(
                    input.table,
                    row,
                    &check.orderable_uom,
                    code,
                    check.finding_type,
                    check.message.clone().unwrap_or_else(|| {
                        format!(
                            "{} must differ from {} when only one unit indicator is set",
                            check.orderable_uom, check.base_uom
                        )
                    }),
                ));
            }
        }
        let content_is_one = emptiness
            .value(row, &check.content)
            .and_then(|value| parse_number(&value))
            .map(|content| (content - 1.0).abs() < f64::EPSILON);
        match content_is_one {
            Some(false) if both => findings.push(row_finding(
                input.table,
                row,
                &check.content,
                code,
                check.finding_type,
                check.message.clone().unwrap_or_else(|| {
                    format!(
                        "{} must be 1 when the article is both orderable and base unit",
                        check.content
                    )
                }),
            )),
            Some(true) if !both => findings.push(row_finding(
                input.table,
                row,
                &check.content,
                code,
                check.finding_type,
                check.message.clone().unwrap_or_else(|| {
                    format!(
                        "{} must not be 1 when only one unit indicator is set",
                        check.content
                    )
                }),
            )),
            _ => {}
        }
    }
}

fn check_packaging(
    input: &CrossRowInput<'_>,
    check: &PackagingCheck,
    code: &str,
    findings: &mut Vec<Finding>,
) {
    let emptiness = input.emptiness;
    let mut checked = 0usize;
    let mut mismatched = 0usize;
    for row in &input.table.rows {
        let (Some(description), Some(content), Some(uom)) = (
            emptiness.value(row, &check.description),
            emptiness.value(row, &check.content),
            emptiness.value(row, &check.uom),
        ) else {
            continue;
        };
        checked += 1;
        let description = description.to_lowercase();
        let content_text = match parse_number(&content) {
            Some(number) if number.fract() == 0.0 => format!("{}", number as i64),
            _ => content.to_lowercase(),
        };
        if !(description.contains(&content_text) && description.contains(&uom.to_lowercase())) {
            mismatched += 1;
        }
    }
    if mismatched == 0 {
        return;
    }
    findings.push(Finding {
        row: None,
        field: check.description.clone(),
        original_column: input.table.original_name(&check.description).to_string(),
        value: None,
        message: format!(
            "{mismatched} of {checked} rows do not mention {} and {} in {}",
            check.content, check.uom, check.description
        ),
        code: code.to_string(),
        finding_type: check.finding_type,
    });
}

fn check_duplicate_urls(
    input: &CrossRowInput<'_>,
    check: &DuplicateUrlCheck,
    code: &str,
    findings: &mut Vec<Finding>,
) {
    let emptiness = input.emptiness;
    let mut groups: BTreeMap<String, Vec<&Row>> = BTreeMap::new();
    for row in &input.table.rows {
        if let Some(url) = emptiness.value(row, &check.url_field) {
            groups.entry(url.into_owned()).or_default().push(row);
        }
    }

    for rows in groups.into_values() {
        if rows.len() < check.threshold {
            continue;
        }
        let reason = if check.is_chemical_aware() {
            match identifier_verdict(emptiness, &rows, &check.identifier_fields) {
                IdentifierVerdict::Inconsistent => "with inconsistent chemical identifiers",
                IdentifierVerdict::AllEmpty => "without chemical identifiers",
                IdentifierVerdict::Consistent => continue,
            }
        } else {
            "which suggests a generic landing page"
        };
        debug!(rows = rows.len(), "suspicious shared URL");
        for row in &rows {
            findings.push(row_finding(
                input.table,
                row,
                &check.url_field,
                code,
                check.finding_type,
                format!(
                    "{} is shared by {} rows {reason}",
                    check.url_field,
                    rows.len()
                ),
            ));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentifierVerdict {
    /// Some identifier field has two different non-empty values.
    Inconsistent,
    /// No row fills any identifier field.
    AllEmpty,
    /// Identical or compatible partial identifiers.
    Consistent,
}

/// Inconsistency takes precedence over emptiness; everything else passes.
fn identifier_verdict(emptiness: &Emptiness, rows: &[&Row], fields: &[String]) -> IdentifierVerdict {
    let mut any_filled = false;
    for field in fields {
        let distinct: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| emptiness.value(row, field))
            .map(|value| value.to_uppercase())
            .collect();
        if distinct.len() > 1 {
            return IdentifierVerdict::Inconsistent;
        }
        any_filled |= !distinct.is_empty();
    }
    if any_filled {
        IdentifierVerdict::Consistent
    } else {
        IdentifierVerdict::AllEmpty
    }
}

fn check_dimension_set(
    input: &CrossRowInput<'_>,
    check: &DimensionSetCheck,
    code: &str,
    findings: &mut Vec<Finding>,
) {
    let emptiness = input.emptiness;
    for row in &input.table.rows {
        let empty: Vec<&str> = check
            .fields
            .iter()
            .map(String::as_str)
            .filter(|field| !emptiness.is_filled(row, field))
            .collect();
        let Some(first_empty) = empty.first() else {
            continue;
        };
        if empty.len() == check.fields.len() {
            continue;
        }
        findings.push(row_finding(
            input.table,
            row,
            first_empty,
            code,
            check.finding_type,
            format!(
                "Incomplete dimension set: {} of {} filled, missing {}",
                check.fields.len() - empty.len(),
                check.fields.len(),
                empty.join(", ")
            ),
        ));
    }
}
