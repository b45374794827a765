//! End-to-end validation of one workbook.
//!
//! # Stage order
//!
//! 1. Truncate to `max_rows` and strip leading blank rows
//! 2. Resolve headers and build the [`Table`]
//! 3. Classify the template and resolve the mandatory set
//! 4. Per-row rule evaluation
//! 5. Cross-row validation
//! 6. Sort findings and aggregate
//!
//! Nothing in here fails: configuration errors surface when the standards and
//! options are loaded, and row-level anomalies end up in
//! [`ValidationOutcome::anomalies`].

use serde::Serialize;
use tracing::{info, info_span, warn};

use pricelist_map::{HeaderResolution, build_resolution_table, resolve_headers};
use pricelist_model::{
    CellValue, FieldStatistics, Finding, FindingType, RawColumn, RunSummary, Table,
    TemplateContext, Workbook, sort_findings,
};
use pricelist_standards::{Standards, ValidatorOptions};
use pricelist_validate::{
    Anomaly, CrossRowInput, Diagnostics, Emptiness, RuleEngine, aggregate, validate_cross_row,
};

use crate::classifier::classify_template;
use crate::mandatory::{MandatoryFieldSet, resolve_mandatory_fields};

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    /// Workbook-level findings first, then by row and column position.
    pub findings: Vec<Finding>,
    pub statistics: Vec<FieldStatistics>,
    pub summary: RunSummary,
    pub mandatory: MandatoryFieldSet,
    pub context: TemplateContext,
    pub headers: HeaderResolution,
    /// Added to a zero-based data row index to get the reported row number.
    pub header_offset: usize,
    /// Rows were dropped because the workbook exceeded `max_rows`.
    pub truncated: bool,
    /// Data rows in the workbook before truncation.
    pub source_rows: usize,
    pub anomalies: Vec<Anomaly>,
}

impl ValidationOutcome {
    pub fn rejections(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.finding_type == FindingType::Rejection)
    }

    pub fn has_rejections(&self) -> bool {
        self.rejections().next().is_some()
    }
}

/// Validate a workbook against loaded standards.
pub fn validate_workbook(
    workbook: &dyn Workbook,
    standards: &Standards,
    options: &ValidatorOptions,
) -> ValidationOutcome {
    let all_rows = workbook.rows();
    let span = info_span!(
        "validate_workbook",
        rows = all_rows.len(),
        columns = workbook.column_names().len(),
        schema = standards.schema().label()
    );
    let _guard = span.enter();

    let source_rows = all_rows.len();
    let truncated = source_rows > options.max_rows;
    let rows = if truncated {
        warn!(
            rows = source_rows,
            max_rows = options.max_rows,
            "workbook exceeds the row limit, validating the first rows only"
        );
        &all_rows[..options.max_rows]
    } else {
        all_rows
    };
    let stripped = rows.iter().take_while(|row| is_blank_row(row)).count();
    let rows = &rows[stripped..];
    let header_offset = workbook.header_row() + 1 + stripped;

    let raw_columns: Vec<RawColumn> = workbook
        .column_names()
        .iter()
        .enumerate()
        .map(|(position, name)| RawColumn::new(name.clone(), position))
        .collect();
    let resolution_table = build_resolution_table(standards.alternative_entries());
    let headers = resolve_headers(&raw_columns, &resolution_table, &options.ignore_prefixes);
    let table = Table::from_cells(headers.columns.clone(), rows, header_offset);
    let columns: Vec<&str> = headers.column_names().collect();

    let context = classify_template(workbook, &columns, &options.classifier);
    let mandatory = resolve_mandatory_fields(&context, standards, &columns);

    let emptiness = Emptiness::from_options(options);
    let mut diagnostics = Diagnostics::new();
    let engine = RuleEngine::new(standards, &mandatory.fields, &emptiness, &options.codes);
    let mut findings = engine.execute(&table, &mut diagnostics);

    let checks = standards.global_validations(&options.cross_checks);
    findings.extend(validate_cross_row(
        &CrossRowInput {
            table: &table,
            checks: &*checks,
            codes: &options.codes,
            emptiness: &emptiness,
        },
        &mut diagnostics,
    ));

    sort_findings(&mut findings, |field| table.position_of(field));
    let aggregation = aggregate(&findings, &table, standards, &mandatory.fields, &emptiness);

    info!(
        template = context.template_kind.label(),
        rows = table.len(),
        findings = findings.len(),
        rejections = aggregation.summary.rejections,
        anomalies = diagnostics.len(),
        "validation finished"
    );

    ValidationOutcome {
        findings,
        statistics: aggregation.statistics,
        summary: aggregation.summary,
        mandatory,
        context,
        headers,
        header_offset,
        truncated,
        source_rows,
        anomalies: diagnostics.into_anomalies(),
    }
}

fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter()
        .all(|cell| cell.as_text().is_none_or(|text| text.trim().is_empty()))
}
