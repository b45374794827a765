//! Reduce findings into per-field statistics and a run summary.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use pricelist_model::{
    FieldPresence, FieldStatistics, FieldStatus, Finding, FindingType, Importance, RunSummary,
    Table,
};
use pricelist_standards::Standards;

use crate::emptiness::Emptiness;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    /// Mandatory fields first (mandatory-set order), then present optional
    /// fields in column order.
    pub statistics: Vec<FieldStatistics>,
    pub summary: RunSummary,
}

impl Aggregation {
    pub fn field(&self, name: &str) -> Option<&FieldStatistics> {
        self.statistics.iter().find(|stats| stats.field == name)
    }
}

/// Aggregate one run.
///
/// Every mandatory field gets statistics whether or not it is a column.
/// Optional fields are reported when present and known to the standards.
/// A field's error count is capped at its filled count.
pub fn aggregate(
    findings: &[Finding],
    table: &Table,
    standards: &Standards,
    mandatory_fields: &[String],
    emptiness: &Emptiness,
) -> Aggregation {
    let mut raw_counts: HashMap<&str, usize> = HashMap::new();
    for finding in findings {
        *raw_counts.entry(finding.field.as_str()).or_default() += 1;
    }

    let mandatory: BTreeSet<&str> = mandatory_fields.iter().map(String::as_str).collect();
    let mut statistics = Vec::new();

    for field in mandatory_fields {
        if !table.has_column(field) {
            statistics.push(FieldStatistics {
                field: field.clone(),
                importance: Importance::Mandatory,
                presence: FieldPresence::NotPresent,
                status: FieldStatus::NotPresent,
                filled: 0,
                empty: table.len(),
                error_count: 0,
            });
            continue;
        }
        let raw = raw_counts.get(field.as_str()).copied().unwrap_or(0);
        let status = if raw == 0 {
            FieldStatus::Correct
        } else {
            FieldStatus::Incorrect
        };
        statistics.push(present_stats(
            field,
            Importance::Mandatory,
            status,
            raw,
            table,
            emptiness,
        ));
    }

    for column in &table.columns {
        let field = column.name.as_str();
        if mandatory.contains(field) || !standards.is_known_field(field) {
            continue;
        }
        let raw = raw_counts.get(field).copied().unwrap_or(0);
        statistics.push(present_stats(
            field,
            Importance::Optional,
            FieldStatus::Informational,
            raw,
            table,
            emptiness,
        ));
    }

    let summary = summarize(findings, &statistics, table.len());
    Aggregation {
        statistics,
        summary,
    }
}

fn present_stats(
    field: &str,
    importance: Importance,
    status: FieldStatus,
    raw_findings: usize,
    table: &Table,
    emptiness: &Emptiness,
) -> FieldStatistics {
    let filled = table
        .rows
        .iter()
        .filter(|row| emptiness.is_filled(row, field))
        .count();
    FieldStatistics {
        field: field.to_string(),
        importance,
        presence: FieldPresence::Present,
        status,
        filled,
        empty: table.len() - filled,
        error_count: raw_findings.min(filled),
    }
}

fn summarize(findings: &[Finding], statistics: &[FieldStatistics], rows: usize) -> RunSummary {
    let mut summary = RunSummary {
        rows,
        total_findings: findings.len(),
        ..RunSummary::default()
    };
    for finding in findings {
        match finding.finding_type {
            FindingType::Rejection => summary.rejections += 1,
            FindingType::Correction => summary.corrections += 1,
            FindingType::Flag => summary.flags += 1,
        }
    }
    let mut filled_cells = 0usize;
    let mut total_cells = 0usize;
    for stats in statistics {
        match (stats.importance, stats.status) {
            (Importance::Mandatory, FieldStatus::Correct) => summary.mandatory_correct += 1,
            (Importance::Mandatory, FieldStatus::Incorrect) => summary.mandatory_incorrect += 1,
            (Importance::Mandatory, FieldStatus::NotPresent) => summary.mandatory_not_present += 1,
            (Importance::Optional, _) => summary.optional_present += 1,
            (Importance::Mandatory, FieldStatus::Informational) => {}
        }
        if stats.importance == Importance::Mandatory {
            summary.mandatory_total += 1;
        }
        if stats.presence == FieldPresence::Present {
            filled_cells += stats.filled;
            total_cells += stats.filled + stats.empty;
        }
    }
    summary.fill_rate = if total_cells == 0 {
        0.0
    } else {
        filled_cells as f64 * 100.0 / total_cells as f64
    };
    summary
}
