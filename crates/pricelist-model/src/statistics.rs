use serde::{Deserialize, Serialize};

use crate::field::Importance;

/// Whether a field arrived as an input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPresence {
    Present,
    NotPresent,
}

/// Aggregated verdict for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// Mandatory, present, no findings.
    Correct,
    /// Mandatory, present, at least one finding.
    Incorrect,
    /// Mandatory but missing as a column.
    NotPresent,
    /// Optional field: only fill rate is reported.
    Informational,
}

/// Per-field statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    pub field: String,
    pub importance: Importance,
    pub presence: FieldPresence,
    pub status: FieldStatus,
    pub filled: usize,
    pub empty: usize,
    /// Findings recorded on this field, capped at `filled`.
    pub error_count: usize,
}

impl FieldStatistics {
    /// Share of rows with a value, in percent.
    pub fn fill_rate(&self) -> f64 {
        let total = self.filled + self.empty;
        if total == 0 {
            0.0
        } else {
            self.filled as f64 * 100.0 / total as f64
        }
    }

    /// Share of filled cells with a finding, in percent. Never exceeds 100.
    pub fn error_rate(&self) -> f64 {
        if self.filled == 0 {
            0.0
        } else {
            self.error_count as f64 * 100.0 / self.filled as f64
        }
    }
}

/// Whole-run counters for the reporting layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub rows: usize,
    pub total_findings: usize,
    pub rejections: usize,
    pub corrections: usize,
    pub flags: usize,
    pub mandatory_total: usize,
    pub mandatory_correct: usize,
    pub mandatory_incorrect: usize,
    pub mandatory_not_present: usize,
    pub optional_present: usize,
    /// Filled cells over all cells of present fields, in percent.
    pub fill_rate: f64,
}

impl RunSummary {
    pub fn has_rejections(&self) -> bool {
        self.rejections > 0
    }
}
