//! Row-scoped anomalies that skip a check instead of aborting the run.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// A rule reads a field that is not a column.
    MissingField,
    DivisionByZero,
    UnknownReferenceList,
    /// A cross-row check lacked its columns and did not run.
    CrossCheckSkipped,
}

/// One anomaly with the number of times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Field or check the anomaly was raised for.
    pub subject: String,
    pub detail: String,
    pub first_row: Option<usize>,
    pub occurrences: usize,
}

/// Collects anomalies; each `(kind, subject)` is logged once.
#[derive(Debug, Default)]
pub struct Diagnostics {
    anomalies: BTreeMap<(AnomalyKind, String), Anomaly>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: AnomalyKind,
        subject: &str,
        row: Option<usize>,
        detail: impl Into<String>,
    ) {
        let key = (kind, subject.to_string());
        if let Some(existing) = self.anomalies.get_mut(&key) {
            existing.occurrences += 1;
            return;
        }
        let detail = detail.into();
        warn!(?kind, subject, row, %detail, "check skipped");
        self.anomalies.insert(
            key,
            Anomaly {
                kind,
                subject: subject.to_string(),
                detail,
                first_row: row,
                occurrences: 1,
            },
        );
    }

    /// Record a failed rule evaluation for `field` on `row`.
    pub fn check_failed(&mut self, row: usize, field: &str, code: &str, error: &CheckError) {
        debug!(row, field, code, %error, "rule evaluation failed");
        self.record(
            error.kind(),
            &format!("{field} [{code}]"),
            Some(row),
            error.to_string(),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.values()
    }

    pub fn into_anomalies(self) -> Vec<Anomaly> {
        self.anomalies.into_values().collect()
    }
}
