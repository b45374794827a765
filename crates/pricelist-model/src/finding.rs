//! Validation findings handed to the reporting layer.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome class of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingType {
    /// The row cannot be accepted as delivered.
    Rejection,
    /// The value must be corrected but the row is usable.
    Correction,
    /// Suspicious, for review only.
    Flag,
}

impl FindingType {
    /// Parse a finding type from configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rejection" | "reject" | "afkeuring" => Some(Self::Rejection),
            "correction" | "correct" | "correctie" => Some(Self::Correction),
            "flag" | "red_flag" | "warning" => Some(Self::Flag),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rejection => "Rejection",
            Self::Correction => "Correction",
            Self::Flag => "Flag",
        }
    }
}

impl fmt::Display for FindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reported validation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Row ordinal including the header offset; `None` for workbook-level findings.
    pub row: Option<usize>,
    /// Canonical field name.
    pub field: String,
    /// Header text as supplied by the workbook.
    pub original_column: String,
    pub value: Option<String>,
    pub message: String,
    pub code: String,
    pub finding_type: FindingType,
}

impl Finding {
    pub fn is_workbook_level(&self) -> bool {
        self.row.is_none()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {row}")?,
            None => f.write_str("workbook")?,
        }
        write!(
            f,
            " | {} | {} | {} | {}",
            self.field, self.code, self.finding_type, self.message
        )
    }
}

/// Sort findings into reporting order.
///
/// Workbook-level findings come first, then row ordinal, then the position
/// returned by `position_of` for the field. The sort is stable, so findings
/// for the same cell keep their emission order.
pub fn sort_findings<F>(findings: &mut [Finding], position_of: F)
where
    F: Fn(&str) -> Option<usize>,
{
    findings.sort_by(|a, b| {
        let row = a.row.cmp(&b.row);
        if row != Ordering::Equal {
            return row;
        }
        match (position_of(&a.field), position_of(&b.field)) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.field.cmp(&b.field),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(row: Option<usize>, field: &str, code: &str) -> Finding {
        Finding {
            row,
            field: field.to_string(),
            original_column: field.to_string(),
            value: None,
            message: String::new(),
            code: code.to_string(),
            finding_type: FindingType::Rejection,
        }
    }

    #[test]
    fn sort_orders_by_row_then_column_position() {
        let mut findings = vec![
            finding(Some(3), "B", "1"),
            finding(Some(2), "B", "2"),
            finding(Some(2), "A", "3"),
            finding(None, "B", "4"),
            finding(Some(2), "B", "5"),
        ];
        sort_findings(&mut findings, |field| match field {
            "A" => Some(1),
            "B" => Some(0),
            _ => None,
        });
        let codes: Vec<&str> = findings.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["4", "2", "5", "3", "1"]);
    }

    #[test]
    fn finding_type_parse() {
        assert_eq!(FindingType::parse("Rejection"), Some(FindingType::Rejection));
        assert_eq!(FindingType::parse("red_flag"), Some(FindingType::Flag));
        assert_eq!(FindingType::parse("other"), None);
    }
}
