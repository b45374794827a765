//! Per-cell rule evaluation.
//!
//! The two schema generations are evaluated by independent evaluators behind
//! [`FieldEvaluator`]. The engine picks one per field when it is built and
//! never mixes them for a field.

mod legacy;
mod native;

use std::borrow::Cow;

use pricelist_model::{Finding, FindingType, Row, Table};
use pricelist_standards::{FindingCodes, ReferenceLists, RuleSchema};

use crate::diagnostics::Diagnostics;
use crate::emptiness::Emptiness;
use crate::error::CheckError;

pub use legacy::LegacyEvaluator;
pub use native::NativeEvaluator;

/// Run-wide inputs shared by every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub table: &'a Table,
    pub emptiness: &'a Emptiness,
    pub reference_lists: &'a ReferenceLists,
    pub codes: &'a FindingCodes,
}

impl EvalContext<'_> {
    /// Non-empty trimmed value of another field of the row.
    ///
    /// Fails when the field is not a column, so callers can tell a missing
    /// column from an empty cell.
    pub fn other<'r>(&self, row: &'r Row, field: &str) -> Result<Option<Cow<'r, str>>, CheckError> {
        if !self.table.has_column(field) {
            return Err(CheckError::MissingField {
                field: field.to_string(),
            });
        }
        Ok(self.emptiness.value(row, field))
    }
}

/// One cell under evaluation.
#[derive(Debug, Clone)]
pub struct Cell<'a> {
    pub row: &'a Row,
    pub field: &'a str,
    pub original_column: &'a str,
    /// Cell text as supplied; `None` for a missing cell.
    pub raw: Option<Cow<'a, str>>,
    /// Trimmed text of a non-empty cell.
    pub value: Option<Cow<'a, str>>,
    /// Member of the authoritative mandatory set.
    pub mandatory: bool,
}

impl<'a> Cell<'a> {
    pub fn new(
        row: &'a Row,
        field: &'a str,
        original_column: &'a str,
        emptiness: &Emptiness,
        mandatory: bool,
    ) -> Self {
        Self {
            row,
            field,
            original_column,
            raw: row.text(field),
            value: emptiness.value(row, field),
            mandatory,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn finding(&self, code: &str, finding_type: FindingType, message: String) -> Finding {
        Finding {
            row: Some(self.row.ordinal),
            field: self.field.to_string(),
            original_column: self.original_column.to_string(),
            value: self.raw.as_deref().map(ToString::to_string),
            message,
            code: code.to_string(),
            finding_type,
        }
    }
}

/// Evaluates the configured rules of one field against one cell.
pub trait FieldEvaluator: Send + Sync {
    fn schema(&self) -> RuleSchema;

    /// Append findings for `cell` to `out`. Failures of individual checks are
    /// recorded in `diagnostics` and produce no finding.
    fn evaluate(
        &self,
        cell: &Cell<'_>,
        ctx: &EvalContext<'_>,
        diagnostics: &mut Diagnostics,
        out: &mut Vec<Finding>,
    );
}
