use thiserror::Error;

use crate::diagnostics::AnomalyKind;

/// Failure of one check on one row.
///
/// Never surfaces to callers: the engine records it in
/// [`Diagnostics`](crate::Diagnostics) and emits no finding for that check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("field '{field}' is not a column of this table")]
    MissingField { field: String },
    #[error("division by zero: '{divisor}' is 0")]
    DivisionByZero { divisor: String },
    #[error("reference list '{list}' is not loaded")]
    UnknownReferenceList { list: String },
}

impl CheckError {
    pub fn kind(&self) -> AnomalyKind {
        match self {
            Self::MissingField { .. } => AnomalyKind::MissingField,
            Self::DivisionByZero { .. } => AnomalyKind::DivisionByZero,
            Self::UnknownReferenceList { .. } => AnomalyKind::UnknownReferenceList,
        }
    }
}
