use thiserror::Error;

/// Errors raised while probing workbook-level metadata.
///
/// Cell data itself is always materialized before the pipeline runs; these
/// errors only concern sheets, named ranges and stamped cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkbookError {
    #[error("workbook metadata is unreadable: {reason}")]
    CorruptMetadata { reason: String },

    #[error("invalid cell reference '{reference}'")]
    InvalidCellRef { reference: String },
}

pub type Result<T> = std::result::Result<T, WorkbookError>;
