//! Price-list validation data model.
//!
//! Shared types passed between the header resolver, the rule engine, the
//! cross-row validators and the aggregator. Nothing here performs I/O.

#![deny(unsafe_code)]

pub mod error;
pub mod field;
pub mod finding;
pub mod statistics;
pub mod table;
pub mod template;
pub mod workbook;

pub use error::WorkbookError;
pub use field::{FormatHint, Importance, duplicate_name};
pub use finding::{Finding, FindingType, sort_findings};
pub use statistics::{FieldPresence, FieldStatistics, FieldStatus, RunSummary};
pub use table::{CellValue, RawColumn, Row, Table, TableColumn};
pub use template::{TemplateContext, TemplateKind};
pub use workbook::{CellRef, MemoryWorkbook, SheetMetadata, Workbook};
