//! Workbook abstraction consumed by the pipeline.
//!
//! The pipeline only needs ordered header names, row-major cell values and a
//! few workbook-level lookups used for template classification. Adapters for
//! concrete file formats live at the edges (see `pricelist-ingest`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkbookError};
use crate::table::CellValue;

/// An A1-style cell coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Zero-based column index.
    pub column: usize,
    /// Zero-based row index.
    pub row: usize,
}

impl CellRef {
    /// Parse an A1-style reference such as `B12`.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || WorkbookError::InvalidCellRef {
            reference: reference.to_string(),
        };
        let trimmed = reference.trim().to_ascii_uppercase();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(invalid());
        }
        let row: usize = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        let column = letters
            .bytes()
            .try_fold(0usize, |acc, b| {
                acc.checked_mul(26)?.checked_add(usize::from(b - b'A' + 1))
            })
            .ok_or_else(invalid)?;
        Ok(Self {
            column: column - 1,
            row: row - 1,
        })
    }

    /// Canonical A1 notation.
    pub fn to_a1(&self) -> String {
        let mut letters = Vec::new();
        let mut n = self.column + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + rem as u8));
            n = (n - 1) / 26;
        }
        letters.reverse();
        format!("{}{}", letters.into_iter().collect::<String>(), self.row + 1)
    }
}

/// Read-only view of a workbook's data sheet and metadata.
pub trait Workbook {
    /// Header names in column order, exactly as supplied.
    fn column_names(&self) -> &[String];

    /// Data rows below the header, row-major, positionally aligned with
    /// [`Workbook::column_names`].
    fn rows(&self) -> &[Vec<CellValue>];

    /// One-based sheet row of the header line.
    fn header_row(&self) -> usize {
        1
    }

    /// Whether a sheet with this name exists (hidden sheets included).
    fn has_sheet(&self, name: &str) -> Result<bool>;

    /// Text of a cell on any sheet; `Ok(None)` when the sheet or cell is empty.
    fn sheet_cell(&self, sheet: &str, cell: &CellRef) -> Result<Option<String>>;

    /// Workbook-level defined names.
    fn named_ranges(&self) -> Result<Vec<String>>;
}

/// Workbook-level metadata for [`MemoryWorkbook`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    /// Sheet name to `A1 reference -> text`.
    #[serde(default)]
    pub sheets: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub named_ranges: Vec<String>,
}

impl SheetMetadata {
    pub fn with_cell(mut self, sheet: &str, reference: &str, value: &str) -> Self {
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .insert(reference.to_ascii_uppercase(), value.to_string());
        self
    }

    pub fn with_named_range(mut self, name: &str) -> Self {
        self.named_ranges.push(name.to_string());
        self
    }
}

/// Fully materialized in-memory workbook.
#[derive(Debug, Clone)]
pub struct MemoryWorkbook {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    header_row: usize,
    metadata: std::result::Result<SheetMetadata, String>,
}

impl MemoryWorkbook {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns,
            rows,
            header_row: 1,
            metadata: Ok(SheetMetadata::default()),
        }
    }

    /// Convenience constructor from string literals; empty strings become missing cells.
    pub fn from_strings(columns: &[&str], rows: &[Vec<&str>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| {
                        if value.is_empty() {
                            CellValue::Missing
                        } else {
                            CellValue::from(*value)
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(columns.iter().map(ToString::to_string).collect(), rows)
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row.max(1);
        self
    }

    pub fn with_metadata(mut self, metadata: SheetMetadata) -> Self {
        self.metadata = Ok(metadata);
        self
    }

    /// Mark the workbook metadata as unreadable; every lookup then fails.
    pub fn with_corrupt_metadata(mut self, reason: impl Into<String>) -> Self {
        self.metadata = Err(reason.into());
        self
    }

    fn metadata(&self) -> Result<&SheetMetadata> {
        self.metadata
            .as_ref()
            .map_err(|reason| WorkbookError::CorruptMetadata {
                reason: reason.clone(),
            })
    }
}

impl Workbook for MemoryWorkbook {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    fn header_row(&self) -> usize {
        self.header_row
    }

    fn has_sheet(&self, name: &str) -> Result<bool> {
        Ok(self.metadata()?.sheets.contains_key(name))
    }

    fn sheet_cell(&self, sheet: &str, cell: &CellRef) -> Result<Option<String>> {
        let metadata = self.metadata()?;
        Ok(metadata
            .sheets
            .get(sheet)
            .and_then(|cells| cells.get(&cell.to_a1()))
            .filter(|value| !value.trim().is_empty())
            .cloned())
    }

    fn named_ranges(&self) -> Result<Vec<String>> {
        Ok(self.metadata()?.named_ranges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ref_parses_a1_notation() {
        assert_eq!(CellRef::parse("A1").unwrap(), CellRef { column: 0, row: 0 });
        assert_eq!(CellRef::parse("b12").unwrap(), CellRef { column: 1, row: 11 });
        assert_eq!(CellRef::parse("AA3").unwrap(), CellRef { column: 26, row: 2 });
        assert_eq!(CellRef::parse("AA3").unwrap().to_a1(), "AA3");
        assert!(CellRef::parse("A0").is_err());
        assert!(CellRef::parse("12").is_err());
        assert!(CellRef::parse("").is_err());
    }

    #[test]
    fn overlong_column_letters_are_rejected() {
        assert!(matches!(
            CellRef::parse("ZZZZZZZZZZZZZZZZ1"),
            Err(WorkbookError::InvalidCellRef { .. })
        ));
    }

    #[test]
    fn corrupt_metadata_fails_every_lookup() {
        let workbook = MemoryWorkbook::from_strings(&["A"], &[]).with_corrupt_metadata("zip");
        assert!(workbook.has_sheet("X").is_err());
        assert!(workbook.named_ranges().is_err());
        let cell = CellRef::parse("A1").unwrap();
        assert!(workbook.sheet_cell("X", &cell).is_err());
    }

    #[test]
    fn sheet_cells_are_looked_up_case_insensitively_by_reference() {
        let workbook = MemoryWorkbook::from_strings(&["A"], &[])
            .with_metadata(SheetMetadata::default().with_cell("Meta", "a1", "{}"));
        let cell = CellRef::parse("A1").unwrap();
        assert_eq!(
            workbook.sheet_cell("Meta", &cell).unwrap().as_deref(),
            Some("{}")
        );
        assert!(workbook.has_sheet("Meta").unwrap());
        assert!(!workbook.has_sheet("Other").unwrap());
    }
}
