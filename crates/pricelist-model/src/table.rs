//! Tabular input after header resolution.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A single cell as read from the workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    /// Textual form of the cell, `None` for missing cells.
    ///
    /// Whole numbers render without a fractional part so that `1.0` read from
    /// a spreadsheet compares equal to the literal `"1"`.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(value) => Some(Cow::Borrowed(value.as_str())),
            Self::Number(value) => Some(Cow::Owned(format_number(*value))),
            Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<&str>> for CellValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Self::from)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A column header exactly as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    /// Zero-based column position.
    pub position: usize,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// A resolved column of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Canonical (or identity-fallback) field name.
    pub name: String,
    /// Header text as supplied.
    pub original_name: String,
    pub position: usize,
}

/// One data row keyed by resolved field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    /// Reported row number: zero-based index plus the header offset.
    pub ordinal: usize,
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(ordinal: usize) -> Self {
        Self {
            ordinal,
            cells: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(field.into(), value.into());
        self
    }

    /// Raw text of a field, `None` when the column is missing or the cell is empty.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.cells.get(field).and_then(CellValue::as_text)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.cells.contains_key(field)
    }
}

/// Row-major table with resolved column names.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Row>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.name.clone(), idx))
            .collect();
        Self {
            columns,
            rows: Vec::new(),
            index,
        }
    }

    /// Build a table from resolved columns and positional cell rows.
    ///
    /// Row ordinals are `index + header_offset`.
    pub fn from_cells(
        columns: Vec<TableColumn>,
        cells: &[Vec<CellValue>],
        header_offset: usize,
    ) -> Self {
        let mut table = Self::new(columns);
        for (idx, raw) in cells.iter().enumerate() {
            let mut row = Row::new(idx + header_offset);
            for column in &table.columns {
                let value = raw
                    .get(column.position)
                    .cloned()
                    .unwrap_or(CellValue::Missing);
                row.cells.insert(column.name.clone(), value);
            }
            table.rows.push(row);
        }
        table
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    pub fn column(&self, field: &str) -> Option<&TableColumn> {
        self.index.get(field).map(|idx| &self.columns[*idx])
    }

    /// Input position of a field, used for stable finding order.
    pub fn position_of(&self, field: &str) -> Option<usize> {
        self.column(field).map(|column| column.position)
    }

    /// Header text the supplier used for a field; falls back to the field name.
    pub fn original_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.column(field)
            .map_or(field, |column| column.original_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, original: &str, position: usize) -> TableColumn {
        TableColumn {
            name: name.to_string(),
            original_name: original.to_string(),
            position,
        }
    }

    #[test]
    fn number_cells_render_without_trailing_zero() {
        assert_eq!(CellValue::Number(1.0).as_text().unwrap(), "1");
        assert_eq!(CellValue::Number(2.5).as_text().unwrap(), "2.5");
        assert!(CellValue::Missing.as_text().is_none());
    }

    #[test]
    fn from_cells_applies_header_offset() {
        let table = Table::from_cells(
            vec![column("Price", "Prijs", 1), column("GTIN", "EAN", 0)],
            &[
                vec![CellValue::from("8712345678906"), CellValue::from("1,50")],
                vec![CellValue::Missing],
            ],
            2,
        );
        assert_eq!(table.rows[0].ordinal, 2);
        assert_eq!(table.rows[1].ordinal, 3);
        assert_eq!(table.rows[0].text("Price").unwrap(), "1,50");
        assert_eq!(table.rows[1].cells["Price"], CellValue::Missing);
        assert_eq!(table.original_name("Price"), "Prijs");
        assert_eq!(table.original_name("Unknown"), "Unknown");
        assert_eq!(table.position_of("GTIN"), Some(0));
    }
}
