//! CSV file reading with explicit header row configuration.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use pricelist_model::{CellValue, MemoryWorkbook};

use crate::error::{IngestError, Result};

/// Delimiters considered when none is configured.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// How to read a CSV price list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter; sniffed from the header line when `None`.
    pub delimiter: Option<u8>,
    /// One-based record holding the header line. Records above it are skipped.
    pub header_row: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            header_row: 1,
        }
    }
}

/// Name given to a column whose header cell is blank.
pub fn unnamed_column(position: usize) -> String {
    format!("Unnamed: {position}")
}

/// Read a CSV file into a [`MemoryWorkbook`].
///
/// Cells are kept as text; empty cells become [`CellValue::Missing`]. A
/// leading UTF-8 byte-order mark is dropped.
pub fn read_csv_workbook(path: &Path, options: &CsvOptions) -> Result<MemoryWorkbook> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let text = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| sniff_delimiter(text));
    debug!(path = %path.display(), delimiter = %char::from(delimiter), "reading CSV");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text);

    let header_row = options.header_row.max(1);
    let mut records = reader.records();
    let mut seen = 0usize;
    let header = loop {
        let Some(record) = records.next() else {
            if seen == 0 {
                return Err(IngestError::EmptyCsv {
                    path: path.to_path_buf(),
                });
            }
            return Err(IngestError::HeaderRowOutOfRange {
                path: path.to_path_buf(),
                header_row,
                records: seen,
            });
        };
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        seen += 1;
        if seen == header_row {
            break record;
        }
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(position, name)| {
            if name.trim().is_empty() {
                unnamed_column(position)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    let mut overlong = 0usize;
    for record in records {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() > columns.len() {
            overlong += 1;
        }
        rows.push(
            record
                .iter()
                .take(columns.len())
                .map(|value| {
                    if value.is_empty() {
                        CellValue::Missing
                    } else {
                        CellValue::from(value)
                    }
                })
                .collect::<Vec<_>>(),
        );
    }
    if overlong > 0 {
        warn!(
            path = %path.display(),
            rows = overlong,
            "rows with more cells than header columns, extra cells ignored"
        );
    }

    info!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        header_row,
        "loaded CSV price list"
    );
    Ok(MemoryWorkbook::new(columns, rows).with_header_row(header_row))
}

/// Pick the candidate delimiter occurring most often on the first line.
fn sniff_delimiter(text: &[u8]) -> u8 {
    let first_line = text
        .split(|byte| *byte == b'\n')
        .find(|line| !line.iter().all(u8::is_ascii_whitespace))
        .unwrap_or_default();
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .map(|delimiter| {
            let count = first_line.iter().filter(|byte| **byte == delimiter).count();
            (count, delimiter)
        })
        .filter(|(count, _)| *count > 0)
        .max_by_key(|(count, _)| *count)
        .map_or(b',', |(_, delimiter)| delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_semicolons() {
        assert_eq!(sniff_delimiter(b"\nPrice;Currency;Brand\n1,5;EUR;Acme"), b';');
        assert_eq!(sniff_delimiter(b"Price\tCurrency"), b'\t');
        assert_eq!(sniff_delimiter(b"Price"), b',');
        assert_eq!(sniff_delimiter(b""), b',');
    }
}
