//! Error types for price-list ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a workbook from disk.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV file has no header line.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// The configured header row lies beyond the end of the file.
    #[error("header row {header_row} not found in {path} ({records} records)")]
    HeaderRowOutOfRange {
        path: PathBuf,
        header_row: usize,
        records: usize,
    },

    // === Metadata Errors ===
    /// Metadata sidecar is not valid JSON of the expected shape.
    #[error("unexpected metadata format in {path}: {source}")]
    MetadataFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Map an IO error, keeping not-found distinct.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
