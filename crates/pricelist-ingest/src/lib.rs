//! Price-list ingestion.
//!
//! Reads supplier files into a [`pricelist_model::MemoryWorkbook`]:
//!
//! - **CSV**: explicit header row, delimiter sniffing, blank headers named
//!   `Unnamed: <position>`
//! - **Metadata sidecar**: sheets and named ranges a CSV export cannot carry
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pricelist_ingest::{CsvOptions, load_workbook};
//!
//! let workbook = load_workbook(Path::new("prices.csv"), &CsvOptions::default(), None)?;
//! ```

#![deny(unsafe_code)]

mod error;
mod metadata;
mod reader;

use std::path::Path;

use pricelist_model::MemoryWorkbook;
use tracing::warn;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{CsvOptions, read_csv_workbook, unnamed_column};

// === Metadata ===
pub use metadata::{METADATA_SUFFIX, discover_metadata, load_sheet_metadata, sidecar_path};

/// Read a CSV workbook and attach its metadata.
///
/// `metadata` overrides the sidecar discovered next to `path`. A metadata file
/// that exists but cannot be read or parsed does not fail the run: the
/// workbook is marked as having corrupt metadata, which classifies it as an
/// alternative template. An explicit `metadata` path that does not exist is an
/// error.
pub fn load_workbook(
    path: &Path,
    options: &CsvOptions,
    metadata: Option<&Path>,
) -> Result<MemoryWorkbook> {
    let workbook = read_csv_workbook(path, options)?;
    if let Some(explicit) = metadata
        && !explicit.is_file()
    {
        return Err(IngestError::FileNotFound {
            path: explicit.to_path_buf(),
        });
    }
    let sidecar = metadata
        .map(Path::to_path_buf)
        .or_else(|| discover_metadata(path));
    let Some(sidecar) = sidecar else {
        return Ok(workbook);
    };
    match load_sheet_metadata(&sidecar) {
        Ok(metadata) => Ok(workbook.with_metadata(metadata)),
        Err(error) => {
            warn!(
                path = %sidecar.display(),
                %error,
                "workbook metadata unreadable, template markers ignored"
            );
            Ok(workbook.with_corrupt_metadata(error.to_string()))
        }
    }
}
