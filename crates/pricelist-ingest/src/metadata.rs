//! Workbook metadata sidecars.
//!
//! A CSV export loses sheets and defined names. The metadata the classifier
//! reads can be supplied next to the file as JSON:
//!
//! ```json
//! {
//!   "sheets": {"TemplateContext": {"A1": "{\"mandatory_fields\": [\"Price\"]}"}},
//!   "named_ranges": ["TemplateGenerator"]
//! }
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use pricelist_model::SheetMetadata;

use crate::error::{IngestError, Result};

/// Suffix of the sidecar file discovered next to an input file.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// `prices.csv` → `prices.csv.metadata.json`.
pub fn sidecar_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(METADATA_SUFFIX);
    PathBuf::from(name)
}

/// The sidecar of `input` when it exists.
pub fn discover_metadata(input: &Path) -> Option<PathBuf> {
    let path = sidecar_path(input);
    if path.is_file() {
        debug!(path = %path.display(), "found workbook metadata sidecar");
        Some(path)
    } else {
        None
    }
}

/// Read a metadata sidecar. Cell references are upper-cased.
pub fn load_sheet_metadata(path: &Path) -> Result<SheetMetadata> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let raw: SheetMetadata =
        serde_json::from_str(&text).map_err(|source| IngestError::MetadataFormat {
            path: path.to_path_buf(),
            source,
        })?;

    let metadata = SheetMetadata {
        sheets: raw
            .sheets
            .into_iter()
            .map(|(sheet, cells)| {
                let cells = cells
                    .into_iter()
                    .map(|(reference, value)| (reference.trim().to_ascii_uppercase(), value))
                    .collect();
                (sheet, cells)
            })
            .collect(),
        named_ranges: raw.named_ranges,
    };
    debug!(
        path = %path.display(),
        sheets = metadata.sheets.len(),
        named_ranges = metadata.named_ranges.len(),
        "loaded workbook metadata"
    );
    Ok(metadata)
}
