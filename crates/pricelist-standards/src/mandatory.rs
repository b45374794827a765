//! Mandatory-field configuration: the baseline set and institution extras.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, StandardsError};

/// Built-in baseline used when `mandatory_baseline.json` is missing or
/// unreadable. Kept in sync with the shipped baseline file.
pub const BUILTIN_BASELINE: [&str; 17] = [
    "Supplier Article Number",
    "Article Description",
    "Brand Name",
    "Manufacturer Name",
    "Manufacturer Article Number",
    "GTIN",
    "Price",
    "Currency",
    "VAT Rate",
    "Price Unit Of Measure",
    "Base Unit UOM",
    "Orderable Unit UOM",
    "Orderable Unit Content",
    "Is Base Unit",
    "Is Orderable Unit",
    "Packaging Description",
    "Start Date",
];

/// Where the baseline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    Configured,
    BuiltIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MandatoryBaseline {
    pub fields: Vec<String>,
    pub source: BaselineSource,
}

#[derive(Deserialize)]
struct BaselineFile {
    mandatory_fields: Vec<String>,
}

impl Default for MandatoryBaseline {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MandatoryBaseline {
    pub fn builtin() -> Self {
        Self {
            fields: BUILTIN_BASELINE.iter().map(ToString::to_string).collect(),
            source: BaselineSource::BuiltIn,
        }
    }

    pub fn configured(fields: Vec<String>) -> Self {
        Self {
            fields,
            source: BaselineSource::Configured,
        }
    }

    /// Read the baseline; never fails.
    ///
    /// A missing, unparsable or empty file falls back to [`BUILTIN_BASELINE`].
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                warn!(path = %path.display(), %error, "mandatory baseline unreadable, using built-in list");
                return Self::builtin();
            }
        };
        match serde_json::from_str::<BaselineFile>(&text) {
            Ok(file) if !file.mandatory_fields.is_empty() => {
                let mut fields: Vec<String> = Vec::with_capacity(file.mandatory_fields.len());
                for field in file.mandatory_fields {
                    let field = field.trim().to_string();
                    if !field.is_empty() && !fields.contains(&field) {
                        fields.push(field);
                    }
                }
                Self::configured(fields)
            }
            Ok(_) => {
                warn!(path = %path.display(), "mandatory baseline is empty, using built-in list");
                Self::builtin()
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "mandatory baseline unparsable, using built-in list");
                Self::builtin()
            }
        }
    }
}

/// Extra mandatory fields per institution code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstitutionOverrides {
    by_code: BTreeMap<String, Vec<String>>,
}

impl InstitutionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes are matched case-insensitively.
    pub fn insert(&mut self, code: &str, fields: Vec<String>) {
        self.by_code.insert(code.trim().to_uppercase(), fields);
    }

    /// Read `institution_mandatory.json`; a missing file yields no overrides.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let map: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&text).map_err(|e| StandardsError::json(path, e))?;
        let mut overrides = Self::new();
        for (code, fields) in map {
            overrides.insert(&code, fields);
        }
        Ok(overrides)
    }

    pub fn fields_for(&self, code: &str) -> &[String] {
        self.by_code
            .get(&code.trim().to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Union of extras for all `codes`, first occurrence order, deduplicated.
    pub fn extra_fields<S: AsRef<str>>(&self, codes: &[S]) -> Vec<String> {
        let mut extras: Vec<String> = Vec::new();
        for code in codes {
            for field in self.fields_for(code.as_ref()) {
                if !extras.contains(field) {
                    extras.push(field.clone());
                }
            }
        }
        extras
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
