//! Cross-row and cross-field checks declared as global validations.

use serde::{Deserialize, Serialize};
use tracing::warn;

use pricelist_model::FindingType;

use crate::options::FindingCodes;

pub const DEFAULT_URL_THRESHOLD: usize = 3;

/// One table-level check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlobalValidation {
    UomRelationship(UomRelationshipCheck),
    PackagingPlausibility(PackagingCheck),
    DuplicateUrl(DuplicateUrlCheck),
    DimensionSet(DimensionSetCheck),
}

impl GlobalValidation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UomRelationship(_) => "uom_relationship",
            Self::PackagingPlausibility(_) => "packaging_plausibility",
            Self::DuplicateUrl(_) => "duplicate_url",
            Self::DimensionSet(_) => "dimension_set",
        }
    }

    /// Finding code, falling back to the pipeline default for the check kind.
    pub fn code<'a>(&'a self, codes: &'a FindingCodes) -> &'a str {
        let (own, fallback) = match self {
            Self::UomRelationship(check) => (&check.code, &codes.relationship_conflict),
            Self::PackagingPlausibility(check) => (&check.code, &codes.packaging_mismatch),
            Self::DuplicateUrl(check) => (&check.code, &codes.duplicate_url),
            Self::DimensionSet(check) => (&check.code, &codes.incomplete_dimensions),
        };
        own.as_deref().unwrap_or(fallback)
    }
}

/// Orderable-unit / base-unit indicator consistency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UomRelationshipCheck {
    pub orderable_flag: String,
    pub base_flag: String,
    pub orderable_uom: String,
    pub base_uom: String,
    /// Orderable-unit content; must be 1 exactly when both indicators are true.
    pub content: String,
    pub code: Option<String>,
    pub finding_type: FindingType,
    pub message: Option<String>,
}

impl Default for UomRelationshipCheck {
    fn default() -> Self {
        Self {
            orderable_flag: "Is Orderable Unit".to_string(),
            base_flag: "Is Base Unit".to_string(),
            orderable_uom: "Orderable Unit UOM".to_string(),
            base_uom: "Base Unit UOM".to_string(),
            content: "Orderable Unit Content".to_string(),
            code: None,
            finding_type: FindingType::Rejection,
            message: None,
        }
    }
}

/// Free-text packaging description should mention content and UOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingCheck {
    pub description: String,
    pub content: String,
    pub uom: String,
    pub code: Option<String>,
    pub finding_type: FindingType,
}

impl Default for PackagingCheck {
    fn default() -> Self {
        Self {
            description: "Packaging Description".to_string(),
            content: "Orderable Unit Content".to_string(),
            uom: "Orderable Unit UOM".to_string(),
            code: None,
            finding_type: FindingType::Flag,
        }
    }
}

/// Many rows sharing one product URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateUrlCheck {
    pub url_field: String,
    pub threshold: usize,
    /// Chemical identifier fields. Empty selects the simple variant that flags
    /// every row of a large group.
    pub identifier_fields: Vec<String>,
    pub code: Option<String>,
    pub finding_type: FindingType,
}

impl Default for DuplicateUrlCheck {
    fn default() -> Self {
        Self {
            url_field: "Product URL".to_string(),
            threshold: DEFAULT_URL_THRESHOLD,
            identifier_fields: Vec::new(),
            code: None,
            finding_type: FindingType::Flag,
        }
    }
}

impl DuplicateUrlCheck {
    pub fn is_chemical_aware(&self) -> bool {
        !self.identifier_fields.is_empty()
    }
}

/// A family of related fields that must be filled together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionSetCheck {
    pub fields: Vec<String>,
    pub code: Option<String>,
    pub finding_type: FindingType,
}

impl Default for DimensionSetCheck {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            code: None,
            finding_type: FindingType::Flag,
        }
    }
}

/// Parse a `global_validations` list, skipping entries that do not parse.
pub(crate) fn parse_global_validations(entries: &[serde_json::Value]) -> Vec<GlobalValidation> {
    let mut checks = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<GlobalValidation>(entry.clone()) {
            Ok(GlobalValidation::DuplicateUrl(check)) if check.threshold < 2 => {
                warn!(
                    index = idx,
                    threshold = check.threshold,
                    "duplicate_url threshold below 2, skipping global validation"
                );
            }
            Ok(GlobalValidation::DimensionSet(check)) if check.fields.len() < 2 => {
                warn!(index = idx, "dimension_set needs at least two fields, skipping");
            }
            Ok(check) => checks.push(check),
            Err(error) => {
                let kind = entry
                    .get("type")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("<missing>");
                warn!(index = idx, kind, %error, "unrecognized global validation, skipping");
            }
        }
    }
    checks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_properties_take_defaults() {
        let checks = parse_global_validations(&[json!({"type": "duplicate_url", "threshold": 4})]);
        let GlobalValidation::DuplicateUrl(check) = &checks[0] else {
            panic!("expected duplicate_url");
        };
        assert_eq!(check.url_field, "Product URL");
        assert_eq!(check.threshold, 4);
        assert!(!check.is_chemical_aware());
    }

    #[test]
    fn unknown_kinds_are_skipped() {
        let checks = parse_global_validations(&[
            json!({"type": "price_history"}),
            json!({"type": "uom_relationship", "code": "R17"}),
        ]);
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].code(&FindingCodes::default()), "R17");
    }

    #[test]
    fn code_falls_back_to_pipeline_default() {
        let check = GlobalValidation::DimensionSet(DimensionSetCheck::default());
        assert_eq!(check.code(&FindingCodes::default()), "X004");
    }
}
