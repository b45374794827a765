//! Run options read from an optional TOML file.
//!
//! Every key has a default, so an empty file (or no file at all) yields a
//! usable [`ValidatorOptions`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StandardsError};
use crate::global::{
    DimensionSetCheck, DuplicateUrlCheck, GlobalValidation, PackagingCheck, UomRelationshipCheck,
};

pub const DEFAULT_MAX_ROWS: usize = 5000;
pub const DEFAULT_INVALID_VALUES: &[&str] = &["", "n/a", "na", "nvt", "-", "null", "none"];
pub const DEFAULT_IGNORE_PREFIXES: &[&str] = &["unnamed"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Rows beyond this count are dropped before validation starts.
    pub max_rows: usize,
    /// One-based sheet row holding the header line.
    pub header_row: usize,
    /// Lower-cased, trimmed values that count as empty.
    pub invalid_values: Vec<String>,
    /// Unresolved columns whose normalized header starts with one of these
    /// are not reported as unmapped.
    pub ignore_prefixes: Vec<String>,
    pub classifier: ClassifierOptions,
    pub cross_checks: CrossCheckOptions,
    pub codes: FindingCodes,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            header_row: 1,
            invalid_values: DEFAULT_INVALID_VALUES
                .iter()
                .map(ToString::to_string)
                .collect(),
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            classifier: ClassifierOptions::default(),
            cross_checks: CrossCheckOptions::default(),
            codes: FindingCodes::default(),
        }
    }
}

impl ValidatorOptions {
    /// Read options from a TOML file and validate them.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let options: Self = toml::from_str(&text).map_err(|source| StandardsError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Read options when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 {
            return Err(StandardsError::invalid_options("max_rows must be at least 1"));
        }
        if self.header_row == 0 {
            return Err(StandardsError::invalid_options(
                "header_row is one-based and must be at least 1",
            ));
        }
        if self.cross_checks.url_threshold < 2 {
            return Err(StandardsError::invalid_options(
                "cross_checks.url_threshold must be at least 2",
            ));
        }
        for cell in self
            .classifier
            .stamp_cells
            .iter()
            .chain(std::iter::once(&self.classifier.context_cell))
        {
            if pricelist_model::CellRef::parse(cell).is_err() {
                return Err(StandardsError::invalid_options(format!(
                    "classifier cell '{cell}' is not an A1 reference"
                )));
            }
        }
        Ok(())
    }
}

/// Markers used to recognise generator-produced workbooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierOptions {
    /// Hidden sheet written by the generator. Also holds the context JSON.
    pub context_sheet: String,
    /// Cell on `context_sheet` with the embedded context JSON.
    pub context_cell: String,
    /// Named range written alongside `context_sheet`.
    pub generator_named_range: String,
    /// Sheet carrying the stamped marker cells.
    pub stamp_sheet: String,
    pub stamp_cells: Vec<String>,
    /// Marker text every stamp cell must contain (case-insensitive).
    pub stamp_marker: String,
    /// Columns that only the current standard layout carries.
    pub default_sentinels: Vec<String>,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            context_sheet: "TemplateContext".to_string(),
            context_cell: "A1".to_string(),
            generator_named_range: "TemplateGenerator".to_string(),
            stamp_sheet: "Instructions".to_string(),
            stamp_cells: vec!["A1".to_string(), "A2".to_string()],
            stamp_marker: "PRICELIST-GENERATOR".to_string(),
            default_sentinels: vec!["Is Orderable Unit".to_string(), "Is Base Unit".to_string()],
        }
    }
}

/// Cross-row checks applied when the rule file carries no global validations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrossCheckOptions {
    pub enabled: bool,
    pub orderable_flag: String,
    pub base_flag: String,
    pub orderable_uom: String,
    pub base_uom: String,
    pub orderable_content: String,
    pub packaging_description: String,
    pub url_field: String,
    pub url_threshold: usize,
    /// Empty selects the simple duplicate-URL variant.
    pub chemical_identifier_fields: Vec<String>,
    /// Empty disables the dimension-set check.
    pub dimension_fields: Vec<String>,
}

impl Default for CrossCheckOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            orderable_flag: "Is Orderable Unit".to_string(),
            base_flag: "Is Base Unit".to_string(),
            orderable_uom: "Orderable Unit UOM".to_string(),
            base_uom: "Base Unit UOM".to_string(),
            orderable_content: "Orderable Unit Content".to_string(),
            packaging_description: "Packaging Description".to_string(),
            url_field: "Product URL".to_string(),
            url_threshold: crate::global::DEFAULT_URL_THRESHOLD,
            chemical_identifier_fields: Vec::new(),
            dimension_fields: vec![
                "Length".to_string(),
                "Width".to_string(),
                "Height".to_string(),
            ],
        }
    }
}

impl CrossCheckOptions {
    /// Expand into the same check list a native rule file would declare.
    pub fn to_validations(&self) -> Vec<GlobalValidation> {
        if !self.enabled {
            return Vec::new();
        }
        let mut checks = vec![
            GlobalValidation::UomRelationship(UomRelationshipCheck {
                orderable_flag: self.orderable_flag.clone(),
                base_flag: self.base_flag.clone(),
                orderable_uom: self.orderable_uom.clone(),
                base_uom: self.base_uom.clone(),
                content: self.orderable_content.clone(),
                ..UomRelationshipCheck::default()
            }),
            GlobalValidation::PackagingPlausibility(PackagingCheck {
                description: self.packaging_description.clone(),
                content: self.orderable_content.clone(),
                uom: self.orderable_uom.clone(),
                ..PackagingCheck::default()
            }),
            GlobalValidation::DuplicateUrl(DuplicateUrlCheck {
                url_field: self.url_field.clone(),
                threshold: self.url_threshold,
                identifier_fields: self.chemical_identifier_fields.clone(),
                ..DuplicateUrlCheck::default()
            }),
        ];
        if !self.dimension_fields.is_empty() {
            checks.push(GlobalValidation::DimensionSet(DimensionSetCheck {
                fields: self.dimension_fields.clone(),
                ..DimensionSetCheck::default()
            }));
        }
        checks
    }
}

/// Codes for findings the pipeline itself emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindingCodes {
    /// Mandatory field empty on a native-schema field without an `is_empty` rule.
    pub mandatory_empty: String,
    pub relationship_conflict: String,
    pub packaging_mismatch: String,
    pub duplicate_url: String,
    pub incomplete_dimensions: String,
}

impl Default for FindingCodes {
    fn default() -> Self {
        Self {
            mandatory_empty: "M001".to_string(),
            relationship_conflict: "X001".to_string(),
            packaging_mismatch: "X002".to_string(),
            duplicate_url: "X003".to_string(),
            incomplete_dimensions: "X004".to_string(),
        }
    }
}
