//! Legacy rule schema: one flat property set per field.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use pricelist_model::{FindingType, FormatHint, Importance};

use crate::error::{Result, StandardsError};

/// Default decimal separator for legacy numeric fields.
pub const DEFAULT_DECIMAL_SEPARATOR: char = ',';

/// Finding codes of the legacy checks, overridable per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyCodes {
    pub required: String,
    pub too_short: String,
    pub too_long: String,
    pub not_allowed: String,
    pub not_numeric: String,
    pub integer_digits: String,
    pub decimal_digits: String,
    pub invalid_format: String,
}

impl Default for LegacyCodes {
    fn default() -> Self {
        Self {
            required: "L001".to_string(),
            too_short: "L002".to_string(),
            too_long: "L003".to_string(),
            not_allowed: "L004".to_string(),
            not_numeric: "L005".to_string(),
            integer_digits: "L006".to_string(),
            decimal_digits: "L007".to_string(),
            invalid_format: "L008".to_string(),
        }
    }
}

/// Field becomes required when another field holds a trigger value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDependency {
    pub field: String,
    /// Trigger value, compared trimmed and case-insensitively. When absent any
    /// non-empty value of `field` triggers.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LegacyFieldConfig {
    mandatory: bool,
    format: Option<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    allowed_values: Vec<String>,
    decimal_separator: Option<String>,
    max_integer_digits: Option<usize>,
    max_decimal_digits: Option<usize>,
    pattern: Option<String>,
    depends_on: Option<LegacyDependency>,
    severity: Option<String>,
    codes: LegacyCodes,
}

/// Compiled legacy rules for one field.
#[derive(Debug, Clone)]
pub struct LegacyRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub allowed_values: Vec<String>,
    allowed_lookup: HashSet<String>,
    pub decimal_separator: char,
    pub max_integer_digits: Option<usize>,
    pub max_decimal_digits: Option<usize>,
    /// Anchored pattern; `None` when absent or when it failed to compile.
    pub pattern: Option<Regex>,
    pub dependency: Option<LegacyDependency>,
    /// Finding type of every check except required-empty.
    pub severity: FindingType,
    pub codes: LegacyCodes,
}

impl Default for LegacyRules {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            allowed_values: Vec::new(),
            allowed_lookup: HashSet::new(),
            decimal_separator: DEFAULT_DECIMAL_SEPARATOR,
            max_integer_digits: None,
            max_decimal_digits: None,
            pattern: None,
            dependency: None,
            severity: FindingType::Rejection,
            codes: LegacyCodes::default(),
        }
    }
}

impl LegacyRules {
    pub fn with_allowed_values(mut self, values: Vec<String>) -> Self {
        self.allowed_lookup = values.iter().map(|v| v.trim().to_lowercase()).collect();
        self.allowed_values = values;
        self
    }

    pub fn with_pattern(mut self, field: &str, pattern: &str) -> Self {
        self.pattern = compile_anchored(field, pattern);
        self
    }

    /// Case-insensitive exact membership. An empty list allows everything.
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_lookup.is_empty() || self.allowed_lookup.contains(&value.trim().to_lowercase())
    }
}

/// Compile `pattern` anchored at both ends. A malformed pattern is logged and
/// disables the check.
pub fn compile_anchored(field: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => Some(regex),
        Err(error) => {
            warn!(field, pattern, %error, "invalid regex pattern, format check disabled");
            None
        }
    }
}

pub(crate) fn compile_legacy_field(
    field: &str,
    value: serde_json::Value,
) -> Result<(Importance, FormatHint, LegacyRules)> {
    let config: LegacyFieldConfig =
        serde_json::from_value(value).map_err(|e| StandardsError::InvalidField {
            field: field.to_string(),
            message: e.to_string(),
        })?;

    let decimal_separator = match config.decimal_separator.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_DECIMAL_SEPARATOR,
        Some(",") => ',',
        Some(".") => '.',
        Some(other) => {
            return Err(StandardsError::InvalidField {
                field: field.to_string(),
                message: format!("decimal_separator must be ',' or '.', got '{other}'"),
            });
        }
    };

    let severity = match config.severity.as_deref() {
        None => FindingType::Rejection,
        Some(raw) => FindingType::parse(raw).unwrap_or_else(|| {
            warn!(field, severity = raw, "unknown severity, using rejection");
            FindingType::Rejection
        }),
    };

    if let (Some(min), Some(max)) = (config.min_length, config.max_length)
        && min > max
    {
        return Err(StandardsError::InvalidField {
            field: field.to_string(),
            message: format!("min_length {min} exceeds max_length {max}"),
        });
    }

    let importance = if config.mandatory {
        Importance::Mandatory
    } else {
        Importance::Optional
    };
    let format = config
        .format
        .as_deref()
        .map(FormatHint::parse)
        .unwrap_or_default();

    let mut rules = LegacyRules {
        min_length: config.min_length,
        max_length: config.max_length,
        decimal_separator,
        max_integer_digits: config.max_integer_digits,
        max_decimal_digits: config.max_decimal_digits,
        dependency: config.depends_on,
        severity,
        codes: config.codes,
        ..LegacyRules::default()
    }
    .with_allowed_values(config.allowed_values);
    if let Some(pattern) = config.pattern.as_deref().filter(|p| !p.is_empty()) {
        rules = rules.with_pattern(field, pattern);
    }
    Ok((importance, format, rules))
}
