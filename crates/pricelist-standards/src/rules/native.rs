//! Native rule schema: an ordered list of independent rules per field.
//!
//! Each rule names a condition from a closed vocabulary. Conditions are
//! compiled once at load time; an unknown condition or a parameter that does
//! not fit is logged and the rule is dropped, so a typo in the configuration
//! shows up in the log instead of silently passing every row.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use pricelist_model::FindingType;

pub const DEFAULT_CALCULATION_TOLERANCE: f64 = 0.01;

/// Case-insensitive set of allowed values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSet {
    pub values: Vec<String>,
    lookup: HashSet<String>,
}

impl ValueSet {
    pub fn new(values: Vec<String>) -> Self {
        let lookup = values.iter().map(|v| v.trim().to_lowercase()).collect();
        Self { values, lookup }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.lookup.contains(&value.trim().to_lowercase())
    }
}

/// Allowed values given inline or by reference-list name.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedValues {
    Inline(ValueSet),
    Reference(String),
}

impl AllowedValues {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) if !name.trim().is_empty() => {
                Some(Self::Reference(name.trim().to_string()))
            }
            Value::Array(_) => string_list(value).map(|values| Self::Inline(ValueSet::new(values))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Multiply,
    Divide,
}

/// Predicate of a native rule. A rule fires when its condition holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    IsEmpty,
    /// Neither `.` nor `,` as decimal separator yields a number.
    NotNumeric,
    NotInList(AllowedValues),
    TooShort { min: usize },
    TooLong { max: usize },
    /// Empty although `dependency` is filled.
    EmptyWhenDependencyFilled { dependency: String },
    /// Value differs from `left <op> right` by more than `tolerance`.
    CalculationMismatch {
        left: String,
        right: String,
        operation: Operation,
        tolerance: f64,
    },
    InvalidBoolean,
    /// Value is not a digit string of one of the given lengths.
    InvalidExactLength { lengths: Vec<usize> },
    MissingPrefix { prefixes: Vec<String> },
    /// `marker` occurs more than once but `separator` never does.
    MissingSeparator { marker: String, separator: String },
    /// Field and every sibling are empty.
    NoSiblingFilled { siblings: Vec<String> },
    /// The classification code in `classification_field` restricts the values
    /// this field may take. Codes are upper-cased.
    VocabularyMismatch {
        classification_field: String,
        allowed_by_code: BTreeMap<String, AllowedValues>,
    },
    /// Field is required when `source_field` starts with one of `prefixes`.
    ConditionalPrefixRequired {
        source_field: String,
        prefixes: Vec<String>,
    },
}

impl Condition {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsEmpty => "is_empty",
            Self::NotNumeric => "not_numeric",
            Self::NotInList(_) => "not_in_list",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::EmptyWhenDependencyFilled { .. } => "empty_when_dependency_filled",
            Self::CalculationMismatch { .. } => "calculation_mismatch",
            Self::InvalidBoolean => "invalid_boolean",
            Self::InvalidExactLength { .. } => "invalid_exact_length",
            Self::MissingPrefix { .. } => "missing_prefix",
            Self::MissingSeparator { .. } => "missing_separator",
            Self::NoSiblingFilled { .. } => "no_sibling_filled",
            Self::VocabularyMismatch { .. } => "vocabulary_mismatch",
            Self::ConditionalPrefixRequired { .. } => "conditional_prefix_required",
        }
    }

    /// Reference lists this condition reads.
    pub fn list_references(&self) -> Vec<&str> {
        match self {
            Self::NotInList(AllowedValues::Reference(name)) => vec![name.as_str()],
            Self::VocabularyMismatch {
                allowed_by_code, ..
            } => allowed_by_code
                .values()
                .filter_map(|allowed| match allowed {
                    AllowedValues::Reference(name) => Some(name.as_str()),
                    AllowedValues::Inline(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Other fields this condition reads.
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            Self::EmptyWhenDependencyFilled { dependency } => vec![dependency.as_str()],
            Self::CalculationMismatch { left, right, .. } => vec![left.as_str(), right.as_str()],
            Self::NoSiblingFilled { siblings } => siblings.iter().map(String::as_str).collect(),
            Self::VocabularyMismatch {
                classification_field,
                ..
            } => vec![classification_field.as_str()],
            Self::ConditionalPrefixRequired { source_field, .. } => vec![source_field.as_str()],
            _ => Vec::new(),
        }
    }

    /// Compile a condition from its name and parameters.
    pub fn compile(name: &str, params: &Map<String, Value>) -> Result<Self, String> {
        let condition = match name.trim() {
            "is_empty" => Self::IsEmpty,
            "not_numeric" => Self::NotNumeric,
            "invalid_boolean" => Self::InvalidBoolean,
            "not_in_list" => {
                let allowed = match (params.get("allowed_values"), params.get("list")) {
                    (Some(inline), _) => AllowedValues::from_value(inline)
                        .ok_or("allowed_values must be a list of strings")?,
                    (None, Some(Value::String(list))) if !list.trim().is_empty() => {
                        AllowedValues::Reference(list.trim().to_string())
                    }
                    _ => return Err("needs 'allowed_values' or 'list'".to_string()),
                };
                Self::NotInList(allowed)
            }
            "too_short" => Self::TooShort {
                min: usize_param(params, "min_length")?,
            },
            "too_long" => Self::TooLong {
                max: usize_param(params, "max_length")?,
            },
            "empty_when_dependency_filled" => Self::EmptyWhenDependencyFilled {
                dependency: str_param(params, "dependency")?,
            },
            "calculation_mismatch" => {
                let operation = match str_param(params, "operation")?.to_lowercase().as_str() {
                    "multiply" | "product" | "*" => Operation::Multiply,
                    "divide" | "quotient" | "/" => Operation::Divide,
                    other => return Err(format!("unknown operation '{other}'")),
                };
                let tolerance = match params.get("tolerance") {
                    None => DEFAULT_CALCULATION_TOLERANCE,
                    Some(value) => value
                        .as_f64()
                        .filter(|t| *t >= 0.0)
                        .ok_or("tolerance must be a non-negative number")?,
                };
                Self::CalculationMismatch {
                    left: str_param(params, "left")?,
                    right: str_param(params, "right")?,
                    operation,
                    tolerance,
                }
            }
            "invalid_exact_length" => {
                let lengths = match (params.get("lengths"), params.get("length")) {
                    (Some(Value::Array(items)), _) => items
                        .iter()
                        .map(|item| item.as_u64().and_then(|n| usize::try_from(n).ok()))
                        .collect::<Option<Vec<_>>>()
                        .filter(|lengths| !lengths.is_empty())
                        .ok_or("lengths must be a non-empty list of integers")?,
                    (None, Some(_)) => vec![usize_param(params, "length")?],
                    _ => return Err("needs 'lengths' or 'length'".to_string()),
                };
                Self::InvalidExactLength { lengths }
            }
            "missing_prefix" => Self::MissingPrefix {
                prefixes: list_param(params, &["prefixes", "prefix"])?,
            },
            "missing_separator" => Self::MissingSeparator {
                marker: str_param(params, "marker")?,
                separator: str_param(params, "separator")?,
            },
            "no_sibling_filled" => Self::NoSiblingFilled {
                siblings: list_param(params, &["siblings"])?,
            },
            "vocabulary_mismatch" => {
                let classification_field = str_param(params, "classification_field")?;
                let Some(Value::Object(by_code)) = params.get("allowed_by_code") else {
                    return Err("allowed_by_code must be an object".to_string());
                };
                let mut allowed_by_code = BTreeMap::new();
                for (code, allowed) in by_code {
                    let allowed = AllowedValues::from_value(allowed).ok_or_else(|| {
                        format!("allowed_by_code['{code}'] must be a list or a list name")
                    })?;
                    allowed_by_code.insert(code.trim().to_uppercase(), allowed);
                }
                Self::VocabularyMismatch {
                    classification_field,
                    allowed_by_code,
                }
            }
            "conditional_prefix_required" => Self::ConditionalPrefixRequired {
                source_field: str_param(params, "source_field")?,
                prefixes: list_param(params, &["prefixes", "prefix"])?,
            },
            other => return Err(format!("unknown condition '{other}'")),
        };
        Ok(condition)
    }
}

/// A compiled native rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRule {
    pub finding_type: FindingType,
    pub condition: Condition,
    pub code: String,
    /// Message template; see [`NativeRule::render_message`].
    pub message: String,
    /// Scalar parameters rendered as text for message substitution.
    pub params: BTreeMap<String, String>,
}

impl NativeRule {
    /// Substitute `{field}`, every scalar parameter `{name}` and `{value}`.
    pub fn render_message(&self, field: &str, value: Option<&str>) -> String {
        let mut message = self.message.replace("{field}", field);
        for (name, param) in &self.params {
            message = message.replace(&format!("{{{name}}}"), param);
        }
        message.replace("{value}", value.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct RawNativeRule {
    #[serde(rename = "type", default)]
    rule_type: Option<String>,
    condition: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    params: Map<String, Value>,
}

/// Compile one rule entry; `None` (after a warning) when it cannot be used.
pub(crate) fn compile_native_rule(field: &str, index: usize, entry: &Value) -> Option<NativeRule> {
    let raw: RawNativeRule = match serde_json::from_value(entry.clone()) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(field, index, %error, "malformed rule entry, skipping");
            return None;
        }
    };
    let finding_type = match raw.rule_type.as_deref() {
        None => FindingType::Rejection,
        Some(kind) => match FindingType::parse(kind) {
            Some(kind) => kind,
            None => {
                warn!(field, index, kind, "unknown rule type, skipping");
                return None;
            }
        },
    };
    let Some(code) = raw.code.filter(|code| !code.trim().is_empty()) else {
        warn!(field, index, condition = %raw.condition, "rule has no code, skipping");
        return None;
    };
    let condition = match Condition::compile(&raw.condition, &raw.params) {
        Ok(condition) => condition,
        Err(reason) => {
            warn!(field, index, condition = %raw.condition, %reason, "rule cannot be compiled, skipping");
            return None;
        }
    };
    let message = raw
        .message
        .unwrap_or_else(|| format!("{{field}} failed {}", condition.name()));
    let params = raw
        .params
        .iter()
        .filter_map(|(name, value)| scalar_text(value).map(|text| (name.clone(), text)))
        .collect();
    Some(NativeRule {
        finding_type,
        condition,
        code: code.trim().to_string(),
        message,
        params,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn str_param(params: &Map<String, Value>, key: &str) -> Result<String, String> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| format!("missing string parameter '{key}'"))
}

fn usize_param(params: &Map<String, Value>, key: &str) -> Result<usize, String> {
    params
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| format!("missing integer parameter '{key}'"))
}

/// First of `keys` present, as a non-empty list; a single string counts as a
/// one-element list.
fn list_param(params: &Map<String, Value>, keys: &[&str]) -> Result<Vec<String>, String> {
    keys.iter()
        .find_map(|key| params.get(*key))
        .and_then(string_list)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| format!("missing list parameter '{}'", keys.join("' or '")))
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(single) => Some(vec![single.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(ToString::to_string))
            .collect(),
        _ => None,
    }
}
