//! Field-rule configuration in either schema generation.
//!
//! `field_rules.json` is either legacy (`{"fields": {...}}`) or native
//! (`{"field_validations": {...}, "global_validations": [...]}`). The shape is
//! detected once per file; every field then carries the compiled rules of
//! that generation.

pub mod legacy;
pub mod native;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use pricelist_model::{FormatHint, Importance};

use crate::error::{Result, StandardsError};
use crate::global::{GlobalValidation, parse_global_validations};
use legacy::{LegacyRules, compile_legacy_field};
use native::{NativeRule, compile_native_rule};

/// Schema generation of a rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSchema {
    Legacy,
    Native,
}

impl RuleSchema {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Native => "native",
        }
    }
}

/// Compiled rules of one field.
#[derive(Debug, Clone)]
pub enum FieldRules {
    Legacy(LegacyRules),
    Native(Vec<NativeRule>),
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub importance: Importance,
    pub format: FormatHint,
    pub rules: FieldRules,
}

impl FieldDefinition {
    pub fn schema(&self) -> RuleSchema {
        match self.rules {
            FieldRules::Legacy(_) => RuleSchema::Legacy,
            FieldRules::Native(_) => RuleSchema::Native,
        }
    }

    /// Whether the field's own rules already report an empty value.
    pub fn has_empty_rule(&self) -> bool {
        match &self.rules {
            FieldRules::Legacy(_) => true,
            FieldRules::Native(rules) => rules
                .iter()
                .any(|rule| matches!(rule.condition, native::Condition::IsEmpty)),
        }
    }

    pub fn rule_count(&self) -> usize {
        match &self.rules {
            FieldRules::Legacy(_) => 1,
            FieldRules::Native(rules) => rules.len(),
        }
    }
}

/// All field definitions of a rule file, in file order.
#[derive(Debug, Clone)]
pub struct FieldRuleSet {
    pub schema: RuleSchema,
    fields: Vec<FieldDefinition>,
    index: HashMap<String, usize>,
    /// Declared table-level checks; always empty for legacy files.
    pub global_validations: Vec<GlobalValidation>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNativeField {
    Rules(Vec<Value>),
    Detailed {
        #[serde(default)]
        mandatory: bool,
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        rules: Vec<Value>,
    },
}

impl FieldRuleSet {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let root: Value = serde_json::from_str(&text).map_err(|e| StandardsError::json(path, e))?;
        Self::from_value(path, root)
    }

    /// Detect the schema of `root` and compile every field.
    pub fn from_value(path: &Path, root: Value) -> Result<Self> {
        let Value::Object(mut root) = root else {
            return Err(StandardsError::UnknownRuleSchema {
                path: path.to_path_buf(),
            });
        };
        let set = if let Some(fields) = root.remove("field_validations") {
            let globals = match root.remove("global_validations") {
                Some(Value::Array(entries)) => parse_global_validations(&entries),
                Some(Value::Null) | None => Vec::new(),
                Some(_) => {
                    warn!(path = %path.display(), "global_validations is not a list, ignoring");
                    Vec::new()
                }
            };
            Self::compile_native(path, object(path, "field_validations", fields)?, globals)?
        } else if let Some(fields) = root.remove("fields") {
            Self::compile_legacy(path, object(path, "fields", fields)?)?
        } else {
            return Err(StandardsError::UnknownRuleSchema {
                path: path.to_path_buf(),
            });
        };
        info!(
            path = %path.display(),
            schema = set.schema.label(),
            fields = set.fields.len(),
            global_validations = set.global_validations.len(),
            "loaded field rules"
        );
        Ok(set)
    }

    fn compile_legacy(path: &Path, fields: Map<String, Value>) -> Result<Self> {
        let mut set = Self::empty(RuleSchema::Legacy);
        for (name, config) in fields {
            let name = name.trim().to_string();
            let (importance, format, rules) = compile_legacy_field(&name, config)?;
            set.push(
                path,
                FieldDefinition {
                    name,
                    importance,
                    format,
                    rules: FieldRules::Legacy(rules),
                },
            )?;
        }
        Ok(set)
    }

    fn compile_native(
        path: &Path,
        fields: Map<String, Value>,
        global_validations: Vec<GlobalValidation>,
    ) -> Result<Self> {
        let mut set = Self::empty(RuleSchema::Native);
        set.global_validations = global_validations;
        for (name, config) in fields {
            let name = name.trim().to_string();
            let raw: RawNativeField =
                serde_json::from_value(config).map_err(|e| StandardsError::InvalidField {
                    field: name.clone(),
                    message: format!("expected a rule list or an object with 'rules': {e}"),
                })?;
            let (mandatory, format, entries) = match raw {
                RawNativeField::Rules(entries) => (false, None, entries),
                RawNativeField::Detailed {
                    mandatory,
                    format,
                    rules,
                } => (mandatory, format, rules),
            };
            let rules: Vec<NativeRule> = entries
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| compile_native_rule(&name, idx, entry))
                .collect();
            if rules.len() < entries.len() {
                debug!(
                    field = %name,
                    kept = rules.len(),
                    declared = entries.len(),
                    "some rules were skipped"
                );
            }
            set.push(
                path,
                FieldDefinition {
                    name,
                    importance: if mandatory {
                        Importance::Mandatory
                    } else {
                        Importance::Optional
                    },
                    format: format.as_deref().map(FormatHint::parse).unwrap_or_default(),
                    rules: FieldRules::Native(rules),
                },
            )?;
        }
        Ok(set)
    }

    fn empty(schema: RuleSchema) -> Self {
        Self {
            schema,
            fields: Vec::new(),
            index: HashMap::new(),
            global_validations: Vec::new(),
        }
    }

    fn push(&mut self, path: &Path, definition: FieldDefinition) -> Result<()> {
        if self.index.contains_key(&definition.name) {
            return Err(StandardsError::DuplicateField {
                path: path.to_path_buf(),
                field: definition.name,
            });
        }
        self.index
            .insert(definition.name.clone(), self.fields.len());
        self.fields.push(definition);
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&FieldDefinition> {
        self.index.get(field).map(|idx| &self.fields[*idx])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn object(path: &Path, key: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StandardsError::InvalidField {
            field: key.to_string(),
            message: format!("expected an object in {}", path.display()),
        }),
    }
}
