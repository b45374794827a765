//! Header alternatives: canonical field name to supplier spellings.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, StandardsError};

/// Alternatives in file order.
///
/// Order matters: when two fields list the same spelling, the one that
/// appears first keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderAlternatives {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderAlternatives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, alternatives: Vec<String>) {
        self.entries.push((field.into(), alternatives));
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let object: Map<String, Value> =
            serde_json::from_str(&text).map_err(|e| StandardsError::json(path, e))?;
        Self::from_object(object)
    }

    pub(crate) fn from_object(object: Map<String, Value>) -> Result<Self> {
        let mut alternatives = Self::new();
        for (field, value) in object {
            let spellings: Vec<String> = match value {
                Value::Null => Vec::new(),
                Value::String(single) => vec![single],
                other => serde_json::from_value(other).map_err(|e| StandardsError::InvalidField {
                    field: field.clone(),
                    message: format!("header alternatives must be a list of strings: {e}"),
                })?,
            };
            alternatives.push(field.trim(), spellings);
        }
        Ok(alternatives)
    }

    /// `(field, alternatives)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vec<String>)> {
        self.entries
            .iter()
            .map(|(field, alternatives)| (field.as_str(), alternatives))
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
