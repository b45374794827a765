//! Named allowed-value lists shared by native rules.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{Result, StandardsError};

#[derive(Debug, Clone, Default)]
struct ReferenceList {
    values: Vec<String>,
    lookup: HashSet<String>,
}

/// Reference lists keyed by name. Membership checks are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLists {
    lists: BTreeMap<String, ReferenceList>,
}

impl ReferenceLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Self {
        let mut lists = Self::new();
        for (name, values) in map {
            lists.insert(name, values);
        }
        lists
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let lookup = values.iter().map(|value| fold(value)).collect();
        self.lists
            .insert(name.into(), ReferenceList { values, lookup });
    }

    /// Read `reference_lists.json`; a missing file yields no lists.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let map: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&text).map_err(|e| StandardsError::json(path, e))?;
        Ok(Self::from_map(map))
    }

    pub fn has_list(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name).map(|list| list.values.as_slice())
    }

    /// `None` when the list does not exist.
    pub fn contains(&self, name: &str, value: &str) -> Option<bool> {
        self.lists
            .get(name)
            .map(|list| list.lookup.contains(&fold(value)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_ignores_case_and_padding() {
        let mut lists = ReferenceLists::new();
        lists.insert("currencies", vec!["EUR".to_string(), "USD".to_string()]);
        assert_eq!(lists.contains("currencies", " eur "), Some(true));
        assert_eq!(lists.contains("currencies", "GBP"), Some(false));
        assert_eq!(lists.contains("vat", "21"), None);
    }
}
