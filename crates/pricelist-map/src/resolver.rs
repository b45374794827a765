//! Raw column to canonical field resolution.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use pricelist_model::{RawColumn, TableColumn, duplicate_name};

use crate::normalize::{CanonicalKey, normalize};

/// Lookup from normalized header to canonical field name.
///
/// Keys are only ever added through [`ResolutionTable::insert_if_absent`], so
/// the first registration of a key wins regardless of map iteration order.
#[derive(Debug, Clone, Default)]
pub struct ResolutionTable {
    keys: HashMap<CanonicalKey, String>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key -> field` unless the key is empty or already claimed.
    ///
    /// Returns `true` when the mapping was added.
    pub fn insert_if_absent(&mut self, key: CanonicalKey, field: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        match self.keys.get(&key) {
            Some(existing) => {
                if existing != field {
                    debug!(
                        key = %key,
                        field,
                        claimed_by = %existing,
                        "header alternative already claimed, keeping first registration"
                    );
                }
                false
            }
            None => {
                self.keys.insert(key, field.to_string());
                true
            }
        }
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    /// Resolve a raw header through normalization.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.get(&normalize(raw))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Build the resolution table from `field -> alternatives` entries.
///
/// Entries are processed in the order given. For each field its own name is
/// registered first, then each alternative, all with first-writer-wins.
pub fn build_resolution_table<'a, I, A>(alternatives: I) -> ResolutionTable
where
    I: IntoIterator<Item = (&'a str, A)>,
    A: IntoIterator<Item = &'a String>,
{
    let mut table = ResolutionTable::new();
    for (field, alts) in alternatives {
        table.insert_if_absent(normalize(field), field);
        for alt in alts {
            table.insert_if_absent(normalize(alt), field);
        }
    }
    debug!(keys = table.len(), "built header resolution table");
    table
}

/// Where a canonical field came from in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProvenance {
    pub original_name: String,
    pub position: usize,
    pub key: CanonicalKey,
}

/// Result of resolving one header row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderResolution {
    /// Every input column with its assigned name, in input order.
    pub columns: Vec<TableColumn>,
    /// Columns that matched no field and are not ignored.
    pub unmapped: Vec<RawColumn>,
    /// Fields claimed by more than one column: the first claimant followed by
    /// each `_DUPLICATE_<n>` column.
    pub duplicates: BTreeMap<String, Vec<TableColumn>>,
    /// Canonical field to the column that first claimed it.
    pub provenance: BTreeMap<String, ColumnProvenance>,
}

impl HeaderResolution {
    /// Assigned column names in input order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Whether a canonical field was resolved from some input column.
    pub fn is_mapped(&self, field: &str) -> bool {
        self.provenance.contains_key(field)
    }

    /// `original -> assigned` pairs for columns whose name changed.
    pub fn renamed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .filter(|column| column.original_name != column.name)
            .map(|column| (column.original_name.as_str(), column.name.as_str()))
    }
}

/// Assigned column names. Synthesized names skip every name already assigned
/// and every raw header, so a supplier column literally called
/// `Foo_DUPLICATE_2` keeps its name.
struct ColumnNames {
    raw: HashSet<String>,
    assigned: HashSet<String>,
}

impl ColumnNames {
    fn new(raw_columns: &[RawColumn]) -> Self {
        Self {
            raw: raw_columns.iter().map(|raw| raw.name.clone()).collect(),
            assigned: HashSet::new(),
        }
    }

    /// `name` itself, or a numbered name when it is already taken.
    fn own(&mut self, name: &str) -> String {
        if self.assigned.insert(name.to_string()) {
            name.to_string()
        } else {
            self.duplicate(name, 2)
        }
    }

    /// First free `<base>_DUPLICATE_<n>` with `n >= start`.
    fn duplicate(&mut self, base: &str, start: usize) -> String {
        let mut n = start;
        loop {
            let candidate = duplicate_name(base, n);
            if !self.raw.contains(&candidate) && self.assigned.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Resolve raw headers against a [`ResolutionTable`].
///
/// Never fails: unresolved columns keep their own name. A column whose
/// normalized form starts with one of `ignore_prefixes` is not reported as
/// unmapped.
pub fn resolve_headers(
    raw_columns: &[RawColumn],
    table: &ResolutionTable,
    ignore_prefixes: &[String],
) -> HeaderResolution {
    let mut resolution = HeaderResolution::default();
    let mut claims: HashMap<String, usize> = HashMap::new();
    let mut first_claimant: HashMap<String, TableColumn> = HashMap::new();
    let mut names = ColumnNames::new(raw_columns);

    for raw in raw_columns {
        let key = normalize(&raw.name);
        match table.get(&key) {
            Some(field) => {
                let count = claims.entry(field.to_string()).or_insert(0);
                *count += 1;
                if *count == 1 {
                    let column = TableColumn {
                        name: names.own(field),
                        original_name: raw.name.clone(),
                        position: raw.position,
                    };
                    first_claimant.insert(field.to_string(), column.clone());
                    resolution.provenance.insert(
                        field.to_string(),
                        ColumnProvenance {
                            original_name: raw.name.clone(),
                            position: raw.position,
                            key,
                        },
                    );
                    resolution.columns.push(column);
                } else {
                    let column = TableColumn {
                        name: names.duplicate(field, *count),
                        original_name: raw.name.clone(),
                        position: raw.position,
                    };
                    warn!(
                        field,
                        column = %raw.name,
                        position = raw.position,
                        "field claimed by more than one column"
                    );
                    let entry = resolution.duplicates.entry(field.to_string()).or_default();
                    if entry.is_empty()
                        && let Some(first) = first_claimant.get(field)
                    {
                        entry.push(first.clone());
                    }
                    entry.push(column.clone());
                    resolution.columns.push(column);
                }
            }
            None => {
                let count = claims.entry(raw.name.clone()).or_insert(0);
                *count += 1;
                let name = if *count == 1 {
                    names.own(&raw.name)
                } else {
                    names.duplicate(&raw.name, *count)
                };
                if *count == 1 {
                    first_claimant.insert(
                        raw.name.clone(),
                        TableColumn {
                            name: name.clone(),
                            original_name: raw.name.clone(),
                            position: raw.position,
                        },
                    );
                }
                let ignored = ignore_prefixes
                    .iter()
                    .any(|prefix| !prefix.is_empty() && key.starts_with(prefix));
                if ignored {
                    debug!(column = %raw.name, "ignoring reserved column");
                } else {
                    resolution.unmapped.push(raw.clone());
                }
                resolution.columns.push(TableColumn {
                    name,
                    original_name: raw.name.clone(),
                    position: raw.position,
                });
            }
        }
    }

    if !resolution.unmapped.is_empty() {
        debug!(
            count = resolution.unmapped.len(),
            "columns did not match any known field"
        );
    }
    resolution
}
