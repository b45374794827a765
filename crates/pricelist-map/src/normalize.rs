//! Header normalization.
//!
//! The same function builds the lookup keys from configured alternatives and
//! normalizes incoming headers, so it must stay pure: identical input always
//! yields the identical key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized header used as a dictionary key. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a raw header into a [`CanonicalKey`].
///
/// - keep the text before the first line break
/// - append the first `( … )` qualifier found on a later line
/// - cut at the first underscore that is not the leading character
/// - trim (Unicode whitespace, non-breaking space and BOM included) and lower-case
pub fn normalize(raw: &str) -> CanonicalKey {
    let mut lines = raw.split(['\r', '\n']);
    let primary = trim_header(lines.next().unwrap_or_default());
    let qualifier = lines.find_map(first_qualifier);

    let mut key = primary.to_string();
    if let Some(qualifier) = qualifier {
        if !key.is_empty() {
            key.push(' ');
        }
        key.push_str(qualifier);
    }

    if let Some((pos, _)) = key.char_indices().skip(1).find(|(_, c)| *c == '_') {
        key.truncate(pos);
    }

    CanonicalKey(trim_header(&key).to_lowercase())
}

/// Normalize an optional header cell; missing headers yield an empty key.
pub fn normalize_opt(raw: Option<&str>) -> CanonicalKey {
    raw.map(normalize).unwrap_or_default()
}

fn trim_header(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn first_qualifier(line: &str) -> Option<&str> {
    let open = line.find('(')?;
    let close = open + line[open..].find(')')?;
    Some(&line[open..=close])
}
