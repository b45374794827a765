//! Field-level enums shared by configuration and reporting.

use serde::{Deserialize, Serialize};

/// Whether a field is mandatory or optional in the configured schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Mandatory,
    #[default]
    Optional,
}

/// Expected value format of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatHint {
    #[default]
    Text,
    Numeric,
    Date,
    Boolean,
}

impl FormatHint {
    /// Parse a format hint from configuration. Unknown hints read as text.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "numeric" | "number" | "decimal" | "integer" => Self::Numeric,
            "date" | "datetime" => Self::Date,
            "boolean" | "bool" => Self::Boolean,
            _ => Self::Text,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }
}

/// Synthesized name for the `n`-th column claiming an already-claimed field.
pub fn duplicate_name(field: &str, n: usize) -> String {
    format!("{field}_DUPLICATE_{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hint_parse() {
        assert_eq!(FormatHint::parse("Numeric"), FormatHint::Numeric);
        assert_eq!(FormatHint::parse(" decimal "), FormatHint::Numeric);
        assert_eq!(FormatHint::parse("string"), FormatHint::Text);
        assert_eq!(FormatHint::parse(""), FormatHint::Text);
    }

    #[test]
    fn duplicate_names_are_numbered() {
        assert_eq!(duplicate_name("Price", 2), "Price_DUPLICATE_2");
    }
}
