//! The shared "is this cell empty" rule.

use std::borrow::Cow;
use std::collections::HashSet;

use pricelist_model::{CellValue, Row};
use pricelist_standards::ValidatorOptions;

/// A value is empty when it is missing, blank after trimming, or its trimmed
/// lower-cased text is one of the configured invalid values.
#[derive(Debug, Clone, Default)]
pub struct Emptiness {
    invalid: HashSet<String>,
}

impl Emptiness {
    pub fn new<I, S>(invalid_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            invalid: invalid_values
                .into_iter()
                .map(|value| value.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_options(options: &ValidatorOptions) -> Self {
        Self::new(&options.invalid_values)
    }

    pub fn is_empty(&self, value: Option<&str>) -> bool {
        match value {
            None => true,
            Some(value) => {
                let trimmed = value.trim();
                trimmed.is_empty() || self.invalid.contains(&trimmed.to_lowercase())
            }
        }
    }

    pub fn is_empty_cell(&self, cell: Option<&CellValue>) -> bool {
        self.is_empty(cell.and_then(CellValue::as_text).as_deref())
    }

    /// Trimmed text of a non-empty field value, `None` when empty or absent.
    pub fn value<'a>(&self, row: &'a Row, field: &str) -> Option<Cow<'a, str>> {
        let text = row.text(field)?;
        if self.is_empty(Some(&*text)) {
            return None;
        }
        Some(match text {
            Cow::Borrowed(text) => Cow::Borrowed(text.trim()),
            Cow::Owned(text) => Cow::Owned(text.trim().to_string()),
        })
    }

    pub fn is_filled(&self, row: &Row, field: &str) -> bool {
        self.value(row, field).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_values_match_any_case_and_padding() {
        let emptiness = Emptiness::new(["", "N/A"]);
        assert!(emptiness.is_empty(Some("  n/a ")));
        assert!(emptiness.is_empty(Some("N/A")));
        assert!(emptiness.is_empty(Some("\t")));
        assert!(emptiness.is_empty(None));
        assert!(!emptiness.is_empty(Some("NA")));
    }

    #[test]
    fn value_is_trimmed() {
        let emptiness = Emptiness::new(["n/a"]);
        let row = Row::new(2).with_cell("GTIN", " 123 ").with_cell("Brand", "N/A");
        assert_eq!(emptiness.value(&row, "GTIN").as_deref(), Some("123"));
        assert!(emptiness.value(&row, "Brand").is_none());
        assert!(!emptiness.is_filled(&row, "Missing"));
    }
}
