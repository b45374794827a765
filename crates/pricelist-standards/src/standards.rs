//! The loaded configuration of one validation run.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::alternatives::HeaderAlternatives;
use crate::error::Result;
use crate::global::GlobalValidation;
use crate::mandatory::{InstitutionOverrides, MandatoryBaseline};
use crate::options::CrossCheckOptions;
use crate::reference::ReferenceLists;
use crate::rules::{FieldDefinition, FieldRuleSet, FieldRules, RuleSchema};

pub const HEADER_ALTERNATIVES_FILE: &str = "header_alternatives.json";
pub const FIELD_RULES_FILE: &str = "field_rules.json";
pub const REFERENCE_LISTS_FILE: &str = "reference_lists.json";
pub const INSTITUTION_MANDATORY_FILE: &str = "institution_mandatory.json";
pub const MANDATORY_BASELINE_FILE: &str = "mandatory_baseline.json";

/// Immutable configuration shared by every stage of a run.
#[derive(Debug, Clone)]
pub struct Standards {
    pub alternatives: HeaderAlternatives,
    pub rules: FieldRuleSet,
    pub reference_lists: ReferenceLists,
    pub institutions: InstitutionOverrides,
    pub baseline: MandatoryBaseline,
}

impl Standards {
    pub fn new(alternatives: HeaderAlternatives, rules: FieldRuleSet) -> Self {
        Self {
            alternatives,
            rules,
            reference_lists: ReferenceLists::new(),
            institutions: InstitutionOverrides::new(),
            baseline: MandatoryBaseline::builtin(),
        }
    }

    pub fn with_reference_lists(mut self, reference_lists: ReferenceLists) -> Self {
        self.reference_lists = reference_lists;
        self
    }

    pub fn with_institutions(mut self, institutions: InstitutionOverrides) -> Self {
        self.institutions = institutions;
        self
    }

    pub fn with_baseline(mut self, baseline: MandatoryBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Load every configuration file from `dir`.
    ///
    /// Header alternatives and field rules are required. Reference lists and
    /// institution overrides are optional. The mandatory baseline never fails
    /// to load.
    pub fn load(dir: &Path) -> Result<Self> {
        let alternatives = HeaderAlternatives::load(&dir.join(HEADER_ALTERNATIVES_FILE))?;
        let rules = FieldRuleSet::load(&dir.join(FIELD_RULES_FILE))?;
        let reference_lists = ReferenceLists::load(&dir.join(REFERENCE_LISTS_FILE))?;
        let institutions = InstitutionOverrides::load(&dir.join(INSTITUTION_MANDATORY_FILE))?;
        let baseline = MandatoryBaseline::load(&dir.join(MANDATORY_BASELINE_FILE));

        let standards = Self {
            alternatives,
            rules,
            reference_lists,
            institutions,
            baseline,
        };
        standards.warn_dangling_references();
        info!(
            dir = %dir.display(),
            schema = standards.rules.schema.label(),
            fields = standards.rules.len(),
            alternatives = standards.alternatives.len(),
            reference_lists = standards.reference_lists.len(),
            institutions = standards.institutions.len(),
            "loaded standards"
        );
        Ok(standards)
    }

    pub fn schema(&self) -> RuleSchema {
        self.rules.schema
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.rules.get(name)
    }

    /// A field is known when it has rules or header alternatives.
    pub fn is_known_field(&self, name: &str) -> bool {
        self.rules.contains(name) || self.alternatives.contains_field(name)
    }

    /// `(field, alternatives)` pairs for the resolution table: configured
    /// alternatives first, then fields that only have rules.
    pub fn alternative_entries(&self) -> Vec<(&str, &[String])> {
        let mut entries: Vec<(&str, &[String])> = self
            .alternatives
            .iter()
            .map(|(field, alts)| (field, alts.as_slice()))
            .collect();
        for definition in self.rules.iter() {
            if !self.alternatives.contains_field(&definition.name) {
                entries.push((definition.name.as_str(), &[]));
            }
        }
        entries
    }

    /// Table-level checks of this run. Native files declare their own; legacy
    /// files use the cross-check options.
    pub fn global_validations<'a>(
        &'a self,
        cross_checks: &CrossCheckOptions,
    ) -> Cow<'a, [GlobalValidation]> {
        match self.rules.schema {
            RuleSchema::Native => Cow::Borrowed(self.rules.global_validations.as_slice()),
            RuleSchema::Legacy => Cow::Owned(cross_checks.to_validations()),
        }
    }

    fn warn_dangling_references(&self) {
        for definition in self.rules.iter() {
            let FieldRules::Native(rules) = &definition.rules else {
                continue;
            };
            for rule in rules {
                for list in rule.condition.list_references() {
                    if !self.reference_lists.has_list(list) {
                        warn!(
                            field = %definition.name,
                            code = %rule.code,
                            list,
                            "rule references an unknown reference list"
                        );
                    }
                }
                for other in rule.condition.referenced_fields() {
                    if !self.is_known_field(other) {
                        warn!(
                            field = %definition.name,
                            code = %rule.code,
                            referenced = other,
                            "rule references an unknown field"
                        );
                    }
                }
            }
        }
    }
}

/// Paths of the configuration files under `dir`, in load order.
pub fn standards_files(dir: &Path) -> Vec<PathBuf> {
    [
        HEADER_ALTERNATIVES_FILE,
        FIELD_RULES_FILE,
        REFERENCE_LISTS_FILE,
        INSTITUTION_MANDATORY_FILE,
        MANDATORY_BASELINE_FILE,
    ]
    .iter()
    .map(|name| dir.join(name))
    .collect()
}
