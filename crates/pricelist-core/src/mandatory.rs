//! Authoritative mandatory-field set for one workbook.

use serde::Serialize;
use tracing::{debug, info, warn};

use pricelist_model::{TemplateContext, TemplateKind};
use pricelist_standards::{BaselineSource, Standards};

/// Where the mandatory set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MandatorySource {
    /// Mandatory list embedded by the generator, plus institution extras.
    EmbeddedContext,
    /// `mandatory_baseline.json`.
    ConfiguredBaseline,
    /// Built-in baseline list.
    BuiltInBaseline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MandatoryFieldSet {
    /// Known fields only, in resolution order.
    pub fields: Vec<String>,
    pub source: MandatorySource,
    /// Mandatory fields without an input column.
    pub absent: Vec<String>,
}

impl MandatoryFieldSet {
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolve the mandatory set from the template context.
///
/// A generator workbook with a usable context uses its embedded list united
/// with the extra fields of its institutions. Every other workbook is held to
/// the baseline. Names the standards do not know are dropped.
pub fn resolve_mandatory_fields(
    context: &TemplateContext,
    standards: &Standards,
    columns: &[&str],
) -> MandatoryFieldSet {
    let (candidates, source) =
        if context.template_kind == TemplateKind::Generator && context.context_usable {
            let mut fields = context.mandatory_fields.clone();
            for extra in standards
                .institutions
                .extra_fields(&context.institution_codes)
            {
                if !fields.contains(&extra) {
                    debug!(field = %extra, "institution adds mandatory field");
                    fields.push(extra);
                }
            }
            (fields, MandatorySource::EmbeddedContext)
        } else {
            let source = match standards.baseline.source {
                BaselineSource::Configured => MandatorySource::ConfiguredBaseline,
                BaselineSource::BuiltIn => MandatorySource::BuiltInBaseline,
            };
            (standards.baseline.fields.clone(), source)
        };

    let mut fields = Vec::with_capacity(candidates.len());
    for field in candidates {
        if !standards.is_known_field(&field) {
            warn!(field = %field, "mandatory field is not defined in the standards, dropping");
            continue;
        }
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    let absent: Vec<String> = fields
        .iter()
        .filter(|field| !columns.contains(&field.as_str()))
        .cloned()
        .collect();

    info!(
        ?source,
        mandatory = fields.len(),
        absent = absent.len(),
        "resolved mandatory fields"
    );
    MandatoryFieldSet {
        fields,
        source,
        absent,
    }
}
