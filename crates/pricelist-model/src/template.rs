//! Template variants and the generation context embedded by the generator.

use serde::{Deserialize, Serialize};

/// How the workbook was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Written by the template generator; may carry an embedded context.
    Generator,
    /// Current standard layout.
    Default,
    /// Legacy or third-party layout.
    #[default]
    Alternative,
}

impl TemplateKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generator => "Generator",
            Self::Default => "Default",
            Self::Alternative => "Alternative",
        }
    }
}

/// Context built once per workbook and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateContext {
    pub template_kind: TemplateKind,
    /// True when the generator context parsed and carries a mandatory list.
    pub context_usable: bool,
    pub visible_fields: Vec<String>,
    pub mandatory_fields: Vec<String>,
    pub hidden_fields: Vec<String>,
    pub institution_codes: Vec<String>,
    pub product_types: Vec<String>,
    pub gs1_mode: Option<String>,
    pub has_staffel: bool,
}

impl TemplateContext {
    /// Context for a non-generator workbook, or a generator whose embedded
    /// context could not be read.
    pub fn bare(template_kind: TemplateKind) -> Self {
        Self {
            template_kind,
            ..Self::default()
        }
    }
}
