#![deny(unsafe_code)]

pub mod alternatives;
pub mod error;
pub mod global;
pub mod mandatory;
pub mod options;
pub mod reference;
pub mod rules;
pub mod standards;

pub use crate::alternatives::HeaderAlternatives;
pub use crate::error::StandardsError;
pub use crate::global::{
    DimensionSetCheck, DuplicateUrlCheck, GlobalValidation, PackagingCheck, UomRelationshipCheck,
};
pub use crate::mandatory::{
    BUILTIN_BASELINE, BaselineSource, InstitutionOverrides, MandatoryBaseline,
};
pub use crate::options::{ClassifierOptions, CrossCheckOptions, FindingCodes, ValidatorOptions};
pub use crate::reference::ReferenceLists;
pub use crate::rules::legacy::{LegacyCodes, LegacyDependency, LegacyRules};
pub use crate::rules::native::{AllowedValues, Condition, NativeRule, Operation, ValueSet};
pub use crate::rules::{FieldDefinition, FieldRuleSet, FieldRules, RuleSchema};
pub use crate::standards::{Standards, standards_files};
