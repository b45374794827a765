//! Price-list validation pipeline.
//!
//! Ties header resolution, template classification, mandatory-field
//! resolution, rule evaluation, cross-row checks and aggregation into
//! [`validate_workbook`].

#![deny(unsafe_code)]

pub mod classifier;
pub mod mandatory;
pub mod pipeline;

pub use classifier::classify_template;
pub use mandatory::{MandatoryFieldSet, MandatorySource, resolve_mandatory_fields};
pub use pipeline::{ValidationOutcome, validate_workbook};
