//! Rule evaluation for resolved price-list tables.
//!
//! - [`RuleEngine`] applies per-field rules cell by cell, in either the legacy
//!   or the native schema generation.
//! - [`validate_cross_row`] runs checks that relate several fields or rows.
//! - [`aggregate`] turns findings into field statistics and a run summary.
//!
//! Checks that cannot run (missing columns, division by zero, unknown
//! reference lists) are recorded in [`Diagnostics`] instead of failing.

#![deny(unsafe_code)]

pub mod aggregate;
pub mod cross_row;
pub mod diagnostics;
pub mod emptiness;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod numeric;

pub use aggregate::{Aggregation, aggregate};
pub use cross_row::{CrossRowInput, validate_cross_row};
pub use diagnostics::{Anomaly, AnomalyKind, Diagnostics};
pub use emptiness::Emptiness;
pub use engine::RuleEngine;
pub use error::CheckError;
pub use evaluator::{Cell, EvalContext, FieldEvaluator, LegacyEvaluator, NativeEvaluator};
pub use numeric::{ParsedDecimal, is_numeric, parse_boolean, parse_decimal, parse_number};
