use pricelist_model::{Finding, FindingType};
use pricelist_standards::{AllowedValues, Condition, NativeRule, Operation, RuleSchema};

use super::{Cell, EvalContext, FieldEvaluator};
use crate::diagnostics::Diagnostics;
use crate::error::CheckError;
use crate::numeric::{is_numeric, parse_boolean, parse_number};

/// Evaluator for an ordered list of independent native rules.
#[derive(Debug, Clone, Copy)]
pub struct NativeEvaluator<'a> {
    rules: &'a [NativeRule],
    /// Whether some rule already rejects empty values.
    reports_empty: bool,
}

impl<'a> NativeEvaluator<'a> {
    pub fn new(rules: &'a [NativeRule]) -> Self {
        Self {
            rules,
            reports_empty: rules.iter().any(is_empty_rejection),
        }
    }
}

/// An `is_empty` rejection only applies to fields in the mandatory set.
fn is_empty_rejection(rule: &NativeRule) -> bool {
    matches!(rule.condition, Condition::IsEmpty) && rule.finding_type == FindingType::Rejection
}

impl FieldEvaluator for NativeEvaluator<'_> {
    fn schema(&self) -> RuleSchema {
        RuleSchema::Native
    }

    fn evaluate(
        &self,
        cell: &Cell<'_>,
        ctx: &EvalContext<'_>,
        diagnostics: &mut Diagnostics,
        out: &mut Vec<Finding>,
    ) {
        if cell.mandatory && cell.is_empty() && !self.reports_empty {
            out.push(cell.finding(
                &ctx.codes.mandatory_empty,
                FindingType::Rejection,
                format!("{} is mandatory but empty", cell.field),
            ));
        }
        for rule in self.rules {
            if !cell.mandatory && is_empty_rejection(rule) {
                continue;
            }
            match holds(&rule.condition, cell, ctx) {
                Ok(true) => out.push(cell.finding(
                    &rule.code,
                    rule.finding_type,
                    rule.render_message(cell.field, cell.raw.as_deref()),
                )),
                Ok(false) => {}
                Err(error) => {
                    diagnostics.check_failed(cell.row.ordinal, cell.field, &rule.code, &error);
                }
            }
        }
    }
}

/// Whether `condition` holds for `cell`, i.e. the rule fires.
fn holds(condition: &Condition, cell: &Cell<'_>, ctx: &EvalContext<'_>) -> Result<bool, CheckError> {
    let value = cell.value.as_deref();
    let fired = match condition {
        Condition::IsEmpty => value.is_none(),
        Condition::NotNumeric => value.is_some_and(|v| !is_numeric(v)),
        Condition::NotInList(allowed) => match value {
            Some(v) => !allowed_contains(allowed, v, ctx)?,
            None => false,
        },
        Condition::TooShort { min } => value.is_some_and(|v| v.chars().count() < *min),
        Condition::TooLong { max } => value.is_some_and(|v| v.chars().count() > *max),
        Condition::EmptyWhenDependencyFilled { dependency } => {
            let dependency_filled = ctx.other(cell.row, dependency)?.is_some();
            value.is_none() && dependency_filled
        }
        Condition::CalculationMismatch {
            left,
            right,
            operation,
            tolerance,
        } => {
            let left_value = ctx.other(cell.row, left)?;
            let right_value = ctx.other(cell.row, right)?;
            let (Some(actual), Some(a), Some(b)) = (
                value.and_then(parse_number),
                left_value.as_deref().and_then(parse_number),
                right_value.as_deref().and_then(parse_number),
            ) else {
                return Ok(false);
            };
            let expected = match operation {
                Operation::Multiply => a * b,
                Operation::Divide => {
                    if b == 0.0 {
                        return Err(CheckError::DivisionByZero {
                            divisor: right.clone(),
                        });
                    }
                    a / b
                }
            };
            (actual - expected).abs() > tolerance + f64::EPSILON
        }
        Condition::InvalidBoolean => value.is_some_and(|v| parse_boolean(v).is_none()),
        Condition::InvalidExactLength { lengths } => value.is_some_and(|v| {
            !(v.chars().all(|c| c.is_ascii_digit()) && lengths.contains(&v.chars().count()))
        }),
        Condition::MissingPrefix { prefixes } => {
            value.is_some_and(|v| !prefixes.iter().any(|prefix| starts_with_ignore_case(v, prefix)))
        }
        Condition::MissingSeparator { marker, separator } => value.is_some_and(|v| {
            v.to_lowercase().matches(&marker.to_lowercase()).count() >= 2 && !v.contains(separator.as_str())
        }),
        Condition::NoSiblingFilled { siblings } => {
            if value.is_some() {
                return Ok(false);
            }
            for sibling in siblings {
                if ctx.other(cell.row, sibling)?.is_some() {
                    return Ok(false);
                }
            }
            true
        }
        Condition::VocabularyMismatch {
            classification_field,
            allowed_by_code,
        } => {
            let code = ctx.other(cell.row, classification_field)?;
            match (value, code) {
                (Some(v), Some(code)) => match allowed_by_code.get(&code.to_uppercase()) {
                    Some(allowed) => !allowed_contains(allowed, v, ctx)?,
                    None => false,
                },
                _ => false,
            }
        }
        Condition::ConditionalPrefixRequired {
            source_field,
            prefixes,
        } => {
            let source = ctx.other(cell.row, source_field)?;
            value.is_none()
                && source.is_some_and(|s| {
                    prefixes
                        .iter()
                        .any(|prefix| starts_with_ignore_case(&s, prefix))
                })
        }
    };
    Ok(fired)
}

fn allowed_contains(
    allowed: &AllowedValues,
    value: &str,
    ctx: &EvalContext<'_>,
) -> Result<bool, CheckError> {
    match allowed {
        AllowedValues::Inline(set) => Ok(set.contains(value)),
        AllowedValues::Reference(list) => ctx
            .reference_lists
            .contains(list, value)
            .ok_or_else(|| CheckError::UnknownReferenceList { list: list.clone() }),
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.to_lowercase().starts_with(&prefix.to_lowercase())
}
