use pricelist_model::{Finding, FindingType, FormatHint};
use pricelist_standards::{LegacyRules, RuleSchema};

use super::{Cell, EvalContext, FieldEvaluator};
use crate::diagnostics::Diagnostics;
use crate::numeric::parse_decimal;

/// Evaluator for the flat legacy property set.
#[derive(Debug, Clone, Copy)]
pub struct LegacyEvaluator<'a> {
    rules: &'a LegacyRules,
    format: FormatHint,
}

impl<'a> LegacyEvaluator<'a> {
    pub fn new(rules: &'a LegacyRules, format: FormatHint) -> Self {
        Self { rules, format }
    }

    /// Globally mandatory, or the dependency field holds its trigger.
    fn is_required(
        &self,
        cell: &Cell<'_>,
        ctx: &EvalContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        if cell.mandatory {
            return true;
        }
        let Some(dependency) = &self.rules.dependency else {
            return false;
        };
        match ctx.other(cell.row, &dependency.field) {
            Ok(Some(value)) => match &dependency.value {
                Some(trigger) => value.eq_ignore_ascii_case(trigger.trim()),
                None => true,
            },
            Ok(None) => false,
            Err(error) => {
                diagnostics.check_failed(
                    cell.row.ordinal,
                    cell.field,
                    &self.rules.codes.required,
                    &error,
                );
                false
            }
        }
    }
}

impl FieldEvaluator for LegacyEvaluator<'_> {
    fn schema(&self) -> RuleSchema {
        RuleSchema::Legacy
    }

    fn evaluate(
        &self,
        cell: &Cell<'_>,
        ctx: &EvalContext<'_>,
        diagnostics: &mut Diagnostics,
        out: &mut Vec<Finding>,
    ) {
        let rules = self.rules;
        let codes = &rules.codes;
        let field = cell.field;

        let Some(value) = cell.value.as_deref() else {
            if self.is_required(cell, ctx, diagnostics) {
                out.push(cell.finding(
                    &codes.required,
                    FindingType::Rejection,
                    format!("{field} is mandatory but empty"),
                ));
            }
            return;
        };
        let severity = rules.severity;

        if self.format.is_numeric() {
            match parse_decimal(value, rules.decimal_separator) {
                None => out.push(cell.finding(
                    &codes.not_numeric,
                    severity,
                    format!(
                        "{field} is not a number (decimal separator '{}')",
                        rules.decimal_separator
                    ),
                )),
                Some(parsed) => {
                    if let Some(max) = rules.max_integer_digits
                        && parsed.integer_digits > max
                    {
                        out.push(cell.finding(
                            &codes.integer_digits,
                            severity,
                            format!("{field} has more than {max} integer digits"),
                        ));
                    }
                    if let Some(max) = rules.max_decimal_digits
                        && parsed.decimal_digits > max
                    {
                        out.push(cell.finding(
                            &codes.decimal_digits,
                            severity,
                            format!("{field} has more than {max} decimal digits"),
                        ));
                    }
                }
            }
        } else if self.format == FormatHint::Text {
            let length = value.chars().count();
            if let Some(min) = rules.min_length
                && length < min
            {
                out.push(cell.finding(
                    &codes.too_short,
                    severity,
                    format!("{field} is shorter than {min} characters"),
                ));
            }
            if let Some(max) = rules.max_length
                && length > max
            {
                out.push(cell.finding(
                    &codes.too_long,
                    severity,
                    format!("{field} is longer than {max} characters"),
                ));
            }
            if !rules.allows(value) {
                out.push(cell.finding(
                    &codes.not_allowed,
                    severity,
                    format!("{field} is not one of the allowed values"),
                ));
            }
        }

        if let Some(pattern) = &rules.pattern
            && !pattern.is_match(value)
        {
            out.push(cell.finding(
                &codes.invalid_format,
                severity,
                format!("{field} does not match the expected format"),
            ));
        }
    }
}
