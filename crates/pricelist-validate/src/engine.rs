//! Rule engine executing per-cell rules over a resolved table.
//!
//! One evaluator is chosen per field when the engine is built: legacy fields
//! get a [`LegacyEvaluator`], native fields a [`NativeEvaluator`]. Mandatory
//! fields without any configured rules still get a native evaluator with an
//! empty rule list so that empty cells are reported.

use std::collections::BTreeSet;

use tracing::{debug, info_span};

use pricelist_model::{Finding, Table};
use pricelist_standards::{FieldRules, FindingCodes, ReferenceLists, RuleSchema, Standards};

use crate::diagnostics::Diagnostics;
use crate::emptiness::Emptiness;
use crate::evaluator::{Cell, EvalContext, FieldEvaluator, LegacyEvaluator, NativeEvaluator};

struct FieldPlan<'a> {
    field: String,
    mandatory: bool,
    evaluator: Box<dyn FieldEvaluator + 'a>,
}

/// Per-row rule evaluation for one run.
pub struct RuleEngine<'a> {
    plans: Vec<FieldPlan<'a>>,
    reference_lists: &'a ReferenceLists,
    codes: &'a FindingCodes,
    emptiness: &'a Emptiness,
}

impl<'a> RuleEngine<'a> {
    /// Build the engine from loaded standards and the authoritative
    /// mandatory-field set.
    pub fn new(
        standards: &'a Standards,
        mandatory_fields: &[String],
        emptiness: &'a Emptiness,
        codes: &'a FindingCodes,
    ) -> Self {
        let mandatory: BTreeSet<&str> = mandatory_fields.iter().map(String::as_str).collect();
        let mut plans: Vec<FieldPlan<'a>> = Vec::new();

        for definition in standards.rules.iter() {
            let evaluator: Box<dyn FieldEvaluator + 'a> = match &definition.rules {
                FieldRules::Legacy(rules) => {
                    Box::new(LegacyEvaluator::new(rules, definition.format))
                }
                FieldRules::Native(rules) => Box::new(NativeEvaluator::new(rules)),
            };
            plans.push(FieldPlan {
                field: definition.name.clone(),
                mandatory: mandatory.contains(definition.name.as_str()),
                evaluator,
            });
        }

        for field in mandatory_fields {
            if standards.rules.contains(field) {
                continue;
            }
            debug!(field = %field, "mandatory field has no rules, checking emptiness only");
            plans.push(FieldPlan {
                field: field.clone(),
                mandatory: true,
                evaluator: Box::new(NativeEvaluator::new(&[])),
            });
        }

        Self {
            plans,
            reference_lists: &standards.reference_lists,
            codes,
            emptiness,
        }
    }

    /// Fields with an evaluator, with the schema generation used.
    pub fn fields(&self) -> impl Iterator<Item = (&str, RuleSchema)> {
        self.plans
            .iter()
            .map(|plan| (plan.field.as_str(), plan.evaluator.schema()))
    }

    /// Evaluate every planned field present in `table` on every row.
    ///
    /// Findings come out row by row; within a row, in plan order.
    pub fn execute(&self, table: &Table, diagnostics: &mut Diagnostics) -> Vec<Finding> {
        let active: Vec<&FieldPlan<'a>> = self
            .plans
            .iter()
            .filter(|plan| table.has_column(&plan.field))
            .collect();
        let span = info_span!("rule_engine", rows = table.len(), fields = active.len());
        let _guard = span.enter();

        let ctx = EvalContext {
            table,
            emptiness: self.emptiness,
            reference_lists: self.reference_lists,
            codes: self.codes,
        };
        let mut findings = Vec::new();
        for row in &table.rows {
            for plan in &active {
                let cell = Cell::new(
                    row,
                    &plan.field,
                    table.original_name(&plan.field),
                    self.emptiness,
                    plan.mandatory,
                );
                plan.evaluator.evaluate(&cell, &ctx, diagnostics, &mut findings);
            }
        }
        debug!(findings = findings.len(), "rule engine finished");
        findings
    }
}
