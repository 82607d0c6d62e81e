//! Evaluator for validations and imputation formulas
//!
//! Substitutes the concrete values of one row into a derived expression.
//! Stateless: it never mutates the assignment and never fails because a value
//! is missing.

pub mod expression;
pub mod operations;

use crate::assignment::Assignment;
use crate::constraint::{Normalized, RelationKind};
use crate::imputation::ImputationRule;
use crate::index::Validation;
use crate::operation_result::OperationResult;
use crate::semantic::Expr;
use expression::{evaluate_expression, evaluate_terms};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Outcome of checking one validation against one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Satisfied,
    Violated,
    /// A symbol is missing or the arithmetic is undefined for this row
    Indeterminate,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Satisfied => write!(f, "satisfied"),
            Verdict::Violated => write!(f, "violated"),
            Verdict::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Outcome of applying one imputation rule to one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Computed {
    Value(Decimal),
    NotApplicable,
}

impl Computed {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Computed::Value(value) => Some(*value),
            Computed::NotApplicable => None,
        }
    }
}

/// Relative tolerance for equalities, scaled by the largest term magnitude
fn relative_tolerance() -> Decimal {
    Decimal::new(1, 9)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Check a validation against a row
    pub fn evaluate(&self, validation: &Validation, assignment: &Assignment) -> Verdict {
        let verdict = self.evaluate_normalized(validation.normalized(), assignment);
        trace!(validation = %validation.relation(), %verdict, "evaluated validation");
        verdict
    }

    /// Check a zero-compared relation against a row.
    ///
    /// Equalities hold within `1e-9` of the largest term magnitude, non-strict
    /// inequalities get the same slack; strict inequalities are decided exactly.
    pub fn evaluate_normalized(&self, normalized: &Normalized, assignment: &Assignment) -> Verdict {
        let terms = match evaluate_terms(&normalized.expr, assignment) {
            Ok(terms) => terms,
            Err(veto) => {
                trace!(relation = %normalized, %veto, "validation indeterminate");
                return Verdict::Indeterminate;
            }
        };

        let mut sum = Decimal::ZERO;
        let mut largest = Decimal::ZERO;
        for term in &terms {
            sum = match sum.checked_add(*term) {
                Some(sum) => sum,
                None => return Verdict::Indeterminate,
            };
            largest = largest.max(term.abs());
        }
        let tolerance = largest
            .checked_mul(relative_tolerance())
            .unwrap_or(Decimal::MAX);

        let holds = match normalized.kind {
            RelationKind::Equal => sum.abs() <= tolerance,
            RelationKind::LessEqual => sum <= tolerance,
            RelationKind::Less => sum < Decimal::ZERO,
        };
        if holds {
            Verdict::Satisfied
        } else {
            Verdict::Violated
        }
    }

    /// Value of a rule's formula for a row
    pub fn compute(&self, rule: &ImputationRule, assignment: &Assignment) -> Computed {
        match self.evaluate_expr(rule.formula(), assignment) {
            Ok(value) => Computed::Value(value),
            Err(veto) => {
                trace!(rule = %rule, %veto, "imputation not applicable");
                Computed::NotApplicable
            }
        }
    }

    /// Value of an arbitrary expression for a row
    pub fn evaluate_expr(&self, expr: &Expr, assignment: &Assignment) -> OperationResult {
        evaluate_expression(expr, assignment)
    }
}
