//! Expression evaluation
//!
//! Recursively substitutes an assignment into an expression tree.

use super::operations::{
    add, apply, divide, integer_to_decimal, multiply, power, rational_to_decimal,
};
use crate::assignment::Assignment;
use crate::operation_result::{OperationResult, Veto};
use crate::semantic::Expr;
use num_traits::Signed;
use rust_decimal::Decimal;

/// Evaluate `expr` with the symbol values of `assignment`.
///
/// Stops at the first missing symbol or undefined operation.
pub fn evaluate_expression(expr: &Expr, assignment: &Assignment) -> OperationResult {
    match expr {
        Expr::Num(value) => rational_to_decimal(value),

        Expr::Sym(symbol) => assignment
            .get(symbol.name())
            .ok_or_else(|| Veto::Missing(symbol.name().to_string())),

        Expr::Add(items) => items.iter().try_fold(Decimal::ZERO, |acc, item| {
            add(acc, evaluate_expression(item, assignment)?)
        }),

        Expr::Mul(items) => {
            // Divide once at the end so that `18/9` is exactly `2`
            let mut numer = Decimal::ONE;
            let mut denom = Decimal::ONE;
            for item in items {
                match item {
                    Expr::Num(value) => {
                        numer = multiply(numer, integer_to_decimal(value.numer())?)?;
                        denom = multiply(denom, integer_to_decimal(value.denom())?)?;
                    }
                    Expr::Pow(base, exponent) if exponent.is_negative() => {
                        let base = evaluate_expression(base, assignment)?;
                        denom = multiply(denom, power(base, &-exponent)?)?;
                    }
                    other => numer = multiply(numer, evaluate_expression(other, assignment)?)?,
                }
            }
            divide(numer, denom)
        }

        Expr::Pow(base, exponent) => power(evaluate_expression(base, assignment)?, exponent),

        Expr::Func(function, arg) => apply(*function, evaluate_expression(arg, assignment)?),
    }
}

/// Values of the top-level terms of `expr`: the items of a sum, or `expr` itself
pub fn evaluate_terms(expr: &Expr, assignment: &Assignment) -> Result<Vec<Decimal>, Veto> {
    match expr {
        Expr::Add(items) => items
            .iter()
            .map(|item| evaluate_expression(item, assignment))
            .collect(),
        other => Ok(vec![evaluate_expression(other, assignment)?]),
    }
}
