//! Solving `expr = 0` for a single symbol
//!
//! Polynomial forms (linear, quadratic and pure powers, after clearing
//! negative powers) use closed-form roots. Anything else is inverted
//! structurally when the symbol occurs exactly once: the operations wrapped
//! around the symbol are peeled off one at a time and applied inversely to
//! the other side.

use super::simplify::polynomial_in;
use super::Algebra;
use crate::analysis::{contains_symbol, occurrences};
use crate::semantic::{Expr, Function};
use crate::symbol::Symbol;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::collections::BTreeMap;

pub fn solve<A: Algebra + ?Sized>(algebra: &A, expr: &Expr, symbol: &Symbol) -> Vec<Expr> {
    let expr = algebra.simplify(expr);
    if !contains_symbol(&expr, symbol) {
        return Vec::new();
    }

    let raw = match polynomial_in(&expr, symbol) {
        Some(coefficients) => solve_polynomial(algebra, coefficients),
        None if occurrences(&expr, symbol) == 1 => invert(&expr, Expr::zero(), symbol),
        None => Vec::new(),
    };

    let mut solutions: Vec<Expr> = Vec::new();
    for branch in raw {
        let branch = algebra.simplify(&branch);
        if contains_symbol(&branch, symbol) || is_undefined_constant(&branch) {
            continue;
        }
        if !solutions.contains(&branch) {
            solutions.push(branch);
        }
    }
    solutions
}

/// Roots of `Σ coeff_k * x**k = 0`, keyed by integer power `k`
fn solve_polynomial<A: Algebra + ?Sized>(
    algebra: &A,
    coefficients: BTreeMap<i64, Expr>,
) -> Vec<Expr> {
    let lowest = match coefficients.keys().next() {
        Some(&lowest) => lowest,
        None => return Vec::new(),
    };

    let mut roots = Vec::new();
    if lowest > 0 {
        // x**lowest factors out
        roots.push(Expr::zero());
    }
    let shifted: BTreeMap<i64, Expr> = coefficients
        .into_iter()
        .map(|(power, coeff)| (power - lowest, coeff))
        .collect();

    let degree = shifted.keys().next_back().copied().unwrap_or(0);
    let coeff = |power: i64| shifted.get(&power).cloned().unwrap_or_else(Expr::zero);

    if degree == 0 {
        return roots;
    }

    if shifted.len() == 2 {
        // c_d * x**d + c_0 = 0
        let rhs = algebra.simplify(&(-coeff(0) / coeff(degree)));
        roots.extend(nth_roots(algebra, rhs, degree));
        return roots;
    }

    if degree == 2 {
        let (a, b, c) = (coeff(2), coeff(1), coeff(0));
        let discriminant =
            algebra.simplify(&(b.clone() * b.clone() - Expr::num(4) * a.clone() * c));
        if algebra.sign(&discriminant).is_negative() {
            return roots;
        }
        let root = Expr::sqrt(discriminant);
        let denominator = Expr::num(2) * a;
        roots.push((-b.clone() - root.clone()) / denominator.clone());
        roots.push((-b + root) / denominator);
    }
    roots
}

/// Real solutions of `x**degree = rhs`
fn nth_roots<A: Algebra + ?Sized>(algebra: &A, rhs: Expr, degree: i64) -> Vec<Expr> {
    if rhs.is_zero() {
        return vec![Expr::zero()];
    }
    let root = Expr::pow(
        rhs.clone(),
        BigRational::new(1.into(), degree.into()),
    );
    if degree % 2 != 0 {
        return vec![root];
    }
    if algebra.sign(&rhs).is_negative() {
        return Vec::new();
    }
    vec![-root.clone(), root]
}

/// Solve `lhs = rhs` where `symbol` occurs exactly once in `lhs`
fn invert(lhs: &Expr, rhs: Expr, symbol: &Symbol) -> Vec<Expr> {
    match lhs {
        Expr::Sym(s) if s == symbol => vec![rhs],
        Expr::Add(terms) => {
            let (inner, rest) = split_off(terms, symbol);
            match inner {
                Some(inner) => invert(inner, rhs - Expr::Add(rest), symbol),
                None => Vec::new(),
            }
        }
        Expr::Mul(factors) => {
            let (inner, rest) = split_off(factors, symbol);
            match inner {
                Some(inner) => invert(inner, rhs / Expr::Mul(rest), symbol),
                None => Vec::new(),
            }
        }
        Expr::Pow(base, exponent) => {
            let root = Expr::pow(rhs, exponent.recip());
            if (exponent.numer() % 2u32).is_zero() {
                // b**(2k) = r has the two branches b = ±r**(1/2k)
                let mut branches = invert(base, -root.clone(), symbol);
                branches.extend(invert(base, root, symbol));
                branches
            } else {
                invert(base, root, symbol)
            }
        }
        Expr::Func(Function::Abs, arg) => {
            let mut branches = invert(arg, -rhs.clone(), symbol);
            branches.extend(invert(arg, rhs, symbol));
            branches
        }
        Expr::Func(Function::Exp, arg) => invert(arg, Expr::func(Function::Log, rhs), symbol),
        Expr::Func(Function::Log, arg) => invert(arg, Expr::func(Function::Exp, rhs), symbol),
        Expr::Num(_) | Expr::Sym(_) => Vec::new(),
    }
}

/// The single item mentioning `symbol`, and everything else
pub(super) fn split_off<'a>(items: &'a [Expr], symbol: &Symbol) -> (Option<&'a Expr>, Vec<Expr>) {
    let mut inner = None;
    let mut rest = Vec::new();
    for item in items {
        if inner.is_none() && contains_symbol(item, symbol) {
            inner = Some(item);
        } else {
            rest.push(item.clone());
        }
    }
    (inner, rest)
}

/// Constant branches that have no real value, like `(-1)**(1/2)`
fn is_undefined_constant(expr: &Expr) -> bool {
    match expr {
        Expr::Pow(base, exponent) => match base.as_number() {
            Some(value) => {
                (value.is_negative() && (exponent.denom() % 2u32).is_zero())
                    || (value.is_zero() && exponent.is_negative())
            }
            None => false,
        },
        Expr::Add(items) | Expr::Mul(items) => items.iter().any(is_undefined_constant),
        _ => false,
    }
}
