//! Isolating a symbol in an inequality
//!
//! `expr < 0` is rewritten into bounds `lower < x` and `x < upper`. Every
//! rewrite step must be justified by a proven sign: dividing by a coefficient
//! of unknown sign, taking a root of a bound that may be negative, or
//! splitting `x**2 > t` into a disjunction all make the isolation fail.

use super::simplify::polynomial_in;
use super::solve::split_off;
use super::Algebra;
use crate::analysis::{contains_symbol, occurrences};
use crate::semantic::{Expr, Function};
use crate::symbol::Symbol;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::collections::BTreeMap;

/// One side of an isolated symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bound {
    pub expr: Expr,
    pub strict: bool,
}

/// Bounds implied for one symbol: `lower < x` for every lower bound and
/// `x < upper` for every upper bound (`<=` when not strict)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub lower: Vec<Bound>,
    pub upper: Vec<Bound>,
}

impl Range {
    fn one_sided(side: Side, bound: Bound) -> Self {
        match side {
            Side::Below => Range {
                lower: Vec::new(),
                upper: vec![bound],
            },
            Side::Above => Range {
                lower: vec![bound],
                upper: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty() && self.upper.is_empty()
    }

    fn merge(first: Option<Range>, second: Option<Range>) -> Option<Range> {
        match (first, second) {
            (Some(mut first), Some(second)) => {
                first.lower.extend(second.lower);
                first.upper.extend(second.upper);
                Some(first)
            }
            (Some(range), None) | (None, Some(range)) => Some(range),
            (None, None) => None,
        }
    }
}

/// Which way the peeled side compares against the other: `lhs < rhs` or `lhs > rhs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Below,
    Above,
}

impl Side {
    fn flip(self) -> Self {
        match self {
            Side::Below => Side::Above,
            Side::Above => Side::Below,
        }
    }
}

pub fn bound<A: Algebra + ?Sized>(
    algebra: &A,
    expr: &Expr,
    strict: bool,
    symbol: &Symbol,
) -> Option<Range> {
    let expr = algebra.simplify(expr);
    if !contains_symbol(&expr, symbol) {
        return None;
    }

    let range = if occurrences(&expr, symbol) == 1 {
        peel(algebra, &expr, Side::Below, strict, Expr::zero(), symbol)
    } else {
        collect_and_peel(algebra, &expr, strict, symbol)
    }?;

    let simplify_all = |bounds: Vec<Bound>| -> Vec<Bound> {
        let mut simplified: Vec<Bound> = Vec::new();
        for bound in bounds {
            let bound = Bound {
                expr: algebra.simplify(&bound.expr),
                strict: bound.strict,
            };
            if !contains_symbol(&bound.expr, symbol) && !simplified.contains(&bound) {
                simplified.push(bound);
            }
        }
        simplified
    };
    let range = Range {
        lower: simplify_all(range.lower),
        upper: simplify_all(range.upper),
    };
    (!range.is_empty()).then_some(range)
}

/// Several occurrences: collect the symbol's powers, then peel a single occurrence
fn collect_and_peel<A: Algebra + ?Sized>(
    algebra: &A,
    expr: &Expr,
    strict: bool,
    symbol: &Symbol,
) -> Option<Range> {
    let coefficients = polynomial_in(expr, symbol)?;
    let lowest = *coefficients.keys().next()?;

    // Clearing x**-k multiplies through by x**k, whose sign must be known
    let mut side = Side::Below;
    if lowest < 0 {
        let multiplier = algebra.sign(&Expr::powi(Expr::symbol(symbol), -lowest));
        if multiplier.is_negative() {
            side = Side::Above;
        } else if !multiplier.is_positive() {
            return None;
        }
    }
    let shifted: BTreeMap<i64, Expr> = coefficients
        .into_iter()
        .map(|(power, coeff)| (power - lowest.min(0), coeff))
        .collect();
    let coeff = |power: i64| shifted.get(&power).cloned().unwrap_or_else(Expr::zero);
    let x = Expr::symbol(symbol);

    match shifted.keys().next_back().copied() {
        Some(1) if shifted.keys().all(|power| *power == 0 || *power == 1) => {
            let lhs = Expr::Mul(vec![coeff(1), x]);
            peel(algebra, &lhs, side, strict, -coeff(0), symbol)
        }
        Some(2) if shifted.keys().all(|power| (0..=2).contains(power)) => {
            // a*x**2 + b*x + c  ==  a*(x + b/2a)**2 - (b**2 - 4ac)/4a
            let (a, b, c) = (coeff(2), coeff(1), coeff(0));
            let lead = algebra.sign(&algebra.simplify(&a));
            let side = if lead.is_positive() {
                side
            } else if lead.is_negative() {
                side.flip()
            } else {
                return None;
            };
            let shift = algebra.simplify(&(b.clone() / (Expr::num(2) * a.clone())));
            let square = Expr::powi(Expr::Add(vec![x, shift]), 2);
            let rhs = (b.clone() * b - Expr::num(4) * a.clone() * c)
                / (Expr::num(4) * a.clone() * a);
            peel(algebra, &square, side, strict, algebra.simplify(&rhs), symbol)
        }
        _ => None,
    }
}

/// Isolate `symbol` in `lhs <side> rhs`, where `symbol` occurs once in `lhs`
fn peel<A: Algebra + ?Sized>(
    algebra: &A,
    lhs: &Expr,
    side: Side,
    strict: bool,
    rhs: Expr,
    symbol: &Symbol,
) -> Option<Range> {
    match lhs {
        Expr::Sym(s) if s == symbol => Some(Range::one_sided(side, Bound { expr: rhs, strict })),
        Expr::Add(terms) => {
            let (inner, rest) = split_off(terms, symbol);
            peel(algebra, inner?, side, strict, rhs - Expr::Add(rest), symbol)
        }
        Expr::Mul(factors) => {
            let (inner, rest) = split_off(factors, symbol);
            let coeff = algebra.simplify(&Expr::Mul(rest));
            let sign = algebra.sign(&coeff);
            let side = if sign.is_positive() {
                side
            } else if sign.is_negative() {
                side.flip()
            } else {
                tracing::debug!(coefficient = %coeff, "cannot divide by coefficient of unknown sign");
                return None;
            };
            peel(algebra, inner?, side, strict, rhs / coeff, symbol)
        }
        Expr::Pow(base, exponent) => peel_power(algebra, base, exponent, side, strict, rhs, symbol),
        Expr::Func(Function::Abs, arg) => match side {
            // |u| < r  =>  -r < u < r
            Side::Below => Range::merge(
                peel(algebra, arg, Side::Above, strict, -rhs.clone(), symbol),
                peel(algebra, arg, Side::Below, strict, rhs, symbol),
            ),
            Side::Above => None,
        },
        Expr::Func(Function::Exp, arg) => {
            if side == Side::Above && !rhs_sign(algebra, &rhs).is_positive() {
                return None;
            }
            peel(algebra, arg, side, strict, Expr::func(Function::Log, rhs), symbol)
        }
        Expr::Func(Function::Log, arg) => {
            peel(algebra, arg, side, strict, Expr::func(Function::Exp, rhs), symbol)
        }
        Expr::Num(_) | Expr::Sym(_) => None,
    }
}

fn peel_power<A: Algebra + ?Sized>(
    algebra: &A,
    base: &Expr,
    exponent: &BigRational,
    side: Side,
    strict: bool,
    rhs: Expr,
    symbol: &Symbol,
) -> Option<Range> {
    let numer_even = (exponent.numer() % 2u32).is_zero();
    let denom_even = (exponent.denom() % 2u32).is_zero();
    let base_sign = algebra.sign(base);
    let root = |value: Expr| Expr::pow(value, exponent.recip());

    if exponent.is_negative() {
        // Decreasing on positive bases only
        if !base_sign.is_positive() {
            return None;
        }
        return match side {
            Side::Below => peel(algebra, base, Side::Above, strict, root(rhs), symbol),
            Side::Above if rhs_sign(algebra, &rhs).is_positive() => {
                peel(algebra, base, Side::Below, strict, root(rhs), symbol)
            }
            Side::Above => None,
        };
    }

    if !numer_even && !denom_even {
        // Odd powers and odd roots are increasing on the whole real line
        return peel(algebra, base, side, strict, root(rhs), symbol);
    }

    if base_sign.is_nonnegative() || denom_even {
        // Increasing where defined; u**p > r says nothing about u when r < 0
        return match side {
            Side::Below => peel(algebra, base, Side::Below, strict, root(rhs), symbol),
            Side::Above if rhs_sign(algebra, &rhs).is_nonnegative() => {
                peel(algebra, base, Side::Above, strict, root(rhs), symbol)
            }
            Side::Above => None,
        };
    }

    // Even power of a base of unknown sign: u**2k == |u|**2k
    let magnitude = root(rhs.clone());
    match side {
        Side::Below if base_sign.is_nonpositive() => {
            peel(algebra, base, Side::Above, strict, -magnitude, symbol)
        }
        Side::Below => Range::merge(
            peel(algebra, base, Side::Above, strict, -magnitude.clone(), symbol),
            peel(algebra, base, Side::Below, strict, magnitude, symbol),
        ),
        Side::Above
            if base_sign.is_nonpositive() && rhs_sign(algebra, &rhs).is_nonnegative() =>
        {
            peel(algebra, base, Side::Below, strict, -magnitude, symbol)
        }
        Side::Above => {
            tracing::debug!("even power bounded from below gives a disjunction");
            None
        }
    }
}

fn rhs_sign<A: Algebra + ?Sized>(algebra: &A, rhs: &Expr) -> super::Sign {
    algebra.sign(&algebra.simplify(rhs))
}
