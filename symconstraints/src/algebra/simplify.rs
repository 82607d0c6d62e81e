//! Canonical polynomial form
//!
//! Expressions are expanded into sums of monomials with exact rational
//! coefficients. A monomial is a product of atoms raised to rational powers;
//! atoms are symbols, function applications, rational constants that have no
//! exact root, and powers that cannot be distributed over their base (roots
//! of sums, roots of factors whose sign is unknown).
//!
//! Terms are ordered by descending degree with constants last, so the first
//! term of a canonical sum carries its leading coefficient.

use super::sign::sign_of;
use crate::analysis::contains_symbol;
use crate::semantic::{Expr, Function};
use crate::symbol::Symbol;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Positive integer powers of sums up to this degree are multiplied out
const MAX_EXPANSION_DEGREE: i64 = 6;

/// Integer powers of constants beyond this magnitude are left unevaluated
const MAX_FOLDED_EXPONENT: u32 = 64;

/// Rewrite an expression into canonical form
pub fn simplify(expr: &Expr) -> Expr {
    to_poly(expr).to_expr()
}

/// Coefficient of the first non-constant term of the canonical form of `expr`.
///
/// `None` when `expr` simplifies to a constant.
pub fn leading_coefficient(expr: &Expr) -> Option<BigRational> {
    to_poly(expr)
        .terms
        .iter()
        .find(|(monomial, _)| !monomial.is_constant())
        .map(|(_, coeff)| coeff.clone())
}

/// View `expr` as a Laurent polynomial in `symbol`.
///
/// Returns the coefficient of every integer power of `symbol`, or `None` if
/// the symbol also occurs inside an atom (a root, a function, a power of a sum).
pub(crate) fn polynomial_in(expr: &Expr, symbol: &Symbol) -> Option<BTreeMap<i64, Expr>> {
    let target = Expr::symbol(symbol);
    let mut buckets: BTreeMap<i64, Poly> = BTreeMap::new();

    for (monomial, coeff) in &to_poly(expr).terms {
        let mut rest = monomial.0.clone();
        let power = match rest.remove(&target) {
            Some(exponent) if exponent.is_integer() => exponent.to_integer().to_i64()?,
            Some(_) => return None,
            None => 0,
        };
        if rest.keys().any(|base| contains_symbol(base, symbol)) {
            return None;
        }
        buckets
            .entry(power)
            .or_default()
            .add_term(Monomial(rest), coeff.clone());
    }

    Some(
        buckets
            .into_iter()
            .filter(|(_, coeff)| !coeff.terms.is_empty())
            .map(|(power, coeff)| (power, coeff.to_expr()))
            .collect(),
    )
}

/// Product of atoms raised to nonzero rational powers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Monomial(BTreeMap<Expr, BigRational>);

impl Monomial {
    fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    fn degree(&self) -> BigRational {
        self.0
            .values()
            .fold(BigRational::zero(), |acc, exponent| acc + exponent)
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.is_constant()
            .cmp(&other.is_constant())
            .then_with(|| other.degree().cmp(&self.degree()))
            .then_with(|| self.0.iter().cmp(other.0.iter()))
    }
}

/// Sum of monomials with nonzero coefficients
#[derive(Debug, Clone, Default, PartialEq)]
struct Poly {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Poly {
    fn zero() -> Self {
        Self::default()
    }

    fn one() -> Self {
        Self::constant(BigRational::one())
    }

    fn constant(value: BigRational) -> Self {
        let mut poly = Self::zero();
        poly.add_term(Monomial::default(), value);
        poly
    }

    fn atom(base: Expr, exponent: BigRational) -> Self {
        let mut factors = BTreeMap::new();
        factors.insert(base, exponent);
        Self::monomial(BigRational::one(), factors)
    }

    /// `coeff * Π base**exponent`, folding constant bases and expanding
    /// bases that are sums or products raised to a distributable power
    fn monomial(coeff: BigRational, factors: BTreeMap<Expr, BigRational>) -> Self {
        if coeff.is_zero() {
            return Self::zero();
        }
        let mut coeff = coeff;
        let mut kept = BTreeMap::new();
        let mut expand = Vec::new();

        for (base, exponent) in factors {
            if exponent.is_zero() {
                continue;
            }
            match &base {
                Expr::Num(value) => match rational_power(value, &exponent) {
                    Some(folded) => coeff = coeff * folded,
                    None => {
                        kept.insert(base, exponent);
                    }
                },
                Expr::Add(_) if is_expandable(&exponent) => expand.push((base, exponent)),
                Expr::Mul(_) | Expr::Pow(..) if exponent.is_integer() => {
                    expand.push((base, exponent))
                }
                _ => {
                    kept.insert(base, exponent);
                }
            }
        }

        let mut result = Self::zero();
        result.add_term(Monomial(kept), coeff);
        for (base, exponent) in expand {
            result = result.mul(&to_poly(&base).pow(&exponent));
        }
        result
    }

    fn add_term(&mut self, monomial: Monomial, coeff: BigRational) {
        if coeff.is_zero() {
            return;
        }
        let sum = match self.terms.get(&monomial) {
            Some(existing) => existing + &coeff,
            None => coeff,
        };
        if sum.is_zero() {
            self.terms.remove(&monomial);
        } else {
            self.terms.insert(monomial, sum);
        }
    }

    fn add(mut self, other: &Poly) -> Poly {
        for (monomial, coeff) in &other.terms {
            self.add_term(monomial.clone(), coeff.clone());
        }
        self
    }

    fn mul(&self, other: &Poly) -> Poly {
        let mut result = Poly::zero();
        for (left, left_coeff) in &self.terms {
            for (right, right_coeff) in &other.terms {
                let mut factors = left.0.clone();
                for (base, exponent) in &right.0 {
                    let merged = match factors.get(base) {
                        Some(existing) => existing + exponent,
                        None => exponent.clone(),
                    };
                    factors.insert(base.clone(), merged);
                }
                result = result.add(&Poly::monomial(left_coeff * right_coeff, factors));
            }
        }
        result
    }

    fn scale(&self, factor: &BigRational) -> Poly {
        let mut result = Poly::zero();
        for (monomial, coeff) in &self.terms {
            result.add_term(monomial.clone(), coeff * factor);
        }
        result
    }

    /// Coefficient of the first term in canonical order
    fn leading_coefficient(&self) -> BigRational {
        self.terms
            .values()
            .next()
            .cloned()
            .unwrap_or_else(BigRational::zero)
    }

    fn pow(&self, exponent: &BigRational) -> Poly {
        if exponent.is_zero() {
            return Poly::one();
        }
        if exponent.is_one() {
            return self.clone();
        }
        if self.terms.is_empty() {
            return if exponent.is_positive() {
                Poly::zero()
            } else {
                Poly::atom(Expr::zero(), exponent.clone())
            };
        }
        if self.terms.len() == 1 {
            if let Some((monomial, coeff)) = self.terms.iter().next() {
                return pow_term(monomial, coeff, exponent);
            }
        }
        if is_expandable(exponent) {
            let times = exponent.to_integer().to_i64().unwrap_or(1);
            return (1..times).fold(self.clone(), |acc, _| acc.mul(self));
        }

        // Pull the leading coefficient out so that equal sums share one atom
        let lead = self.leading_coefficient();
        if lead.is_positive() || exponent.is_integer() || !has_even_denominator(exponent) {
            let monic = self.scale(&lead.recip());
            numeric_power(&lead, exponent).mul(&Poly::atom(monic.to_expr(), exponent.clone()))
        } else {
            Poly::atom(self.to_expr(), exponent.clone())
        }
    }

    fn to_expr(&self) -> Expr {
        let mut terms: Vec<Expr> = self
            .terms
            .iter()
            .map(|(monomial, coeff)| term_expr(monomial, coeff))
            .collect();
        match terms.len() {
            0 => Expr::zero(),
            1 => terms.remove(0),
            _ => Expr::Add(terms),
        }
    }
}

fn to_poly(expr: &Expr) -> Poly {
    match expr {
        Expr::Num(value) => Poly::constant(value.clone()),
        Expr::Sym(_) => Poly::atom(expr.clone(), BigRational::one()),
        Expr::Add(terms) => terms
            .iter()
            .fold(Poly::zero(), |acc, term| acc.add(&to_poly(term))),
        Expr::Mul(factors) => factors
            .iter()
            .fold(Poly::one(), |acc, factor| acc.mul(&to_poly(factor))),
        Expr::Pow(base, exponent) => to_poly(base).pow(exponent),
        Expr::Func(function, arg) => apply_function(*function, to_poly(arg)),
    }
}

fn term_expr(monomial: &Monomial, coeff: &BigRational) -> Expr {
    let mut factors: Vec<Expr> = monomial
        .0
        .iter()
        .map(|(base, exponent)| {
            if exponent.is_one() {
                base.clone()
            } else {
                Expr::pow(base.clone(), exponent.clone())
            }
        })
        .collect();
    if factors.is_empty() {
        return Expr::Num(coeff.clone());
    }
    if !coeff.is_one() {
        factors.insert(0, Expr::Num(coeff.clone()));
    }
    if factors.len() == 1 {
        factors.remove(0)
    } else {
        Expr::Mul(factors)
    }
}

/// `(coeff * monomial) ** exponent`
fn pow_term(monomial: &Monomial, coeff: &BigRational, exponent: &BigRational) -> Poly {
    if exponent.is_integer() {
        let factors = monomial
            .0
            .iter()
            .map(|(base, power)| (base.clone(), power * exponent))
            .collect();
        return numeric_power(coeff, exponent).mul(&Poly::monomial(BigRational::one(), factors));
    }

    let odd_root = !has_even_denominator(exponent);
    let mut distributed = BTreeMap::new();
    let mut through_abs = Vec::new();
    let mut residual = BTreeMap::new();

    for (base, power) in &monomial.0 {
        if sign_of(base).is_nonnegative() || (power.is_integer() && odd_root) {
            distributed.insert(base.clone(), power * exponent);
        } else if is_even_integer(power) {
            // (b**2k)**p == |b|**(2kp) for real b
            through_abs.push((base.clone(), power * exponent));
        } else {
            residual.insert(base.clone(), power.clone());
        }
    }

    let (outer, inner_sign) = if coeff.is_positive() || odd_root {
        (numeric_power(coeff, exponent), BigRational::one())
    } else {
        (numeric_power(&-coeff, exponent), -BigRational::one())
    };

    let mut result = outer.mul(&Poly::monomial(BigRational::one(), distributed));
    for (base, power) in through_abs {
        result = result.mul(&apply_function(Function::Abs, to_poly(&base)).pow(&power));
    }
    if !residual.is_empty() || !inner_sign.is_one() {
        let inner = term_expr(&Monomial(residual), &inner_sign);
        result = result.mul(&Poly::atom(inner, exponent.clone()));
    }
    result
}

fn numeric_power(value: &BigRational, exponent: &BigRational) -> Poly {
    match rational_power(value, exponent) {
        Some(folded) => Poly::constant(folded),
        None => Poly::atom(Expr::Num(value.clone()), exponent.clone()),
    }
}

fn apply_function(function: Function, arg: Poly) -> Poly {
    let arg_expr = arg.to_expr();
    match function {
        Function::Abs => {
            if let Some(value) = arg_expr.as_number() {
                return Poly::constant(value.abs());
            }
            let sign = sign_of(&arg_expr);
            if sign.is_nonnegative() {
                return arg;
            }
            if sign.is_nonpositive() {
                return arg.scale(&-BigRational::one());
            }
            let lead = arg.leading_coefficient();
            let monic = arg.scale(&lead.recip());
            Poly::constant(lead.abs()).mul(&Poly::atom(
                Expr::func(Function::Abs, monic.to_expr()),
                BigRational::one(),
            ))
        }
        Function::Exp => match arg_expr {
            Expr::Num(value) if value.is_zero() => Poly::one(),
            Expr::Func(Function::Log, inner) => to_poly(&inner),
            other => Poly::atom(Expr::func(Function::Exp, other), BigRational::one()),
        },
        Function::Log => match arg_expr {
            Expr::Num(value) if value.is_one() => Poly::zero(),
            Expr::Func(Function::Exp, inner) => to_poly(&inner),
            other => Poly::atom(Expr::func(Function::Log, other), BigRational::one()),
        },
    }
}

fn is_expandable(exponent: &BigRational) -> bool {
    exponent.is_integer()
        && exponent.is_positive()
        && exponent.to_integer() <= BigInt::from(MAX_EXPANSION_DEGREE)
}

fn is_even_integer(value: &BigRational) -> bool {
    value.is_integer() && (value.numer() % 2u32).is_zero()
}

fn has_even_denominator(value: &BigRational) -> bool {
    (value.denom() % 2u32).is_zero()
}

/// `value ** exponent` when the result is an exact rational
fn rational_power(value: &BigRational, exponent: &BigRational) -> Option<BigRational> {
    let numer = exponent.numer().to_i32()?;
    let degree = exponent.denom().to_u32()?;
    if numer.unsigned_abs() > MAX_FOLDED_EXPONENT {
        return None;
    }
    if value.is_zero() {
        return (numer > 0).then(BigRational::zero);
    }

    let root = if degree == 1 {
        value.clone()
    } else {
        if value.is_negative() && degree % 2 == 0 {
            return None;
        }
        let magnitude = value.abs();
        let root = BigRational::new(
            exact_root(magnitude.numer(), degree)?,
            exact_root(magnitude.denom(), degree)?,
        );
        if value.is_negative() {
            -root
        } else {
            root
        }
    };

    let mut result = BigRational::one();
    for _ in 0..numer.unsigned_abs() {
        result = &result * &root;
    }
    Some(if numer < 0 { result.recip() } else { result })
}

fn exact_root(value: &BigInt, degree: u32) -> Option<BigInt> {
    let root = value.nth_root(degree);
    (root.pow(degree) == *value).then_some(root)
}
