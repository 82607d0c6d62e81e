//! The algebra capability consumed by the derivation engine
//!
//! The engine never manipulates expressions directly. It asks an [`Algebra`]
//! to simplify, to determine signs under assumptions, to solve equalities for
//! a symbol and to isolate a symbol in an inequality. [`SymbolicAlgebra`] is
//! the built-in implementation; tests substitute their own.

pub mod isolate;
pub mod sign;
pub mod simplify;
pub mod solve;

pub use isolate::{Bound, Range};
pub use sign::Sign;

use crate::semantic::Expr;
use crate::symbol::Symbol;

pub trait Algebra: Send + Sync {
    /// Rewrite `expr` into canonical form
    fn simplify(&self, expr: &Expr) -> Expr;

    /// Possible signs of `expr` under its symbols' assumptions
    fn sign(&self, expr: &Expr) -> Sign;

    /// All solutions of `expr = 0` for `symbol`, simplified.
    ///
    /// Returns an empty vector when the equation cannot be solved.
    fn solve(&self, expr: &Expr, symbol: &Symbol) -> Vec<Expr> {
        solve::solve(self, expr, symbol)
    }

    /// Bounds on `symbol` implied by `expr < 0` (or `expr <= 0` when not strict).
    ///
    /// `None` when the symbol cannot be isolated without guessing a sign.
    fn bound(&self, expr: &Expr, strict: bool, symbol: &Symbol) -> Option<Range> {
        isolate::bound(self, expr, strict, symbol)
    }

    /// Solutions of `expr = 0` for `symbol` whose sign fits the symbol's domain
    fn solutions(&self, expr: &Expr, symbol: &Symbol) -> Vec<Expr> {
        let domain = symbol.assumptions().sign();
        self.solve(expr, symbol)
            .into_iter()
            .filter(|branch| !self.sign(branch).intersect(domain).is_empty())
            .collect()
    }
}

/// Polynomial canonical forms with exact rational coefficients
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicAlgebra;

impl SymbolicAlgebra {
    pub fn new() -> Self {
        Self
    }
}

impl Algebra for SymbolicAlgebra {
    fn simplify(&self, expr: &Expr) -> Expr {
        simplify::simplify(expr)
    }

    fn sign(&self, expr: &Expr) -> Sign {
        sign::sign_of(expr)
    }
}
