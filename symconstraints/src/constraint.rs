//! Canonical zero-compared constraints

use crate::algebra::simplify::leading_coefficient;
use crate::algebra::{Algebra, Sign};
use crate::analysis::free_symbols;
use crate::error::ConstraintError;
use crate::semantic::{Expr, RelOp, Relation};
use crate::symbol::SymbolSet;
use crate::ConstraintResult;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::Serialize;
use std::fmt;

/// Position of a constraint in the append-only arena of one model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the canonical expression compares against zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// `expr = 0`
    Equal,
    /// `expr < 0`
    Less,
    /// `expr <= 0`
    LessEqual,
}

impl RelationKind {
    pub fn is_equality(&self) -> bool {
        matches!(self, RelationKind::Equal)
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, RelationKind::Less)
    }

    /// Signs of the canonical expression that satisfy the relation
    pub fn admissible(&self) -> Sign {
        match self {
            RelationKind::Equal => Sign::ZERO,
            RelationKind::Less => Sign::NEGATIVE,
            RelationKind::LessEqual => Sign::NONPOSITIVE,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            RelationKind::Equal => "=",
            RelationKind::Less => "<",
            RelationKind::LessEqual => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// Whether a relation holds regardless of the values of its symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entailment {
    Always,
    Never,
    Depends,
}

/// A relation rewritten to `expr <kind> 0`.
///
/// `expr` is in canonical form and scaled so that its leading coefficient is
/// `1` for equalities and `±1` for inequalities, which only ever get scaled by
/// a positive factor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Normalized {
    pub kind: RelationKind,
    pub expr: Expr,
}

impl Normalized {
    /// Decide the relation from signs alone
    pub fn entailment<A: Algebra + ?Sized>(&self, algebra: &A) -> Entailment {
        let sign = algebra.sign(&self.expr);
        let admissible = self.kind.admissible();
        if sign.is_empty() {
            Entailment::Depends
        } else if sign.is_within(admissible) {
            Entailment::Always
        } else if sign.intersect(admissible).is_empty() {
            Entailment::Never
        } else {
            Entailment::Depends
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.expr, Expr::Num(_))
    }
}

impl fmt::Display for Normalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} 0", self.expr, self.kind)
    }
}

/// Canonicalize a relation into its zero-compared form.
///
/// Disequalities have no such form and are rejected.
pub fn normalize<A: Algebra + ?Sized>(
    algebra: &A,
    relation: &Relation,
) -> ConstraintResult<Normalized> {
    let (kind, difference) = match relation.op {
        RelOp::Eq => (
            RelationKind::Equal,
            relation.lhs.clone() - relation.rhs.clone(),
        ),
        RelOp::Lt => (RelationKind::Less, relation.lhs.clone() - relation.rhs.clone()),
        RelOp::Le => (
            RelationKind::LessEqual,
            relation.lhs.clone() - relation.rhs.clone(),
        ),
        RelOp::Gt => (RelationKind::Less, relation.rhs.clone() - relation.lhs.clone()),
        RelOp::Ge => (
            RelationKind::LessEqual,
            relation.rhs.clone() - relation.lhs.clone(),
        ),
        RelOp::Ne => {
            return Err(ConstraintError::unsupported(
                relation.to_string(),
                "disequalities have no zero-compared form; use a strict inequality instead",
            ))
        }
    };

    let expr = algebra.simplify(&difference);
    let scale = match leading_coefficient(&expr) {
        Some(lead) if kind.is_equality() => lead.recip(),
        Some(lead) => lead.abs().recip(),
        None => BigRational::one(),
    };
    let expr = if scale.is_one() {
        expr
    } else {
        algebra.simplify(&Expr::Mul(vec![Expr::Num(scale), expr]))
    };

    Ok(Normalized { kind, expr })
}

/// A relation in the arena of one model: declared by the user or derived.
///
/// Two constraints are equal when their normalized forms and symbol sets are.
#[derive(Debug, Clone)]
pub struct Constraint {
    id: ConstraintId,
    relation: Relation,
    normalized: Normalized,
    symbols: SymbolSet,
    provenance: Vec<ConstraintId>,
    origins: Vec<ConstraintId>,
}

impl Constraint {
    pub(crate) fn declared(id: ConstraintId, relation: Relation, normalized: Normalized) -> Self {
        let symbols = free_symbols(&normalized.expr);
        Self {
            id,
            relation,
            normalized,
            symbols,
            provenance: Vec::new(),
            origins: vec![id],
        }
    }

    pub(crate) fn derived(
        id: ConstraintId,
        relation: Relation,
        normalized: Normalized,
        provenance: Vec<ConstraintId>,
        origins: Vec<ConstraintId>,
    ) -> Self {
        let symbols = free_symbols(&normalized.expr);
        Self {
            id,
            relation,
            normalized,
            symbols,
            provenance,
            origins,
        }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    /// The relation as displayed to users
    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn normalized(&self) -> &Normalized {
        &self.normalized
    }

    pub fn kind(&self) -> RelationKind {
        self.normalized.kind
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Every constraint this one was derived from, ancestors first
    pub fn provenance(&self) -> &[ConstraintId] {
        &self.provenance
    }

    /// The user-declared constraints at the roots of the provenance
    pub fn origins(&self) -> &[ConstraintId] {
        &self.origins
    }

    pub fn is_derived(&self) -> bool {
        !self.provenance.is_empty()
    }

    pub(crate) fn key(&self) -> (Normalized, SymbolSet) {
        (self.normalized.clone(), self.symbols.clone())
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized && self.symbols == other.symbols
    }
}

impl Eq for Constraint {}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relation)
    }
}

/// Whether a constant normalized expression satisfies its relation
pub(crate) fn constant_holds(normalized: &Normalized) -> Option<bool> {
    let value = normalized.expr.as_number()?;
    Some(match normalized.kind {
        RelationKind::Equal => value.is_zero(),
        RelationKind::Less => value.is_negative(),
        RelationKind::LessEqual => !value.is_positive(),
    })
}
