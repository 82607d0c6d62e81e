//! # symconstraints
//!
//! **Dataset invariants as symbolic relations**
//!
//! Declare relations between the columns of a dataset, such as
//! `area = width * height` or `height > width`, and symconstraints derives
//! every further relation that follows from them by eliminating variables,
//! plus the formulas that reconstruct a missing value from the others.
//!
//! ## Quick Start
//!
//! ```rust
//! use symconstraints::{Assignment, ConstraintModel, ConstraintResult};
//!
//! fn main() -> ConstraintResult<()> {
//!     let model = ConstraintModel::build(&["area = width * height", "height > width"], &[])?;
//!
//!     for validation in model.validations() {
//!         println!("{}", validation);
//!     }
//!
//!     let row = Assignment::new().with("height", 6).with("width", 5).with_missing("area");
//!     let outcome = model.impute(&row);
//!     assert_eq!(outcome.values.get("area"), Some(30.into()));
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Relations
//! `=`, `<`, `<=`, `>`, `>=` between expressions built from `+ - * /`,
//! `**` (or `^`), `sqrt`, `abs`, `exp` and `log`. Exponents are rational
//! constants, except over a positive constant base: `2**x` is read as
//! `exp(x*log(2))`.
//!
//! ### Validations
//! Every declared relation and every relation derived from them. A derived
//! validation lists the declared relations it was inferred by, and only
//! mentions the symbols it needs, so it can still check rows where other
//! values are missing.
//!
//! ### Imputations
//! Each equality solved for each of its symbols. Rules are applied greedily
//! until no missing value can be filled; when several solution branches fit
//! the symbol's domain the value stays missing and is reported as ambiguous.
//!
//! ### Algebra
//! Derivation talks to an [`Algebra`] for simplification, sign analysis,
//! solving and isolation. [`SymbolicAlgebra`] is the built-in implementation
//! over exact rational polynomials with rational powers, `abs`, `exp` and
//! `log`.

pub mod algebra;
pub mod analysis;
pub mod assignment;
pub mod ast;
pub mod constraint;
pub mod elimination;
pub mod error;
pub mod evaluator;
pub mod imputation;
pub mod index;
pub mod model;
pub mod operation_result;
pub mod parser;
pub mod report;
pub mod resource_limits;
pub mod semantic;
pub mod symbol;

pub use algebra::{Algebra, Bound, Range, Sign, SymbolicAlgebra};
pub use assignment::Assignment;
pub use ast::Span;
pub use constraint::{normalize, Constraint, ConstraintId, Entailment, Normalized, RelationKind};
pub use elimination::{derive, EliminationEngine};
pub use error::ConstraintError;
pub use evaluator::{Computed, Evaluator, Verdict};
pub use imputation::{
    AmbiguousImputation, ImputationOutcome, ImputationResolver, ImputationRule, ImputationStep,
};
pub use index::{Validation, ValidationIndex};
pub use model::{ConstraintModel, ModelBuilder};
pub use operation_result::{OperationResult, Veto};
pub use parser::{parse_expression, parse_relation};
pub use report::{CheckEntry, CheckReport, ValidationFailure};
pub use resource_limits::ResourceLimits;
pub use semantic::{Expr, Function, RelOp, Relation};
pub use symbol::{Assumption, Assumptions, Symbol, SymbolRegistry, SymbolSet};

/// Result type for constraint model construction
pub type ConstraintResult<T> = Result<T, ConstraintError>;

#[cfg(test)]
mod tests;
