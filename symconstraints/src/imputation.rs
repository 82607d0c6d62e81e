//! Imputation rules and the greedy resolver that applies them to a row
//!
//! Every equality in the validation index is solved for each of its symbols.
//! A solution with `n` branches becomes `n` rules sharing target and source;
//! at evaluation time the branches vote, and only an unambiguous candidate is
//! ever written into the row.

use crate::algebra::Algebra;
use crate::analysis::{contains_symbol, free_symbols};
use crate::assignment::Assignment;
use crate::constraint::ConstraintId;
use crate::evaluator::{Computed, Evaluator};
use crate::index::ValidationIndex;
use crate::semantic::{Expr, Relation};
use crate::symbol::{format_symbols, Symbol, SymbolSet};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use tracing::debug;

/// A directed formula `target = formula` obtained by solving an equality
#[derive(Debug, Clone, PartialEq)]
pub struct ImputationRule {
    target: Symbol,
    formula: Expr,
    inputs: SymbolSet,
    source: ConstraintId,
    source_relation: Relation,
    origins: Vec<Relation>,
    branch: usize,
    branches: usize,
}

impl ImputationRule {
    pub fn target(&self) -> &Symbol {
        &self.target
    }

    /// Never mentions the target
    pub fn formula(&self) -> &Expr {
        &self.formula
    }

    /// Symbols that must be available to apply the rule
    pub fn inputs(&self) -> &SymbolSet {
        &self.inputs
    }

    /// The equality the rule was solved from
    pub fn source(&self) -> ConstraintId {
        self.source
    }

    pub fn source_relation(&self) -> &Relation {
        &self.source_relation
    }

    /// User relations the source equality follows from
    pub fn origins(&self) -> &[Relation] {
        &self.origins
    }

    pub fn branch(&self) -> usize {
        self.branch
    }

    pub fn branches(&self) -> usize {
        self.branches
    }

    /// The rule as a relation, `target = formula`
    pub fn relation(&self) -> Relation {
        Relation::equals(Expr::symbol(&self.target), self.formula.clone())
    }

    fn applies_to(&self, assignment: &Assignment) -> bool {
        self.inputs
            .iter()
            .all(|input| assignment.is_available(input.name()))
    }
}

/// Format: `(height, width) => [area = height*width] inferred by (area = width*height)`
impl fmt::Display for ImputationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) => [{}] inferred by ({})",
            format_symbols(&self.inputs),
            self.relation(),
            self.origins
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Serialize for ImputationRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ImputationRule", 7)?;
        state.serialize_field("target", self.target.name())?;
        state.serialize_field("formula", &self.formula.to_string())?;
        state.serialize_field(
            "inputs",
            &self.inputs.iter().map(|s| s.name()).collect::<Vec<_>>(),
        )?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("branch", &self.branch)?;
        state.serialize_field("branches", &self.branches)?;
        state.serialize_field(
            "inferred_by",
            &self
                .origins
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>(),
        )?;
        state.end()
    }
}

/// One value written into the row
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImputationStep {
    pub target: String,
    pub value: Decimal,
    /// Canonical text of the rule that produced the value
    pub rule: String,
}

/// A target left missing because several branches produced admissible values
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AmbiguousImputation {
    pub target: String,
    pub candidates: Vec<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImputationOutcome {
    /// The input row with every imputed value filled in
    pub values: Assignment,
    /// Applied imputations, in application order
    pub steps: Vec<ImputationStep>,
    pub ambiguous: Vec<AmbiguousImputation>,
}

impl ImputationOutcome {
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous.is_empty()
    }
}

/// Rules of one `(target, source)` pair, one per solution branch
#[derive(Debug, Clone)]
struct RuleGroup {
    target: Symbol,
    rules: Vec<usize>,
}

/// All imputation rules of a model, in derivation order
#[derive(Debug, Clone, Default)]
pub struct ImputationResolver {
    rules: Vec<ImputationRule>,
    groups: Vec<RuleGroup>,
}

impl ImputationResolver {
    /// Solve every equality of `index` for each of its symbols
    pub fn new<A: Algebra + ?Sized>(algebra: &A, index: &ValidationIndex) -> Self {
        let mut resolver = Self::default();
        for validation in index.equalities() {
            for target in validation.symbols() {
                let solutions: Vec<Expr> = algebra
                    .solutions(&validation.normalized().expr, target)
                    .into_iter()
                    .filter(|formula| !contains_symbol(formula, target))
                    .collect();
                if solutions.is_empty() {
                    debug!(validation = %validation.relation(), %target, "no imputation formula");
                    continue;
                }

                if resolver.has_group(target, &solutions) {
                    debug!(validation = %validation.relation(), %target, "discarding duplicate imputation rules");
                    continue;
                }

                let branches = solutions.len();
                let mut group = RuleGroup {
                    target: target.clone(),
                    rules: Vec::new(),
                };
                for (branch, formula) in solutions.into_iter().enumerate() {
                    let rule = ImputationRule {
                        target: target.clone(),
                        inputs: free_symbols(&formula),
                        formula,
                        source: validation.id(),
                        source_relation: validation.relation().clone(),
                        origins: validation.origins().to_vec(),
                        branch,
                        branches,
                    };
                    debug!(rule = %rule, "imputation rule");
                    group.rules.push(resolver.rules.len());
                    resolver.rules.push(rule);
                }
                resolver.groups.push(group);
            }
        }
        resolver
    }

    /// Whether a group for `target` already has exactly these formulas
    fn has_group(&self, target: &Symbol, formulas: &[Expr]) -> bool {
        self.groups.iter().any(|group| {
            group.target == *target
                && group.rules.len() == formulas.len()
                && group
                    .rules
                    .iter()
                    .all(|&i| formulas.contains(&self.rules[i].formula))
        })
    }

    pub fn rules(&self) -> &[ImputationRule] {
        &self.rules
    }

    /// Rules that compute `target`, in derivation order
    pub fn rules_for<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a ImputationRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.target.name() == target)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fill missing values by applying rules until nothing changes.
    ///
    /// A rule group applies when its target is missing and all of its inputs
    /// are available. Branch values outside the target's domain are
    /// discarded; one remaining value is written, several are reported as
    /// ambiguous and the target stays missing.
    pub fn impute(&self, evaluator: &Evaluator, assignment: &Assignment) -> ImputationOutcome {
        let mut values = assignment.clone();
        let mut steps = Vec::new();
        let mut ambiguous: Vec<AmbiguousImputation> = Vec::new();

        loop {
            let mut changed = false;
            for group in &self.groups {
                let target = group.target.name();
                if values.is_available(target) {
                    continue;
                }
                let rules: Vec<&ImputationRule> =
                    group.rules.iter().map(|&i| &self.rules[i]).collect();
                if !rules.iter().all(|rule| rule.applies_to(&values)) {
                    continue;
                }

                let mut candidates: Vec<(Decimal, &ImputationRule)> = Vec::new();
                for rule in rules {
                    if let Computed::Value(value) = evaluator.compute(rule, &values) {
                        if group.target.assumptions().admits(&value)
                            && !candidates.iter().any(|(known, _)| *known == value)
                        {
                            candidates.push((value, rule));
                        }
                    }
                }

                match candidates.as_slice() {
                    [] => {}
                    [(value, rule)] => {
                        debug!(%target, %value, rule = %rule, "imputed value");
                        values.set(target, Some(*value));
                        steps.push(ImputationStep {
                            target: target.to_string(),
                            value: *value,
                            rule: rule.to_string(),
                        });
                        changed = true;
                    }
                    several => {
                        debug!(%target, candidates = several.len(), "ambiguous imputation");
                        ambiguous.retain(|entry| entry.target != target);
                        ambiguous.push(AmbiguousImputation {
                            target: target.to_string(),
                            candidates: several.iter().map(|(value, _)| *value).collect(),
                        });
                    }
                }
            }
            if !changed {
                break;
            }
        }

        ambiguous.retain(|entry| !values.is_available(&entry.target));
        ImputationOutcome {
            values,
            steps,
            ambiguous,
        }
    }
}
