//! Pairwise variable elimination to a fixpoint
//!
//! Constraints are processed in given-clause order: each constraint popped
//! from the worklist is combined with every constraint processed before it,
//! the earlier one always taking the role of the first operand. Every
//! symbol the pair shares is eliminated in turn, either by substituting the
//! unique solution of an equality or by chaining a lower bound of one
//! inequality against an upper bound of the other.
//!
//! A pair is only combined when each side draws on a declared relation the
//! other does not, so origin sets grow strictly along every derivation chain
//! and the closure is finite. Derived equalities restating an equality over
//! the same symbols from a subset of the same origins are discarded.

use crate::algebra::{Algebra, Range};
use crate::analysis::{free_symbols, substitute};
use crate::constraint::{
    constant_holds, normalize, Constraint, ConstraintId, Entailment, Normalized,
};
use crate::error::ConstraintError;
use crate::index::ValidationIndex;
use crate::resource_limits::ResourceLimits;
use crate::semantic::{Expr, Relation};
use crate::symbol::{Symbol, SymbolSet};
use crate::ConstraintResult;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace, warn};

/// Derive the closure of `relations` and return it as a validation index
pub fn derive<A: Algebra + ?Sized>(
    algebra: &A,
    relations: &[Relation],
    limits: &ResourceLimits,
) -> ConstraintResult<ValidationIndex> {
    let mut engine = EliminationEngine::new(algebra, limits);
    engine.seed(relations)?;
    engine.run()?;
    Ok(engine.into_index())
}

/// State of one derivation run. Memo tables live and die with the run.
pub struct EliminationEngine<'a, A: Algebra + ?Sized> {
    algebra: &'a A,
    limits: &'a ResourceLimits,
    arena: Vec<Constraint>,
    seen: HashMap<(Normalized, SymbolSet), ConstraintId>,
    worklist: VecDeque<ConstraintId>,
    isolations: HashMap<(ConstraintId, Symbol), Option<Range>>,
    solutions: HashMap<(ConstraintId, Symbol), Vec<Expr>>,
    eliminations: usize,
    derived: usize,
}

impl<'a, A: Algebra + ?Sized> EliminationEngine<'a, A> {
    pub fn new(algebra: &'a A, limits: &'a ResourceLimits) -> Self {
        Self {
            algebra,
            limits,
            arena: Vec::new(),
            seen: HashMap::new(),
            worklist: VecDeque::new(),
            isolations: HashMap::new(),
            solutions: HashMap::new(),
            eliminations: 0,
            derived: 0,
        }
    }

    /// Normalize the user relations and queue them, dropping duplicates and tautologies
    pub fn seed(&mut self, relations: &[Relation]) -> ConstraintResult<()> {
        for relation in relations {
            let normalized = normalize(self.algebra, relation)?;
            match constant_holds(&normalized) {
                Some(true) => {
                    warn!(relation = %relation, "dropping relation that always holds");
                    continue;
                }
                Some(false) => {
                    return Err(ConstraintError::Contradiction {
                        relation: relation.to_string(),
                        first: vec![relation.to_string()],
                        second: Vec::new(),
                    })
                }
                None => {}
            }
            if normalized.entailment(self.algebra) == Entailment::Never {
                return Err(ConstraintError::Contradiction {
                    relation: relation.to_string(),
                    first: vec![relation.to_string()],
                    second: Vec::new(),
                });
            }

            let id = ConstraintId(self.arena.len());
            let constraint = Constraint::declared(id, relation.clone(), normalized);
            if self.seen.contains_key(&constraint.key()) {
                debug!(relation = %relation, "dropping duplicate relation");
                continue;
            }
            self.seen.insert(constraint.key(), id);
            self.arena.push(constraint);
            self.worklist.push_back(id);
        }
        Ok(())
    }

    /// Run the worklist to its fixpoint
    pub fn run(&mut self) -> ConstraintResult<()> {
        let mut processed: Vec<ConstraintId> = Vec::new();
        while let Some(current) = self.worklist.pop_front() {
            for &earlier in &processed {
                self.combine(earlier, current)?;
            }
            processed.push(current);
        }
        Ok(())
    }

    pub fn into_index(self) -> ValidationIndex {
        ValidationIndex::from_arena(&self.arena)
    }

    fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.arena[id.index()]
    }

    fn combine(&mut self, first: ConstraintId, second: ConstraintId) -> ConstraintResult<()> {
        // Every derivation must draw on a declared relation its other parent
        // does not; this also skips ancestor/descendant pairs
        let (first_origins, second_origins) =
            (self.constraint(first).origins(), self.constraint(second).origins());
        if is_subset(first_origins, second_origins) || is_subset(second_origins, first_origins) {
            trace!(%first, %second, "skipping pair with nested origins");
            return Ok(());
        }

        let shared: Vec<Symbol> = self
            .constraint(first)
            .symbols()
            .intersection(self.constraint(second).symbols())
            .cloned()
            .collect();

        for symbol in shared {
            self.eliminations += 1;
            if self.eliminations > self.limits.max_eliminations {
                return Err(self.budget_exceeded("max_eliminations", self.limits.max_eliminations));
            }
            for relation in self.eliminate(first, second, &symbol) {
                self.accept(relation, first, second)?;
            }
        }
        Ok(())
    }

    /// Candidate relations with `symbol` eliminated from the pair
    fn eliminate(&mut self, first: ConstraintId, second: ConstraintId, symbol: &Symbol) -> Vec<Relation> {
        for (solved, target) in [(first, second), (second, first)] {
            if !self.constraint(solved).kind().is_equality() {
                continue;
            }
            let solutions = self.solutions(solved, symbol);
            if let [solution] = solutions.as_slice() {
                let relation = self.constraint(target).relation();
                let lhs = substitute(&relation.lhs, symbol, solution);
                let rhs = substitute(&relation.rhs, symbol, solution);
                if lhs.node_count() + rhs.node_count() > self.limits.max_expression_nodes {
                    debug!(
                        constraint = %self.constraint(target),
                        %symbol,
                        "substitution over the size limit, skipping"
                    );
                    return Vec::new();
                }
                return vec![Relation::new(
                    self.algebra.simplify(&lhs),
                    relation.op,
                    self.algebra.simplify(&rhs),
                )];
            }
            debug!(
                constraint = %self.constraint(solved),
                %symbol,
                branches = solutions.len(),
                "equality has no unique solution"
            );
        }

        if self.constraint(first).kind().is_equality() || self.constraint(second).kind().is_equality() {
            return Vec::new();
        }

        let (Some(first_range), Some(second_range)) =
            (self.isolate(first, symbol), self.isolate(second, symbol))
        else {
            debug!(
                first = %self.constraint(first),
                second = %self.constraint(second),
                %symbol,
                "cannot isolate symbol, skipping combination"
            );
            return Vec::new();
        };

        let mut chains = Vec::new();
        for (lower_side, upper_side) in [(&first_range, &second_range), (&second_range, &first_range)] {
            for lower in &lower_side.lower {
                for upper in &upper_side.upper {
                    let relation = if lower.strict || upper.strict {
                        Relation::less_than(lower.expr.clone(), upper.expr.clone())
                    } else {
                        Relation::less_equal(lower.expr.clone(), upper.expr.clone())
                    };
                    chains.push(relation);
                }
            }
        }
        chains
    }

    fn accept(&mut self, relation: Relation, first: ConstraintId, second: ConstraintId) -> ConstraintResult<()> {
        let normalized = normalize(self.algebra, &relation)?;

        let holds = match constant_holds(&normalized) {
            Some(holds) => Some(holds),
            None => match normalized.entailment(self.algebra) {
                Entailment::Always => Some(true),
                Entailment::Never => Some(false),
                Entailment::Depends => None,
            },
        };
        match holds {
            Some(true) => {
                debug!(relation = %relation, "discarding derived relation that always holds");
                return Ok(());
            }
            Some(false) => {
                return Err(ConstraintError::Contradiction {
                    relation: relation.to_string(),
                    first: self.chain(first),
                    second: self.chain(second),
                })
            }
            None => {}
        }

        if normalized.expr.node_count() > self.limits.max_expression_nodes {
            debug!(relation = %relation, "discarding derived relation over the size limit");
            return Ok(());
        }

        let provenance = self.merged_provenance(first, second);
        let origins = self.merged_origins(first, second);
        if normalized.kind.is_equality() {
            let symbols = free_symbols(&normalized.expr);
            if let Some(covering) = self.arena.iter().find(|existing| {
                existing.kind().is_equality()
                    && *existing.symbols() == symbols
                    && is_subset(existing.origins(), &origins)
            }) {
                debug!(relation = %relation, covered_by = %covering, "discarding restated equality");
                return Ok(());
            }
        }
        let id = ConstraintId(self.arena.len());
        let constraint = Constraint::derived(id, relation, normalized, provenance, origins);
        let key = constraint.key();
        if let Some(existing) = self.seen.get(&key) {
            debug!(relation = %constraint, %existing, "discarding known relation");
            return Ok(());
        }

        self.derived += 1;
        if self.derived > self.limits.max_derived_constraints {
            return Err(self.budget_exceeded(
                "max_derived_constraints",
                self.limits.max_derived_constraints,
            ));
        }

        debug!(
            %id,
            relation = %constraint,
            first = %self.constraint(first),
            second = %self.constraint(second),
            "derived constraint"
        );
        self.seen.insert(key, id);
        self.arena.push(constraint);
        self.worklist.push_back(id);
        Ok(())
    }

    /// `prov(first) ∪ prov(second) ∪ {first, second}`, order-stable
    fn merged_provenance(&self, first: ConstraintId, second: ConstraintId) -> Vec<ConstraintId> {
        let mut merged: Vec<ConstraintId> = Vec::new();
        let candidates = self
            .constraint(first)
            .provenance()
            .iter()
            .chain(self.constraint(second).provenance())
            .chain([&first, &second]);
        for id in candidates {
            if !merged.contains(id) {
                merged.push(*id);
            }
        }
        merged
    }

    fn merged_origins(&self, first: ConstraintId, second: ConstraintId) -> Vec<ConstraintId> {
        let mut origins: Vec<ConstraintId> = self
            .constraint(first)
            .origins()
            .iter()
            .chain(self.constraint(second).origins())
            .copied()
            .collect();
        origins.sort();
        origins.dedup();
        origins
    }

    /// Relations of a constraint's provenance followed by the constraint itself
    fn chain(&self, id: ConstraintId) -> Vec<String> {
        self.constraint(id)
            .provenance()
            .iter()
            .chain([&id])
            .map(|ancestor| self.constraint(*ancestor).relation().to_string())
            .collect()
    }

    fn solutions(&mut self, id: ConstraintId, symbol: &Symbol) -> Vec<Expr> {
        let key = (id, symbol.clone());
        if let Some(cached) = self.solutions.get(&key) {
            trace!(%id, %symbol, "solution cache hit");
            return cached.clone();
        }
        let solved = self
            .algebra
            .solutions(&self.constraint(id).normalized().expr, symbol);
        self.solutions.insert(key, solved.clone());
        solved
    }

    fn isolate(&mut self, id: ConstraintId, symbol: &Symbol) -> Option<Range> {
        let key = (id, symbol.clone());
        if let Some(cached) = self.isolations.get(&key) {
            trace!(%id, %symbol, "isolation cache hit");
            return cached.clone();
        }
        let normalized = self.constraint(id).normalized();
        let range = self
            .algebra
            .bound(&normalized.expr, normalized.kind.is_strict(), symbol);
        self.isolations.insert(key, range.clone());
        range
    }

    fn budget_exceeded(&self, limit_name: &str, limit_value: usize) -> ConstraintError {
        ConstraintError::BudgetExceeded {
            limit_name: limit_name.to_string(),
            limit_value,
            partial: Box::new(ValidationIndex::from_arena(&self.arena)),
        }
    }
}

/// Both slices sorted, as origins are
fn is_subset(smaller: &[ConstraintId], larger: &[ConstraintId]) -> bool {
    smaller.iter().all(|id| larger.binary_search(id).is_ok())
}
