//! The validation index: every declared and derived constraint, with provenance

use crate::constraint::{Constraint, ConstraintId, Normalized, RelationKind};
use crate::semantic::Relation;
use crate::symbol::{format_symbols, SymbolSet};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A constraint exposed for checking data, with the user relations that entail it
#[derive(Debug, Clone)]
pub struct Validation {
    constraint: Constraint,
    origins: Vec<Relation>,
}

impl Validation {
    pub(crate) fn new(constraint: Constraint, origins: Vec<Relation>) -> Self {
        Self {
            constraint,
            origins,
        }
    }

    pub fn id(&self) -> ConstraintId {
        self.constraint.id()
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn relation(&self) -> &Relation {
        self.constraint.relation()
    }

    pub fn normalized(&self) -> &Normalized {
        self.constraint.normalized()
    }

    pub fn kind(&self) -> RelationKind {
        self.constraint.kind()
    }

    /// Symbols that must be present to evaluate this validation
    pub fn symbols(&self) -> &SymbolSet {
        self.constraint.symbols()
    }

    pub fn provenance(&self) -> &[ConstraintId] {
        self.constraint.provenance()
    }

    /// Relations of the user-declared constraints this validation follows from
    pub fn origins(&self) -> &[Relation] {
        &self.origins
    }

    pub fn is_derived(&self) -> bool {
        self.constraint.is_derived()
    }
}

/// Format: `(a, c) => [a/3 < sqrt(c - 1)] inferred by (a < 3*b, c > b**2 + 1)`
impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) => [{}] inferred by ({})",
            format_symbols(self.symbols()),
            self.relation(),
            self.origins
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Serialize for Validation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Validation", 5)?;
        state.serialize_field("id", &self.id())?;
        state.serialize_field(
            "symbols",
            &self.symbols().iter().map(|s| s.name()).collect::<Vec<_>>(),
        )?;
        state.serialize_field("relation", &self.relation().to_string())?;
        state.serialize_field("derived", &self.is_derived())?;
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

/// Validations keyed by symbol set, in order of derivation.
///
/// Immutable once built; a validation's position equals its [`ConstraintId`].
#[derive(Debug, Clone, Default)]
pub struct ValidationIndex {
    validations: Vec<Validation>,
    by_symbols: HashMap<SymbolSet, Vec<ConstraintId>>,
}

impl ValidationIndex {
    pub(crate) fn from_arena(arena: &[Constraint]) -> Self {
        let mut index = Self::default();
        for constraint in arena {
            let origins = constraint
                .origins()
                .iter()
                .filter_map(|id| arena.get(id.index()))
                .map(|origin| origin.relation().clone())
                .collect();
            index
                .by_symbols
                .entry(constraint.symbols().clone())
                .or_default()
                .push(constraint.id());
            index
                .validations
                .push(Validation::new(constraint.clone(), origins));
        }
        index
    }

    /// Validations over exactly `symbols`, in insertion order
    pub fn by_symbols(&self, symbols: &SymbolSet) -> Vec<&Validation> {
        self.by_symbols
            .get(symbols)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Validations over exactly the symbols named in `names`
    pub fn by_names(&self, names: &[&str]) -> Vec<&Validation> {
        let mut wanted: Vec<&str> = names.to_vec();
        wanted.sort_unstable();
        wanted.dedup();
        self.validations
            .iter()
            .filter(|v| {
                v.symbols().len() == wanted.len()
                    && v.symbols().iter().map(|s| s.name()).eq(wanted.iter().copied())
            })
            .collect()
    }

    pub fn all(&self) -> &[Validation] {
        &self.validations
    }

    pub fn get(&self, id: ConstraintId) -> Option<&Validation> {
        self.validations.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Validation> {
        self.validations.iter()
    }

    /// Declared and derived equalities, the sources of imputation rules
    pub fn equalities(&self) -> impl Iterator<Item = &Validation> {
        self.validations.iter().filter(|v| v.kind().is_equality())
    }

    pub fn len(&self) -> usize {
        self.validations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validations.is_empty()
    }
}

impl fmt::Display for ValidationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for validation in &self.validations {
            writeln!(f, "{}", validation)?;
        }
        Ok(())
    }
}
