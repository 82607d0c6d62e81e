use crate::constraint::ConstraintId;
use crate::evaluator::Verdict;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The verdict of one validation for one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    pub id: ConstraintId,
    /// Canonical text of the validation
    pub validation: String,
    pub relation: String,
    pub verdict: Verdict,
}

/// Verdicts of every validation of a model for one row, in index order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub entries: Vec<CheckEntry>,
}

impl CheckReport {
    pub fn verdict(&self, id: ConstraintId) -> Option<Verdict> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.verdict)
    }

    pub fn satisfied(&self) -> impl Iterator<Item = &CheckEntry> {
        self.with_verdict(Verdict::Satisfied)
    }

    pub fn violated(&self) -> impl Iterator<Item = &CheckEntry> {
        self.with_verdict(Verdict::Violated)
    }

    pub fn indeterminate(&self) -> impl Iterator<Item = &CheckEntry> {
        self.with_verdict(Verdict::Indeterminate)
    }

    /// No validation is violated; indeterminate ones do not count
    pub fn is_valid(&self) -> bool {
        self.violated().next().is_none()
    }

    fn with_verdict(&self, verdict: Verdict) -> impl Iterator<Item = &CheckEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.verdict == verdict)
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.verdict, entry.validation)?;
        }
        Ok(())
    }
}

/// A row violates at least one validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Row violates {} validation(s): {}", .violations.len(), .violations.join("; "))]
pub struct ValidationFailure {
    /// Relation of every violated validation, in index order
    pub violations: Vec<String>,
}
