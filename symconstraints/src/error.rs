use crate::ast::Span;
use crate::index::ValidationIndex;
use crate::symbol::Assumptions;
use thiserror::Error;

/// Errors raised while building a constraint model
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// Relation text could not be parsed
    #[error("Parse error: {message} at {span} in `{source_text}`")]
    Parse {
        message: String,
        span: Span,
        source_text: String,
    },

    /// Relation kind outside equality / inequality (e.g. `!=`)
    #[error("Unsupported relation `{relation}`: {reason}")]
    UnsupportedRelation { relation: String, reason: String },

    /// The same symbol name was requested with different assumptions
    #[error("Symbol `{name}` already declared as {existing}, cannot redeclare as {requested}")]
    DuplicateSymbol {
        name: String,
        existing: Assumptions,
        requested: Assumptions,
    },

    /// Assumption text is unknown or the combination is empty
    #[error("Invalid assumption `{assumption}`: {reason}")]
    InvalidAssumption { assumption: String, reason: String },

    /// Two constraints are jointly unsatisfiable
    #[error(
        "Contradiction: `{relation}` derived from ({}) and ({})",
        .first.join(", "),
        .second.join(", ")
    )]
    Contradiction {
        relation: String,
        first: Vec<String>,
        second: Vec<String>,
    },

    /// A derivation budget was exhausted; `partial` holds what was derived so far
    #[error("Derivation budget `{limit_name}` exceeded (limit {limit_value}); {} validations derived so far", .partial.len())]
    BudgetExceeded {
        limit_name: String,
        limit_value: usize,
        partial: Box<ValidationIndex>,
    },

    /// An input resource limit was exceeded
    #[error("Resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value}). {suggestion}")]
    LimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConstraintError {
    pub fn parse(message: impl Into<String>, span: Span, source_text: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            span,
            source_text: source_text.into(),
        }
    }

    pub fn unsupported(relation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedRelation {
            relation: relation.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error aborted construction with a usable partial index
    pub fn partial_index(&self) -> Option<&ValidationIndex> {
        match self {
            Self::BudgetExceeded { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
