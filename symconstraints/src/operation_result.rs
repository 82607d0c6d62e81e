use rust_decimal::Decimal;
use std::fmt;

/// Why an expression produced no value for a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Veto {
    /// A symbol has no value in the assignment
    Missing(String),
    /// The arithmetic is undefined at this point (division by zero, even root of a negative, ...)
    Undefined(String),
}

impl Veto {
    pub fn is_missing(&self) -> bool {
        matches!(self, Veto::Missing(_))
    }
}

impl fmt::Display for Veto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Veto::Missing(name) => write!(f, "missing value for `{}`", name),
            Veto::Undefined(reason) => write!(f, "undefined: {}", reason),
        }
    }
}

/// Result of evaluating an expression against an assignment
pub type OperationResult = Result<Decimal, Veto>;

pub(crate) fn undefined(reason: impl Into<String>) -> Veto {
    Veto::Undefined(reason.into())
}
