//! Symbols, their domain assumptions, and the registry that owns them

use crate::algebra::Sign;
use crate::error::ConstraintError;
use crate::ConstraintResult;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// A single domain assumption that can be attached to a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assumption {
    Real,
    Integer,
    Positive,
    Negative,
    Nonnegative,
    Nonpositive,
    Nonzero,
}

impl Assumption {
    fn sign(self) -> Sign {
        match self {
            Assumption::Real | Assumption::Integer => Sign::ANY,
            Assumption::Positive => Sign::POSITIVE,
            Assumption::Negative => Sign::NEGATIVE,
            Assumption::Nonnegative => Sign::NONNEGATIVE,
            Assumption::Nonpositive => Sign::NONPOSITIVE,
            Assumption::Nonzero => Sign::NONZERO,
        }
    }
}

impl FromStr for Assumption {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "real" => Ok(Assumption::Real),
            "integer" => Ok(Assumption::Integer),
            "positive" => Ok(Assumption::Positive),
            "negative" => Ok(Assumption::Negative),
            "nonnegative" => Ok(Assumption::Nonnegative),
            "nonpositive" => Ok(Assumption::Nonpositive),
            "nonzero" => Ok(Assumption::Nonzero),
            other => Err(ConstraintError::InvalidAssumption {
                assumption: other.to_string(),
                reason: "expected one of real, integer, positive, negative, nonnegative, nonpositive, nonzero".to_string(),
            }),
        }
    }
}

/// The domain of a symbol: a set of admissible signs, optionally restricted to integers.
///
/// Every symbol is real valued; the default assumptions are "real".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assumptions {
    sign: Sign,
    integer: bool,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::real()
    }
}

impl Assumptions {
    pub fn real() -> Self {
        Self {
            sign: Sign::ANY,
            integer: false,
        }
    }

    pub fn positive() -> Self {
        Self {
            sign: Sign::POSITIVE,
            integer: false,
        }
    }

    pub fn nonnegative() -> Self {
        Self {
            sign: Sign::NONNEGATIVE,
            integer: false,
        }
    }

    pub fn negative() -> Self {
        Self {
            sign: Sign::NEGATIVE,
            integer: false,
        }
    }

    pub fn integer() -> Self {
        Self {
            sign: Sign::ANY,
            integer: true,
        }
    }

    /// Narrow these assumptions by one more; fails if nothing is left
    pub fn with(self, assumption: Assumption) -> ConstraintResult<Self> {
        let sign = self.sign.intersect(assumption.sign());
        if sign.is_empty() {
            return Err(ConstraintError::InvalidAssumption {
                assumption: format!("{:?}", assumption).to_lowercase(),
                reason: format!("incompatible with {}", self),
            });
        }
        Ok(Self {
            sign,
            integer: self.integer || assumption == Assumption::Integer,
        })
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn is_integer(&self) -> bool {
        self.integer
    }

    /// Whether a concrete value lies inside this domain
    pub fn admits(&self, value: &Decimal) -> bool {
        let value_sign = if value.is_zero() {
            Sign::ZERO
        } else if value.is_sign_negative() {
            Sign::NEGATIVE
        } else {
            Sign::POSITIVE
        };
        value_sign.is_within(self.sign) && (!self.integer || value.fract().is_zero())
    }
}

impl FromStr for Assumptions {
    type Err = ConstraintError;

    /// Parses comma or whitespace separated assumptions, e.g. `"integer, nonnegative"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .try_fold(Assumptions::real(), |acc, word| acc.with(word.parse()?))
    }
}

impl fmt::Display for Assumptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.integer, self.sign) {
            (false, Sign::ANY) => write!(f, "real"),
            (true, Sign::ANY) => write!(f, "integer"),
            (false, sign) => write!(f, "{}", sign),
            (true, sign) => write!(f, "integer, {}", sign),
        }
    }
}

/// A named real-valued variable.
///
/// Symbols are cheap handles; identity is the name, which the registry keeps
/// unique together with its assumptions.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: Arc<str>,
    assumptions: Assumptions,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Free symbols of a constraint, ordered by name
pub type SymbolSet = BTreeSet<Symbol>;

/// Render a symbol set as `a, b, c`
pub fn format_symbols<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> String {
    symbols
        .into_iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Owns every symbol of one constraint set
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    symbols: HashMap<String, Symbol>,
    order: Vec<String>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the symbol `name` with exactly these assumptions
    pub fn symbol(&mut self, name: &str, assumptions: Assumptions) -> ConstraintResult<Symbol> {
        if let Some(existing) = self.symbols.get(name) {
            if existing.assumptions != assumptions {
                return Err(ConstraintError::DuplicateSymbol {
                    name: name.to_string(),
                    existing: existing.assumptions,
                    requested: assumptions,
                });
            }
            return Ok(existing.clone());
        }
        let symbol = Symbol {
            name: Arc::from(name),
            assumptions,
        };
        self.symbols.insert(name.to_string(), symbol.clone());
        self.order.push(name.to_string());
        Ok(symbol)
    }

    /// Batch form of [`SymbolRegistry::symbol`]
    pub fn symbols(
        &mut self,
        names: &[&str],
        assumptions: Assumptions,
    ) -> ConstraintResult<Vec<Symbol>> {
        names
            .iter()
            .map(|name| self.symbol(name, assumptions))
            .collect()
    }

    /// The registered symbol, or a new real symbol if `name` is unknown
    pub fn resolve(&mut self, name: &str) -> Symbol {
        if let Some(existing) = self.symbols.get(name) {
            return existing.clone();
        }
        let symbol = Symbol {
            name: Arc::from(name),
            assumptions: Assumptions::real(),
        };
        self.symbols.insert(name.to_string(), symbol.clone());
        self.order.push(name.to_string());
        symbol
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Symbols in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().filter_map(|name| self.symbols.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
