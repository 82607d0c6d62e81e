use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Concrete values of one row, keyed by symbol name.
///
/// A name that is absent or mapped to `None` is missing. The core only ever
/// reads assignments; imputation returns a completed copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    values: BTreeMap<String, Option<Decimal>>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Decimal>) -> Self {
        self.set(name, Some(value.into()));
        self
    }

    pub fn with_missing(mut self, name: &str) -> Self {
        self.set(name, None);
        self
    }

    pub fn set(&mut self, name: &str, value: Option<Decimal>) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.values.get(name).copied().flatten()
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every entry, missing ones included, in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Decimal>)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Names that are present but missing a value
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Option<Decimal>)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (S, Option<Decimal>)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Format: `area=30, height=6, width=missing`
impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .iter()
            .map(|(name, value)| match value {
                Some(value) => format!("{}={}", name, value),
                None => format!("{}=missing", name),
            })
            .collect();
        write!(f, "{}", entries.join(", "))
    }
}
