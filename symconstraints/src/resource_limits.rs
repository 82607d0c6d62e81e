/// Limits that keep constraint derivation bounded on pathological inputs
///
/// The elimination engine stops with `ConstraintError::BudgetExceeded` when one
/// of the derivation budgets runs out, handing back everything derived so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum number of pairwise elimination attempts
    /// Real usage: ~10-100, Limit: 100 000
    pub max_eliminations: usize,

    /// Maximum number of derived (non user-declared) constraints
    /// Real usage: ~1-20, Limit: 512
    pub max_derived_constraints: usize,

    /// Derived constraints whose normalized expression has more nodes than this
    /// are dropped instead of stored
    pub max_expression_nodes: usize,

    /// Maximum size of a single relation's source text in bytes
    pub max_relation_bytes: usize,

    /// Maximum nesting depth of parenthesized groups and powers in a relation
    /// Real usage: ~1-5, Limit: 100
    pub max_expression_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_eliminations: 100_000,
            max_derived_constraints: 512,
            max_expression_nodes: 256,
            max_relation_bytes: 64 * 1024, // 64 KB
            max_expression_depth: 100,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_eliminations(mut self, max: usize) -> Self {
        self.max_eliminations = max;
        self
    }

    pub fn with_max_derived_constraints(mut self, max: usize) -> Self {
        self.max_derived_constraints = max;
        self
    }

    pub fn with_max_expression_nodes(mut self, max: usize) -> Self {
        self.max_expression_nodes = max;
        self
    }

    pub fn with_max_relation_bytes(mut self, max: usize) -> Self {
        self.max_relation_bytes = max;
        self
    }

    pub fn with_max_expression_depth(mut self, max: usize) -> Self {
        self.max_expression_depth = max;
        self
    }
}
