use crate::algebra::{Algebra, SymbolicAlgebra};
use crate::assignment::Assignment;
use crate::elimination::derive;
use crate::evaluator::{Evaluator, Verdict};
use crate::imputation::{ImputationOutcome, ImputationResolver, ImputationRule};
use crate::index::{Validation, ValidationIndex};
use crate::parser::parse_relation;
use crate::report::{CheckEntry, CheckReport, ValidationFailure};
use crate::resource_limits::ResourceLimits;
use crate::semantic::Relation;
use crate::symbol::{Assumptions, Symbol, SymbolRegistry};
use crate::ConstraintResult;
use serde::Serialize;
use tracing::info;

/// Collects symbols and relations, then derives a [`ConstraintModel`]
pub struct ModelBuilder {
    registry: SymbolRegistry,
    relations: Vec<Relation>,
    algebra: Box<dyn Algebra>,
    limits: ResourceLimits,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            registry: SymbolRegistry::new(),
            relations: Vec::new(),
            algebra: Box::new(SymbolicAlgebra::new()),
            limits: ResourceLimits::default(),
        }
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the built-in algebra
    pub fn algebra(mut self, algebra: impl Algebra + 'static) -> Self {
        self.algebra = Box::new(algebra);
        self
    }

    /// Declare a symbol with domain assumptions. Must precede the relations using it.
    pub fn assume(&mut self, name: &str, assumptions: Assumptions) -> ConstraintResult<Symbol> {
        self.registry.symbol(name, assumptions)
    }

    /// The symbol `name`, registered as real if unknown
    pub fn symbol(&mut self, name: &str) -> Symbol {
        self.registry.resolve(name)
    }

    /// Parse and add a relation such as `"area = width * height"`
    pub fn relation(&mut self, text: &str) -> ConstraintResult<()> {
        let relation = parse_relation(text, &mut self.registry, &self.limits)?;
        self.relations.push(relation);
        Ok(())
    }

    /// Add a relation built from expressions
    pub fn relation_expr(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Derive the validation index and the imputation rules
    pub fn build(self) -> ConstraintResult<ConstraintModel> {
        let index = derive(self.algebra.as_ref(), &self.relations, &self.limits)?;
        let resolver = ImputationResolver::new(self.algebra.as_ref(), &index);
        info!(
            symbols = self.registry.len(),
            relations = self.relations.len(),
            validations = index.len(),
            derived = index.iter().filter(|v| v.is_derived()).count(),
            imputations = resolver.len(),
            "built constraint model"
        );
        Ok(ConstraintModel {
            registry: self.registry,
            index,
            resolver,
            evaluator: Evaluator::new(),
        })
    }
}

/// Declared and derived validations plus imputation rules of one constraint set.
///
/// Immutable once built; checking and imputing rows never changes it.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    registry: SymbolRegistry,
    index: ValidationIndex,
    resolver: ImputationResolver,
    evaluator: Evaluator,
}

#[derive(Serialize)]
struct ModelJson<'a> {
    validations: &'a [Validation],
    imputations: &'a [ImputationRule],
}

impl ConstraintModel {
    /// Build a model from relation text with the built-in algebra and default limits.
    ///
    /// `assumptions` are registered before any relation is parsed; symbols
    /// not listed there are real.
    pub fn build(relations: &[&str], assumptions: &[(&str, Assumptions)]) -> ConstraintResult<Self> {
        let mut builder = ModelBuilder::new();
        for (name, assumption) in assumptions {
            builder.assume(name, *assumption)?;
        }
        for relation in relations {
            builder.relation(relation)?;
        }
        builder.build()
    }

    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    pub fn symbols(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn validations(&self) -> &[Validation] {
        self.index.all()
    }

    pub fn index(&self) -> &ValidationIndex {
        &self.index
    }

    pub fn imputations(&self) -> &[ImputationRule] {
        self.resolver.rules()
    }

    pub fn resolver(&self) -> &ImputationResolver {
        &self.resolver
    }

    /// One verdict per validation for `assignment`
    pub fn check(&self, assignment: &Assignment) -> CheckReport {
        CheckReport {
            entries: self
                .index
                .iter()
                .map(|validation| CheckEntry {
                    id: validation.id(),
                    validation: validation.to_string(),
                    relation: validation.relation().to_string(),
                    verdict: self.evaluator.evaluate(validation, assignment),
                })
                .collect(),
        }
    }

    /// Fail with every violated relation; indeterminate validations are skipped
    pub fn validate(&self, assignment: &Assignment) -> Result<(), ValidationFailure> {
        let violations: Vec<String> = self
            .index
            .iter()
            .filter(|validation| self.evaluator.evaluate(validation, assignment) == Verdict::Violated)
            .map(|validation| validation.relation().to_string())
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { violations })
        }
    }

    /// Fill the missing values of `assignment` from the imputation rules
    pub fn impute(&self, assignment: &Assignment) -> ImputationOutcome {
        self.resolver.impute(&self.evaluator, assignment)
    }

    /// Validations and imputation rules as pretty-printed JSON
    pub fn to_json(&self) -> ConstraintResult<String> {
        let json = ModelJson {
            validations: self.validations(),
            imputations: self.imputations(),
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
