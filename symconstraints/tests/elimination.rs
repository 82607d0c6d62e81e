use symconstraints::{Assumptions, ConstraintError, ConstraintModel, ModelBuilder, ResourceLimits};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG=symconstraints=debug` shows every derivation step
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn relations(model: &ConstraintModel) -> Vec<String> {
    model
        .validations()
        .iter()
        .map(|v| v.relation().to_string())
        .collect()
}

#[test]
fn test_chained_bounds() {
    init_tracing();
    let model = ConstraintModel::build(&["a < b", "b < c", "b > d"], &[]).unwrap();

    assert_eq!(
        relations(&model),
        vec!["a < b", "b < c", "b > d", "a < c", "d < c"]
    );

    let a_c = model.index().by_names(&["a", "c"]);
    assert_eq!(a_c.len(), 1);
    assert_eq!(
        a_c[0].origins().iter().map(|r| r.to_string()).collect::<Vec<_>>(),
        vec!["a < b", "b < c"]
    );
}

#[test]
fn test_non_strict_chain_stays_non_strict() {
    let model = ConstraintModel::build(&["x <= y", "y <= z"], &[]).unwrap();
    let derived = model.index().by_names(&["x", "z"]);
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].relation().to_string(), "x <= z");
}

#[test]
fn test_mixed_strictness_chain_is_strict() {
    let model = ConstraintModel::build(&["x <= y", "y < z"], &[]).unwrap();
    let derived = model.index().by_names(&["x", "z"]);
    assert_eq!(derived[0].relation().to_string(), "x < z");
}

#[test]
fn test_equalities_substitute_into_each_other() {
    let model = ConstraintModel::build(&["a = b + 1", "c = 2*a"], &[]).unwrap();
    let derived = model.index().by_names(&["b", "c"]);
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].relation().to_string(), "c = 2*b + 2");
    assert!(derived[0].kind().is_equality());
}

#[test]
fn test_duplicate_relations_collapse() {
    let model = ConstraintModel::build(&["a < 3*b", "3*b > a", "2*a < 6*b"], &[]).unwrap();
    assert_eq!(relations(&model), vec!["a < 3*b"]);
}

#[test]
fn test_tautology_is_dropped() {
    let model = ConstraintModel::build(&["1 < 2", "x < y"], &[]).unwrap();
    assert_eq!(relations(&model), vec!["x < y"]);
}

#[test]
fn test_derived_tautology_is_dropped() {
    let model = ConstraintModel::build(&["y = x**2 + 1", "y > 0"], &[]).unwrap();
    // `x**2 + 1 > 0` holds for every real x
    assert_eq!(relations(&model), vec!["y = x**2 + 1", "y > 0"]);
}

#[test]
fn test_unrelated_relations_derive_nothing() {
    let model = ConstraintModel::build(&["a < b", "c < d"], &[]).unwrap();
    assert_eq!(model.validations().len(), 2);
    assert!(model.validations().iter().all(|v| !v.is_derived()));
}

#[test]
fn test_undeterminable_orientation_is_skipped() {
    // The coefficient of `b` has unknown sign, so `b` cannot be isolated
    let model = ConstraintModel::build(&["a*b < 1", "b > c"], &[]).unwrap();
    assert_eq!(model.validations().len(), 2);
}

#[test]
fn test_contradiction_between_relations() {
    let error = ConstraintModel::build(&["x < 1", "x > 2"], &[]).unwrap_err();
    match error {
        ConstraintError::Contradiction {
            relation,
            first,
            second,
        } => {
            assert_eq!(relation, "2 < 1");
            assert_eq!(first, vec!["x < 1"]);
            assert_eq!(second, vec!["x > 2"]);
        }
        other => panic!("Expected contradiction, got {:?}", other),
    }
}

#[test]
fn test_contradictory_relation() {
    let error = ConstraintModel::build(&["1 > 2"], &[]).unwrap_err();
    assert!(
        matches!(error, ConstraintError::Contradiction { ref relation, .. } if relation == "1 > 2"),
        "{}",
        error
    );
}

#[test]
fn test_derived_constraint_budget() {
    init_tracing();
    let mut builder =
        ModelBuilder::new().limits(ResourceLimits::default().with_max_derived_constraints(0));
    builder.relation("a < 3*b").unwrap();
    builder.relation("c > b**2 + 1").unwrap();

    let error = builder.build().unwrap_err();
    match &error {
        ConstraintError::BudgetExceeded {
            limit_name,
            limit_value,
            ..
        } => {
            assert_eq!(limit_name, "max_derived_constraints");
            assert_eq!(*limit_value, 0);
        }
        other => panic!("Expected budget error, got {:?}", other),
    }
    let partial = error.partial_index().expect("partial index");
    assert_eq!(partial.len(), 2);
}

#[test]
fn test_elimination_budget() {
    let mut builder = ModelBuilder::new().limits(ResourceLimits::default().with_max_eliminations(0));
    builder.relation("a < 3*b").unwrap();
    builder.relation("c > b**2 + 1").unwrap();

    let error = builder.build().unwrap_err();
    assert!(error.to_string().contains("max_eliminations"), "{}", error);
    assert_eq!(error.partial_index().map(|index| index.len()), Some(2));
}

#[test]
fn test_oversized_derived_expressions_are_dropped() {
    let mut builder =
        ModelBuilder::new().limits(ResourceLimits::default().with_max_expression_nodes(3));
    builder.relation("a < 3*b").unwrap();
    builder.relation("c > b**2 + 1").unwrap();

    let model = builder.build().unwrap();
    assert!(model.index().by_names(&["a", "c"]).is_empty());
}

#[test]
fn test_substitution_chain_terminates() {
    init_tracing();
    let model = ConstraintModel::build(&["x = y + z", "x**3 = w", "u = x**2 + y"], &[]).unwrap();

    assert!(model.validations().len() < 32, "{:#?}", relations(&model));
    assert!(!model.index().by_names(&["w", "y", "z"]).is_empty());
    assert!(!model.index().by_names(&["u", "y", "z"]).is_empty());
    // Every derivation draws on at least two declared relations
    for validation in model.validations().iter().filter(|v| v.is_derived()) {
        assert!(validation.origins().len() >= 2, "{}", validation.relation());
    }
}

#[test]
fn test_every_eliminable_pair_is_combined() {
    // (relations, assumptions, symbols of the derived relation, strict)
    let cases: [(&[&str], &[(&str, Assumptions)], &[&str], Option<bool>); 7] = [
        (&["a = 2*b", "c = b + 3"], &[], &["a", "c"], None),
        (&["a = b + c", "c <= d - e"], &[], &["a", "b", "d", "e"], Some(false)),
        (&["a <= b + c", "c <= d - e"], &[], &["a", "b", "d", "e"], Some(false)),
        (&["a = b + c", "c < d - e"], &[], &["a", "b", "d", "e"], Some(true)),
        (&["abs(s) < r", "r < t"], &[], &["s", "t"], Some(true)),
        (&["exp(e) < f", "e > h"], &[], &["f", "h"], Some(true)),
        (&["q**2 < p", "q > m"], &[("q", Assumptions::positive())], &["m", "p"], Some(true)),
    ];

    for (input, assumptions, symbols, strict) in cases {
        let model = ConstraintModel::build(input, assumptions)
            .unwrap_or_else(|e| panic!("{:?} failed: {}", input, e));
        let derived = model.index().by_names(symbols);
        assert_eq!(derived.len(), 1, "{:?}: {:#?}", input, relations(&model));

        let kind = derived[0].kind();
        match strict {
            None => assert!(kind.is_equality(), "{:?}: {}", input, derived[0].relation()),
            Some(strict) => {
                assert!(!kind.is_equality(), "{:?}: {}", input, derived[0].relation());
                assert_eq!(kind.is_strict(), strict, "{:?}: {}", input, derived[0].relation());
            }
        }
        assert_eq!(derived[0].origins().len(), 2);
    }
}
