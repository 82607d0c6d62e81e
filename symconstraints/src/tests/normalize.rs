use crate::algebra::SymbolicAlgebra;
use crate::constraint::{constant_holds, normalize, Entailment, Normalized, RelationKind};
use crate::error::ConstraintError;
use crate::parser::parse_relation;
use crate::resource_limits::ResourceLimits;
use crate::symbol::{Assumptions, SymbolRegistry};

fn normalized_with(input: &str, registry: &mut SymbolRegistry) -> crate::ConstraintResult<Normalized> {
    let relation = parse_relation(input, registry, &ResourceLimits::default())?;
    normalize(&SymbolicAlgebra::new(), &relation)
}

fn normalized(input: &str) -> crate::ConstraintResult<Normalized> {
    normalized_with(input, &mut SymbolRegistry::new())
}

#[test]
fn test_zero_compared_forms() {
    let cases = vec![
        ("c > b**2 + 1", "b**2 - c + 1 < 0"),
        ("a < 3*b", "a - 3*b < 0"),
        ("area = width * height", "height*width - area = 0"),
        ("x >= y", "-x + y <= 0"),
        ("height > width", "-height + width < 0"),
    ];
    for (input, expected) in cases {
        let normalized = normalized(input).unwrap();
        assert_eq!(normalized.to_string(), expected, "Wrong form for {}", input);
    }
}

#[test]
fn test_equalities_are_made_monic() {
    assert_eq!(normalized("2*x = 4*y").unwrap().to_string(), "x - 2*y = 0");
    assert_eq!(normalized("-2*x = 4*y").unwrap().to_string(), "x + 2*y = 0");
}

#[test]
fn test_inequalities_keep_their_direction() {
    let normalized = normalized("-2*x < 4*y").unwrap();
    assert_eq!(normalized.kind, RelationKind::Less);
    assert_eq!(normalized.to_string(), "-x - 2*y < 0");
}

#[test]
fn test_equivalent_relations_share_a_form() {
    assert_eq!(normalized("a < 3*b").unwrap(), normalized("3*b > a").unwrap());
    assert_eq!(normalized("2*a < 6*b").unwrap(), normalized("a < 3*b").unwrap());
    assert_eq!(
        normalized("area = width * height").unwrap(),
        normalized("height * width = area").unwrap()
    );
}

#[test]
fn test_disequality_is_unsupported() {
    match normalized("a != b") {
        Err(ConstraintError::UnsupportedRelation { relation, .. }) => {
            assert_eq!(relation, "a != b")
        }
        other => panic!("Expected unsupported relation, got {:?}", other),
    }
}

#[test]
fn test_entailment_from_signs() {
    let algebra = SymbolicAlgebra::new();
    assert_eq!(
        normalized("x**2 >= 0").unwrap().entailment(&algebra),
        Entailment::Always
    );
    assert_eq!(
        normalized("x**2 < -1").unwrap().entailment(&algebra),
        Entailment::Never
    );
    assert_eq!(
        normalized("x < 1").unwrap().entailment(&algebra),
        Entailment::Depends
    );

    let mut registry = SymbolRegistry::new();
    registry.symbol("p", Assumptions::positive()).unwrap();
    assert_eq!(
        normalized_with("p > 0", &mut registry).unwrap().entailment(&algebra),
        Entailment::Always
    );
}

#[test]
fn test_constant_relations() {
    assert_eq!(constant_holds(&normalized("1 < 2").unwrap()), Some(true));
    assert_eq!(constant_holds(&normalized("2 <= 1").unwrap()), Some(false));
    assert_eq!(constant_holds(&normalized("x - x = 0").unwrap()), Some(true));
    assert_eq!(constant_holds(&normalized("x < 2").unwrap()), None);
}
