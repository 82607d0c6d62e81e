use crate::error::ConstraintError;
use crate::symbol::{Assumption, Assumptions, SymbolRegistry};
use rust_decimal::Decimal;

#[test]
fn test_symbol_is_idempotent() {
    let mut registry = SymbolRegistry::new();
    let first = registry.symbol("x", Assumptions::positive()).unwrap();
    let second = registry.symbol("x", Assumptions::positive()).unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_conflicting_assumptions_are_rejected() {
    let mut registry = SymbolRegistry::new();
    registry.symbol("x", Assumptions::positive()).unwrap();
    match registry.symbol("x", Assumptions::negative()) {
        Err(ConstraintError::DuplicateSymbol { name, .. }) => assert_eq!(name, "x"),
        other => panic!("Expected duplicate symbol error, got {:?}", other),
    }
}

#[test]
fn test_batch_registration_keeps_order() {
    let mut registry = SymbolRegistry::new();
    let symbols = registry
        .symbols(&["width", "height", "area"], Assumptions::nonnegative())
        .unwrap();
    assert_eq!(symbols.len(), 3);
    let names: Vec<&str> = registry.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["width", "height", "area"]);
}

#[test]
fn test_resolve_registers_real_symbols() {
    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    assert_eq!(*x.assumptions(), Assumptions::real());
    assert_eq!(registry.resolve("x"), x);
}

#[test]
fn test_parse_assumptions() {
    let parsed: Assumptions = "integer, nonnegative".parse().unwrap();
    assert!(parsed.is_integer());
    assert_eq!(parsed.to_string(), "integer, nonnegative");

    let parsed: Assumptions = "positive".parse().unwrap();
    assert_eq!(parsed, Assumptions::positive());

    let parsed: Assumptions = "nonnegative nonzero".parse().unwrap();
    assert_eq!(parsed, Assumptions::positive());
}

#[test]
fn test_invalid_assumptions() {
    let cases = vec!["positive, negative", "bogus", "negative nonnegative nonzero"];
    for input in cases {
        match input.parse::<Assumptions>() {
            Err(ConstraintError::InvalidAssumption { .. }) => {}
            other => panic!("Expected invalid assumption for {:?}, got {:?}", input, other),
        }
    }
    assert!(Assumptions::positive().with(Assumption::Nonpositive).is_err());
}

#[test]
fn test_admits_values() {
    let domain: Assumptions = "integer, positive".parse().unwrap();
    assert!(domain.admits(&Decimal::from(3)));
    assert!(!domain.admits(&Decimal::new(25, 1)));
    assert!(!domain.admits(&Decimal::ZERO));
    assert!(!domain.admits(&Decimal::from(-3)));
    assert!(Assumptions::real().admits(&Decimal::from(-3)));
}
