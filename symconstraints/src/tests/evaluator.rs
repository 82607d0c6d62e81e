use crate::algebra::SymbolicAlgebra;
use crate::assignment::Assignment;
use crate::constraint::normalize;
use crate::evaluator::{Evaluator, Verdict};
use crate::operation_result::Veto;
use crate::parser::{parse_expression, parse_relation};
use crate::resource_limits::ResourceLimits;
use crate::symbol::SymbolRegistry;
use rust_decimal::Decimal;
use std::str::FromStr;

fn value(input: &str, assignment: &Assignment) -> Result<Decimal, Veto> {
    let mut registry = SymbolRegistry::new();
    let expr = parse_expression(input, &mut registry, &ResourceLimits::default()).unwrap();
    Evaluator::new().evaluate_expr(&expr, assignment)
}

fn verdict(input: &str, assignment: &Assignment) -> Verdict {
    let mut registry = SymbolRegistry::new();
    let relation = parse_relation(input, &mut registry, &ResourceLimits::default()).unwrap();
    let normalized = normalize(&SymbolicAlgebra::new(), &relation).unwrap();
    Evaluator::new().evaluate_normalized(&normalized, assignment)
}

#[test]
fn test_arithmetic() {
    let row = Assignment::new().with("x", 6).with("y", 4);
    assert_eq!(value("x * y + 1", &row), Ok(Decimal::from(25)));
    assert_eq!(value("x / y", &row), Ok(Decimal::from_str("1.5").unwrap()));
    assert_eq!(value("x**2 - y**-1", &row), Ok(Decimal::from_str("35.75").unwrap()));
    assert_eq!(value("abs(y - x)", &row), Ok(Decimal::from(2)));
}

#[test]
fn test_division_is_exact_when_possible() {
    let row = Assignment::new().with("area", 18).with("height", 9);
    assert_eq!(value("area / height", &row), Ok(Decimal::from(2)));
}

#[test]
fn test_roots() {
    let row = Assignment::new().with("x", 16).with("y", -8);
    assert_eq!(value("sqrt(x)", &row), Ok(Decimal::from(4)));
    let cube_root = value("y**(1/3)", &row).unwrap();
    assert!((cube_root + Decimal::from(2)).abs() < Decimal::new(1, 9), "{}", cube_root);
    assert!(matches!(value("sqrt(y)", &row), Err(Veto::Undefined(_))));
}

#[test]
fn test_undefined_operations() {
    let row = Assignment::new().with("x", 0);
    assert!(matches!(value("1 / x", &row), Err(Veto::Undefined(_))));
    assert!(matches!(value("log(x)", &row), Err(Veto::Undefined(_))));
}

#[test]
fn test_missing_symbols() {
    let row = Assignment::new().with("x", 1).with_missing("y");
    assert_eq!(value("x + y", &row), Err(Veto::Missing("y".to_string())));
    assert_eq!(value("x + z", &row), Err(Veto::Missing("z".to_string())));
}

#[test]
fn test_verdicts() {
    let row = Assignment::new().with("height", 6).with("width", 5).with("area", 30);
    assert_eq!(verdict("area = width * height", &row), Verdict::Satisfied);
    assert_eq!(verdict("height > width", &row), Verdict::Satisfied);
    assert_eq!(verdict("height < width", &row), Verdict::Violated);
    assert_eq!(verdict("height <= 6", &row), Verdict::Satisfied);
    assert_eq!(verdict("height < 6", &row), Verdict::Violated);
    assert_eq!(verdict("area = 31", &row), Verdict::Violated);
}

#[test]
fn test_missing_value_is_indeterminate() {
    let row = Assignment::new().with("height", 5).with_missing("width").with("area", 14);
    assert_eq!(verdict("height > width", &row), Verdict::Indeterminate);
    assert_eq!(verdict("height > 1", &row), Verdict::Satisfied);
}

#[test]
fn test_undefined_arithmetic_is_indeterminate() {
    let row = Assignment::new().with("x", -4).with("y", 1);
    assert_eq!(verdict("y < sqrt(x)", &row), Verdict::Indeterminate);
}

#[test]
fn test_equalities_tolerate_rounding() {
    // sqrt(2)**2 only equals 2 up to rounding
    let row = Assignment::new().with("x", 2);
    let mut registry = SymbolRegistry::new();
    let root = parse_expression("sqrt(x)", &mut registry, &ResourceLimits::default()).unwrap();
    let root = Evaluator::new().evaluate_expr(&root, &row).unwrap();

    let row = row.with("y", root);
    assert_eq!(verdict("y**2 = x", &row), Verdict::Satisfied);
    assert_eq!(verdict("y**2 = x + 1", &row), Verdict::Violated);
}
