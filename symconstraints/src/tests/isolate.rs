use crate::algebra::{Algebra, Bound, SymbolicAlgebra};
use crate::semantic::Expr;
use crate::symbol::{Assumptions, SymbolRegistry};

fn texts(bounds: &[Bound]) -> Vec<String> {
    bounds
        .iter()
        .map(|b| format!("{}{}", if b.strict { "" } else { "=" }, b.expr))
        .collect()
}

#[test]
fn test_linear_bound_flips_on_negative_coefficient() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let a = registry.resolve("a");
    let b = registry.resolve("b");
    // a - 3*b < 0
    let expr = Expr::symbol(&a) - Expr::num(3) * Expr::symbol(&b);

    let range = algebra.bound(&expr, true, &b).unwrap();
    assert_eq!(texts(&range.lower), vec!["a/3"]);
    assert!(range.upper.is_empty());

    let range = algebra.bound(&expr, true, &a).unwrap();
    assert!(range.lower.is_empty());
    assert_eq!(texts(&range.upper), vec!["3*b"]);
}

#[test]
fn test_non_strict_bounds() {
    let algebra = SymbolicAlgebra::new();
    let x = SymbolRegistry::new().resolve("x");
    let expr = Expr::symbol(&x) - Expr::num(5);
    let range = algebra.bound(&expr, false, &x).unwrap();
    assert_eq!(texts(&range.upper), vec!["=5"]);
}

#[test]
fn test_square_below_bound_is_two_sided() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let b = registry.resolve("b");
    let c = registry.resolve("c");
    // b**2 + 1 - c < 0
    let expr = Expr::powi(Expr::symbol(&b), 2) + Expr::one() - Expr::symbol(&c);

    let range = algebra.bound(&expr, true, &b).unwrap();
    assert_eq!(texts(&range.lower), vec!["-sqrt(c - 1)"]);
    assert_eq!(texts(&range.upper), vec!["sqrt(c - 1)"]);
}

#[test]
fn test_square_of_nonnegative_symbol_is_one_sided() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let b = registry.symbol("b", Assumptions::nonnegative()).unwrap();
    let c = registry.resolve("c");
    let expr = Expr::powi(Expr::symbol(&b), 2) + Expr::one() - Expr::symbol(&c);

    let range = algebra.bound(&expr, true, &b).unwrap();
    assert!(range.lower.is_empty());
    assert_eq!(texts(&range.upper), vec!["sqrt(c - 1)"]);
}

#[test]
fn test_square_above_bound_is_a_disjunction() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    let c = registry.resolve("c");
    // c - x**2 < 0, i.e. x**2 > c
    let expr = Expr::symbol(&c) - Expr::powi(Expr::symbol(&x), 2);
    assert_eq!(algebra.bound(&expr, true, &x), None);
}

#[test]
fn test_coefficient_of_unknown_sign_is_not_divided() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    let y = registry.resolve("y");
    let expr = Expr::symbol(&x) * Expr::symbol(&y) - Expr::one();
    assert_eq!(algebra.bound(&expr, true, &x), None);

    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    let y = registry.symbol("y", Assumptions::positive()).unwrap();
    let expr = Expr::symbol(&x) * Expr::symbol(&y) - Expr::one();
    let range = algebra.bound(&expr, true, &x).unwrap();
    assert_eq!(texts(&range.upper), vec!["1/y"]);
}

#[test]
fn test_absent_symbol_has_no_bound() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    let y = registry.resolve("y");
    assert_eq!(algebra.bound(&(Expr::symbol(&y) - Expr::one()), true, &x), None);
}
