use crate::algebra::sign::sign_of;
use crate::algebra::Sign;
use crate::semantic::{Expr, Function};
use crate::symbol::{Assumptions, SymbolRegistry};

fn var(name: &str, assumptions: Assumptions) -> Expr {
    let mut registry = SymbolRegistry::new();
    Expr::symbol(&registry.symbol(name, assumptions).unwrap())
}

#[test]
fn test_constants() {
    assert_eq!(sign_of(&Expr::num(3)), Sign::POSITIVE);
    assert_eq!(sign_of(&Expr::num(-3)), Sign::NEGATIVE);
    assert_eq!(sign_of(&Expr::zero()), Sign::ZERO);
}

#[test]
fn test_symbols_follow_assumptions() {
    assert_eq!(sign_of(&var("x", Assumptions::positive())), Sign::POSITIVE);
    assert_eq!(sign_of(&var("x", Assumptions::real())), Sign::ANY);
}

#[test]
fn test_even_powers_are_nonnegative() {
    let x = var("x", Assumptions::real());
    assert_eq!(sign_of(&Expr::powi(x.clone(), 2)), Sign::NONNEGATIVE);
    assert_eq!(sign_of(&Expr::powi(x.clone(), 3)), Sign::ANY);
    assert_eq!(sign_of(&Expr::sqrt(x)), Sign::NONNEGATIVE);
}

#[test]
fn test_negative_exponent_excludes_zero() {
    let x = var("x", Assumptions::nonnegative());
    assert_eq!(sign_of(&Expr::powi(x, -1)), Sign::POSITIVE);
}

#[test]
fn test_sums_and_products() {
    let x = var("x", Assumptions::nonnegative());
    let y = var("y", Assumptions::negative());

    assert_eq!(sign_of(&(x.clone() + Expr::one())), Sign::POSITIVE);
    assert_eq!(sign_of(&(x.clone() * y.clone())), Sign::NONPOSITIVE);
    assert_eq!(sign_of(&(y.clone() * y.clone())), Sign::POSITIVE);
    assert_eq!(sign_of(&(x + y)), Sign::ANY);
}

#[test]
fn test_functions() {
    let x = var("x", Assumptions::real());
    assert_eq!(
        sign_of(&Expr::func(Function::Abs, x.clone())),
        Sign::NONNEGATIVE
    );
    assert_eq!(sign_of(&Expr::func(Function::Exp, x.clone())), Sign::POSITIVE);
    assert_eq!(sign_of(&Expr::func(Function::Log, x)), Sign::ANY);
}

#[test]
fn test_log_of_constant_compares_with_one() {
    let log = |value: Expr| sign_of(&Expr::func(Function::Log, value));
    assert_eq!(log(Expr::num(2)), Sign::POSITIVE);
    assert_eq!(log(Expr::one()), Sign::ZERO);
    assert_eq!(log(Expr::rational(1, 2)), Sign::NEGATIVE);
    assert_eq!(log(Expr::num(-2)), Sign::ANY);
}

#[test]
fn test_sign_set_operations() {
    assert!(Sign::POSITIVE.is_within(Sign::NONNEGATIVE));
    assert!(!Sign::NONNEGATIVE.is_within(Sign::POSITIVE));
    assert_eq!(Sign::NONNEGATIVE.negate(), Sign::NONPOSITIVE);
    assert_eq!(Sign::NEGATIVE.mul(Sign::NEGATIVE), Sign::POSITIVE);
    assert_eq!(Sign::POSITIVE.add(Sign::NEGATIVE), Sign::ANY);
    assert!(Sign::POSITIVE.intersect(Sign::NEGATIVE).is_empty());
}
