use crate::algebra::simplify::{leading_coefficient, polynomial_in, simplify};
use crate::semantic::{Expr, Function};
use crate::symbol::{Assumptions, SymbolRegistry};
use num_bigint::BigInt;
use num_rational::BigRational;

fn var(name: &str, assumptions: Assumptions) -> Expr {
    let mut registry = SymbolRegistry::new();
    Expr::symbol(&registry.symbol(name, assumptions).unwrap())
}

fn real(name: &str) -> Expr {
    var(name, Assumptions::real())
}

#[test]
fn test_expands_small_powers_of_sums() {
    let x = real("x");
    let expr = Expr::powi(x + Expr::one(), 2);
    assert_eq!(simplify(&expr).to_string(), "x**2 + 2*x + 1");
}

#[test]
fn test_keeps_large_powers_of_sums() {
    let x = real("x");
    let expr = Expr::powi(x + Expr::one(), 7);
    assert_eq!(simplify(&expr).to_string(), "(x + 1)**7");
}

#[test]
fn test_like_terms_cancel() {
    let x = real("x");
    let expr = Expr::num(2) * x.clone() - x.clone() - x.clone();
    assert_eq!(simplify(&expr), Expr::zero());

    let expr = x.clone() / x;
    assert_eq!(simplify(&expr), Expr::one());
}

#[test]
fn test_canonical_form_is_order_independent() {
    let (a, b) = (real("a"), real("b"));
    let left = a.clone() * b.clone() + b.clone() * a.clone();
    let right = Expr::num(2) * b * a;
    assert_eq!(simplify(&left), simplify(&right));
}

#[test]
fn test_products_of_powers() {
    let (x, y) = (real("x"), real("y"));
    let expr = Expr::powi(x * y, 2);
    assert_eq!(simplify(&expr).to_string(), "x**2*y**2");
}

#[test]
fn test_square_root_of_square_depends_on_sign() {
    let x = real("x");
    let expr = Expr::sqrt(Expr::num(4) * Expr::powi(x, 2));
    assert_eq!(simplify(&expr).to_string(), "2*abs(x)");

    let x = var("x", Assumptions::positive());
    let expr = Expr::sqrt(Expr::powi(x.clone(), 2));
    assert_eq!(simplify(&expr), x);
}

#[test]
fn test_perfect_rational_roots_fold() {
    let expr = Expr::sqrt(Expr::rational(9, 4));
    assert_eq!(simplify(&expr), Expr::rational(3, 2));

    let expr = Expr::pow(Expr::num(-8), BigRational::new(BigInt::from(1), BigInt::from(3)));
    assert_eq!(simplify(&expr), Expr::num(-2));

    let expr = Expr::sqrt(Expr::num(8));
    assert_eq!(simplify(&expr).to_string(), "sqrt(8)");
}

#[test]
fn test_roots_of_sums_share_a_monic_atom() {
    let x = real("x");
    let left = Expr::sqrt(Expr::num(2) * x.clone() + Expr::num(2));
    let right = Expr::sqrt(Expr::num(2)) * Expr::sqrt(x + Expr::one());
    assert_eq!(simplify(&left), simplify(&right));
}

#[test]
fn test_root_of_sum_with_negative_lead_is_kept() {
    let x = real("x");
    let expr = Expr::sqrt(Expr::one() - x);
    assert_eq!(simplify(&expr).to_string(), "sqrt(-x + 1)");
}

#[test]
fn test_exp_and_log_cancel() {
    let x = real("x");
    let expr = Expr::func(Function::Exp, Expr::func(Function::Log, x.clone()));
    assert_eq!(simplify(&expr), x);

    let expr = Expr::func(Function::Log, Expr::func(Function::Exp, x.clone()));
    assert_eq!(simplify(&expr), x);

    let expr = Expr::func(Function::Log, Expr::one());
    assert_eq!(simplify(&expr), Expr::zero());
}

#[test]
fn test_abs_of_known_sign() {
    let x = var("x", Assumptions::nonnegative());
    assert_eq!(simplify(&Expr::func(Function::Abs, x.clone())), x);
    assert_eq!(
        simplify(&Expr::func(Function::Abs, Expr::num(-3))),
        Expr::num(3)
    );
}

#[test]
fn test_leading_coefficient() {
    let x = real("x");
    let expr = Expr::num(3) * Expr::powi(x.clone(), 2) - x;
    assert_eq!(
        leading_coefficient(&expr),
        Some(BigRational::from_integer(BigInt::from(3)))
    );
    assert_eq!(leading_coefficient(&Expr::num(5)), None);
}

#[test]
fn test_polynomial_view() {
    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    let a = Expr::symbol(&registry.resolve("a"));
    let b = Expr::symbol(&registry.resolve("b"));
    let xe = Expr::symbol(&x);

    let expr = a.clone() * Expr::powi(xe.clone(), 2) + b.clone() * xe.clone() + Expr::num(7);
    let coefficients = polynomial_in(&expr, &x).unwrap();
    assert_eq!(coefficients.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(coefficients[&2], a);
    assert_eq!(coefficients[&1], b);
    assert_eq!(coefficients[&0], Expr::num(7));

    let expr = Expr::sqrt(xe.clone()) + xe;
    assert_eq!(polynomial_in(&expr, &x), None);
}
