use crate::algebra::{Algebra, SymbolicAlgebra};
use crate::semantic::{Expr, Function};
use crate::symbol::{Assumptions, Symbol, SymbolRegistry};

fn symbol(name: &str, assumptions: Assumptions) -> Symbol {
    SymbolRegistry::new().symbol(name, assumptions).unwrap()
}

fn texts(solutions: &[Expr]) -> Vec<String> {
    solutions.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_linear() {
    let algebra = SymbolicAlgebra::new();
    let x = symbol("x", Assumptions::real());
    let expr = Expr::num(2) * Expr::symbol(&x) - Expr::num(6);
    assert_eq!(algebra.solve(&expr, &x), vec![Expr::num(3)]);
}

#[test]
fn test_product_for_each_symbol() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let area = registry.resolve("area");
    let width = registry.resolve("width");
    let height = registry.resolve("height");
    let expr = Expr::symbol(&height) * Expr::symbol(&width) - Expr::symbol(&area);

    assert_eq!(texts(&algebra.solve(&expr, &area)), vec!["height*width"]);
    assert_eq!(texts(&algebra.solve(&expr, &width)), vec!["area/height"]);
    assert_eq!(texts(&algebra.solve(&expr, &height)), vec!["area/width"]);
}

#[test]
fn test_pure_square_has_two_branches() {
    let algebra = SymbolicAlgebra::new();
    let x = symbol("x", Assumptions::real());
    let expr = Expr::powi(Expr::symbol(&x), 2) - Expr::num(4);
    assert_eq!(algebra.solve(&expr, &x), vec![Expr::num(-2), Expr::num(2)]);

    let expr = Expr::powi(Expr::symbol(&x), 2) + Expr::one();
    assert!(algebra.solve(&expr, &x).is_empty());
}

#[test]
fn test_domain_filters_branches() {
    let algebra = SymbolicAlgebra::new();
    let x = symbol("x", Assumptions::positive());
    let expr = Expr::powi(Expr::symbol(&x), 2) - Expr::num(4);
    assert_eq!(algebra.solutions(&expr, &x), vec![Expr::num(2)]);
}

#[test]
fn test_quadratic_formula() {
    let algebra = SymbolicAlgebra::new();
    let x = symbol("x", Assumptions::real());
    let xe = Expr::symbol(&x);
    let expr = Expr::powi(xe.clone(), 2) - Expr::num(3) * xe + Expr::num(2);
    assert_eq!(algebra.solve(&expr, &x), vec![Expr::num(1), Expr::num(2)]);
}

#[test]
fn test_structural_inversion() {
    let algebra = SymbolicAlgebra::new();
    let x = symbol("x", Assumptions::real());
    let xe = Expr::symbol(&x);

    let expr = Expr::func(Function::Exp, xe.clone()) - Expr::num(3);
    assert_eq!(
        algebra.solve(&expr, &x),
        vec![Expr::func(Function::Log, Expr::num(3))]
    );

    let expr = Expr::func(Function::Abs, xe) - Expr::num(2);
    assert_eq!(algebra.solve(&expr, &x), vec![Expr::num(-2), Expr::num(2)]);
}

#[test]
fn test_square_root_is_inverted() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    let y = registry.resolve("y");
    let expr = Expr::symbol(&y) - Expr::sqrt(Expr::symbol(&x));
    assert_eq!(texts(&algebra.solve(&expr, &x)), vec!["y**2"]);
}

#[test]
fn test_absent_symbol_has_no_solution() {
    let algebra = SymbolicAlgebra::new();
    let mut registry = SymbolRegistry::new();
    let x = registry.resolve("x");
    let y = registry.resolve("y");
    let expr = Expr::symbol(&y) - Expr::one();
    assert!(algebra.solve(&expr, &x).is_empty());

    let expr = Expr::symbol(&x) - Expr::symbol(&x);
    assert!(algebra.solve(&expr, &x).is_empty());
}
