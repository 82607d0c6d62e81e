//! Symbol reference analysis and substitution over expression trees

use crate::semantic::Expr;
use crate::symbol::{Symbol, SymbolSet};

/// Extract every symbol referenced by an expression.
///
/// # Examples
/// ```text
/// Expression: area / height
/// Returns: {area, height}
/// ```
pub fn free_symbols(expr: &Expr) -> SymbolSet {
    let mut symbols = SymbolSet::new();
    collect_symbols(expr, &mut symbols);
    symbols
}

fn collect_symbols(expr: &Expr, symbols: &mut SymbolSet) {
    match expr {
        Expr::Num(_) => {}
        Expr::Sym(symbol) => {
            symbols.insert(symbol.clone());
        }
        Expr::Add(items) | Expr::Mul(items) => {
            for item in items {
                collect_symbols(item, symbols);
            }
        }
        Expr::Pow(base, _) => collect_symbols(base, symbols),
        Expr::Func(_, arg) => collect_symbols(arg, symbols),
    }
}

/// Check if an expression references `symbol`
pub fn contains_symbol(expr: &Expr, symbol: &Symbol) -> bool {
    match expr {
        Expr::Num(_) => false,
        Expr::Sym(s) => s == symbol,
        Expr::Add(items) | Expr::Mul(items) => items.iter().any(|i| contains_symbol(i, symbol)),
        Expr::Pow(base, _) => contains_symbol(base, symbol),
        Expr::Func(_, arg) => contains_symbol(arg, symbol),
    }
}

/// Substitute a specific symbol with an expression throughout an expression tree.
///
/// The result is not simplified.
pub fn substitute(expr: &Expr, symbol: &Symbol, replacement: &Expr) -> Expr {
    match expr {
        Expr::Sym(s) if s == symbol => replacement.clone(),
        Expr::Num(_) | Expr::Sym(_) => expr.clone(),
        Expr::Add(items) => Expr::Add(
            items
                .iter()
                .map(|i| substitute(i, symbol, replacement))
                .collect(),
        ),
        Expr::Mul(items) => Expr::Mul(
            items
                .iter()
                .map(|i| substitute(i, symbol, replacement))
                .collect(),
        ),
        Expr::Pow(base, exponent) => Expr::Pow(
            Box::new(substitute(base, symbol, replacement)),
            exponent.clone(),
        ),
        Expr::Func(function, arg) => {
            Expr::Func(*function, Box::new(substitute(arg, symbol, replacement)))
        }
    }
}

/// Number of times `symbol` occurs in the expression tree
pub fn occurrences(expr: &Expr, symbol: &Symbol) -> usize {
    match expr {
        Expr::Num(_) => 0,
        Expr::Sym(s) => usize::from(s == symbol),
        Expr::Add(items) | Expr::Mul(items) => items.iter().map(|i| occurrences(i, symbol)).sum(),
        Expr::Pow(base, _) => occurrences(base, symbol),
        Expr::Func(_, arg) => occurrences(arg, symbol),
    }
}
