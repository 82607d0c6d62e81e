use crate::symbol::Symbol;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;
use std::ops;

/// A symbolic expression over real symbols.
///
/// `Add` and `Mul` are n-ary. Roots and division are powers with rational
/// exponents: `sqrt(x)` is `Pow(x, 1/2)` and `x / y` is `x * Pow(y, -1)`.
/// After simplification an expression is in canonical form, so structural
/// equality means algebraic equality for everything the simplifier understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
    Num(BigRational),
    Sym(Symbol),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, BigRational),
    Func(Function, Box<Expr>),
}

/// Unary functions understood by the algebra
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    Abs,
    Exp,
    Log,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Exp => "exp",
            Function::Log => "log",
        }
    }
}

impl Expr {
    pub fn num(value: i64) -> Self {
        Expr::Num(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn rational(numer: i64, denom: i64) -> Self {
        Expr::Num(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn zero() -> Self {
        Expr::Num(BigRational::zero())
    }

    pub fn one() -> Self {
        Expr::Num(BigRational::one())
    }

    pub fn symbol(symbol: &Symbol) -> Self {
        Expr::Sym(symbol.clone())
    }

    pub fn pow(base: Expr, exponent: BigRational) -> Self {
        Expr::Pow(Box::new(base), exponent)
    }

    pub fn powi(base: Expr, exponent: i64) -> Self {
        Expr::pow(base, BigRational::from_integer(BigInt::from(exponent)))
    }

    pub fn sqrt(base: Expr) -> Self {
        Expr::pow(base, half())
    }

    pub fn func(function: Function, arg: Expr) -> Self {
        Expr::Func(function, Box::new(arg))
    }

    pub fn as_number(&self) -> Option<&BigRational> {
        match self {
            Expr::Num(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(v) if v.is_zero())
    }

    /// Number of nodes in the expression tree
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Num(_) | Expr::Sym(_) => 1,
            Expr::Add(items) | Expr::Mul(items) => {
                1 + items.iter().map(Expr::node_count).sum::<usize>()
            }
            Expr::Pow(base, _) => 1 + base.node_count(),
            Expr::Func(_, arg) => 1 + arg.node_count(),
        }
    }
}

pub(crate) fn half() -> BigRational {
    BigRational::new(BigInt::from(1), BigInt::from(2))
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::num(value)
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Expr::symbol(symbol)
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, rhs])
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, -rhs])
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, rhs])
    }
}

impl ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, Expr::powi(rhs, -1)])
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Expr::Num(value) => Expr::Num(-value),
            other => Expr::Mul(vec![Expr::num(-1), other]),
        }
    }
}

/// Relation operators as written by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn name(&self) -> &'static str {
        match self {
            RelOp::Eq => "equal",
            RelOp::Ne => "not equal",
            RelOp::Lt => "less than",
            RelOp::Le => "less than or equal",
            RelOp::Gt => "greater than",
            RelOp::Ge => "greater than or equal",
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, RelOp::Lt | RelOp::Gt)
    }
}

/// `lhs op rhs`, as declared or as derived
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub lhs: Expr,
    pub op: RelOp,
    pub rhs: Expr,
}

impl Relation {
    pub fn new(lhs: Expr, op: RelOp, rhs: Expr) -> Self {
        Self { lhs, op, rhs }
    }

    pub fn equals(lhs: Expr, rhs: Expr) -> Self {
        Self::new(lhs, RelOp::Eq, rhs)
    }

    pub fn not_equal(lhs: Expr, rhs: Expr) -> Self {
        Self::new(lhs, RelOp::Ne, rhs)
    }

    pub fn less_than(lhs: Expr, rhs: Expr) -> Self {
        Self::new(lhs, RelOp::Lt, rhs)
    }

    pub fn less_equal(lhs: Expr, rhs: Expr) -> Self {
        Self::new(lhs, RelOp::Le, rhs)
    }

    pub fn greater_than(lhs: Expr, rhs: Expr) -> Self {
        Self::new(lhs, RelOp::Gt, rhs)
    }

    pub fn greater_equal(lhs: Expr, rhs: Expr) -> Self {
        Self::new(lhs, RelOp::Ge, rhs)
    }
}

// ---------------------------
// Display implementations
// ---------------------------

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            RelOp::Eq => "=",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        };
        write!(f, "{}", symbol)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(value) => write_rational(f, value),
            Expr::Sym(symbol) => write!(f, "{}", symbol),
            Expr::Add(terms) => write_sum(f, terms),
            Expr::Mul(factors) => write_product(f, factors),
            Expr::Pow(_, exponent) if exponent.is_negative() => {
                write_product(f, std::slice::from_ref(self))
            }
            Expr::Pow(base, exponent) => write_power(f, base, exponent),
            Expr::Func(function, arg) => write!(f, "{}({})", function, arg),
        }
    }
}

fn write_rational(f: &mut fmt::Formatter<'_>, value: &BigRational) -> fmt::Result {
    if value.is_integer() {
        write!(f, "{}", value.numer())
    } else {
        write!(f, "{}/{}", value.numer(), value.denom())
    }
}

fn write_sum(f: &mut fmt::Formatter<'_>, terms: &[Expr]) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }
    // Constants go last: `b**2 + 1`, not `1 + b**2`.
    let ordered = terms
        .iter()
        .filter(|t| !matches!(t, Expr::Num(_)))
        .chain(terms.iter().filter(|t| matches!(t, Expr::Num(_))));

    for (i, term) in ordered.enumerate() {
        match (i, split_sign(term)) {
            (0, Some(magnitude)) => write!(f, "-{}", parenthesize_sum(&magnitude))?,
            (0, None) => write!(f, "{}", term)?,
            (_, Some(magnitude)) => write!(f, " - {}", parenthesize_sum(&magnitude))?,
            (_, None) => write!(f, " + {}", parenthesize_sum(term))?,
        }
    }
    Ok(())
}

/// If `term` prints with a leading minus, the term with that minus removed
fn split_sign(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Num(value) if value.is_negative() => Some(Expr::Num(-value)),
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Num(coeff)) if coeff.is_negative() => {
                let coeff = -coeff;
                let mut rest: Vec<Expr> = factors[1..].to_vec();
                if !coeff.is_one() {
                    rest.insert(0, Expr::Num(coeff));
                }
                Some(match rest.len() {
                    0 => Expr::one(),
                    1 => rest.remove(0),
                    _ => Expr::Mul(rest),
                })
            }
            _ => None,
        },
        _ => None,
    }
}

fn parenthesize_sum(expr: &Expr) -> String {
    match expr {
        Expr::Add(_) => format!("({})", expr),
        _ => expr.to_string(),
    }
}

fn write_product(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    let mut coeff = BigRational::one();
    let mut numer: Vec<String> = Vec::new();
    let mut denom: Vec<String> = Vec::new();

    for factor in factors {
        match factor {
            Expr::Num(value) => coeff *= value,
            Expr::Pow(base, exponent) if exponent.is_negative() => {
                denom.push(format_factor(&Expr::Pow(base.clone(), -exponent)));
            }
            other => numer.push(format_factor(other)),
        }
    }

    if coeff.is_negative() {
        write!(f, "-")?;
        coeff = -coeff;
    }
    if !coeff.numer().is_one() || numer.is_empty() {
        numer.insert(0, coeff.numer().to_string());
    }
    if !coeff.denom().is_one() {
        denom.insert(0, coeff.denom().to_string());
    }

    write!(f, "{}", numer.join("*"))?;
    match denom.len() {
        0 => Ok(()),
        1 => write!(f, "/{}", denom[0]),
        _ => write!(f, "/({})", denom.join("*")),
    }
}

fn format_factor(factor: &Expr) -> String {
    match factor {
        Expr::Pow(base, exponent) if exponent.is_one() => format_factor(base),
        Expr::Add(_) => format!("({})", factor),
        Expr::Num(value) if value.is_negative() || !value.is_integer() => format!("({})", factor),
        _ => factor.to_string(),
    }
}

fn write_power(f: &mut fmt::Formatter<'_>, base: &Expr, exponent: &BigRational) -> fmt::Result {
    if *exponent == half() {
        return write!(f, "sqrt({})", base);
    }
    if exponent.is_one() {
        return write!(f, "{}", base);
    }
    let base_text = match base {
        Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..) => format!("({})", base),
        Expr::Num(value) if value.is_negative() || !value.is_integer() => format!("({})", base),
        _ => base.to_string(),
    };
    if exponent.is_integer() {
        write!(f, "{}**{}", base_text, exponent.numer())
    } else {
        write!(f, "{}**({}/{})", base_text, exponent.numer(), exponent.denom())
    }
}
