use crate::algebra::simplify::simplify;
use crate::ast::Span;
use crate::error::ConstraintError;
use crate::parser::Rule;
use crate::semantic::{Expr, Function, RelOp, Relation};
use crate::symbol::SymbolRegistry;
use crate::ConstraintResult;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};
use pest::iterators::{Pair, Pairs};

pub(crate) fn parse_relation_pair(
    pair: Pair<Rule>,
    registry: &mut SymbolRegistry,
    source: &str,
) -> ConstraintResult<Relation> {
    let span = Span::from_pest_span(pair.as_span());
    let mut inner = pair.into_inner();
    let lhs = parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
    let op = parse_relation_operator(&next_pair(&mut inner, &span, source)?, source)?;
    let rhs = parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
    Ok(Relation::new(lhs, op, rhs))
}

fn parse_relation_operator(pair: &Pair<Rule>, source: &str) -> ConstraintResult<RelOp> {
    match pair.as_str() {
        "=" | "==" => Ok(RelOp::Eq),
        "!=" => Ok(RelOp::Ne),
        "<" => Ok(RelOp::Lt),
        "<=" => Ok(RelOp::Le),
        ">" => Ok(RelOp::Gt),
        ">=" => Ok(RelOp::Ge),
        other => Err(ConstraintError::parse(
            format!("Unknown relation operator '{}'", other),
            Span::from_pest_span(pair.as_span()),
            source,
        )),
    }
}

pub(crate) fn parse_expression_pair(
    pair: Pair<Rule>,
    registry: &mut SymbolRegistry,
    source: &str,
) -> ConstraintResult<Expr> {
    let span = Span::from_pest_span(pair.as_span());
    match pair.as_rule() {
        // expression = { term ~ (additive_operator ~ term)* }
        Rule::expression => {
            let mut inner = pair.into_inner();
            let mut result =
                parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
            while let Some(op) = inner.next() {
                let rhs =
                    parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
                result = match op.as_str() {
                    "-" => result - rhs,
                    _ => result + rhs,
                };
            }
            Ok(result)
        }

        // term = { unary ~ (multiplicative_operator ~ unary)* }
        Rule::term => {
            let mut inner = pair.into_inner();
            let mut result =
                parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
            while let Some(op) = inner.next() {
                let rhs =
                    parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
                result = match op.as_str() {
                    "/" => result / rhs,
                    _ => result * rhs,
                };
            }
            Ok(result)
        }

        Rule::unary => {
            let mut negations = 0usize;
            let mut operand = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::negation => negations += 1,
                    _ => operand = Some(parse_expression_pair(inner, registry, source)?),
                }
            }
            let operand = operand.ok_or_else(|| {
                ConstraintError::parse("Missing operand after '-'", span.clone(), source)
            })?;
            Ok(if negations % 2 == 1 { -operand } else { operand })
        }

        // power = { primary ~ (power_operator ~ unary)? }
        Rule::power => {
            let mut inner = pair.into_inner();
            let base =
                parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
            match inner.next() {
                Some(exponent_pair) => {
                    let exponent_span = Span::from_pest_span(exponent_pair.as_span());
                    let exponent = parse_expression_pair(exponent_pair, registry, source)?;
                    match (simplify(&base), simplify(&exponent)) {
                        (_, Expr::Num(value)) => Ok(Expr::pow(base, value)),
                        // a**x = exp(x*log(a)) for a constant a > 0
                        (Expr::Num(constant), exponent) if constant.is_positive() => Ok(Expr::func(
                            Function::Exp,
                            exponent * Expr::func(Function::Log, Expr::Num(constant)),
                        )),
                        (_, other) => Err(ConstraintError::parse(
                            format!(
                                "Exponent must be a rational constant unless the base is a positive constant, found '{}'",
                                other
                            ),
                            exponent_span,
                            source,
                        )),
                    }
                }
                None => Ok(base),
            }
        }

        Rule::primary => {
            let mut inner = pair.into_inner();
            parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)
        }

        Rule::call => {
            let mut inner = pair.into_inner();
            let name = next_pair(&mut inner, &span, source)?;
            let arg =
                parse_expression_pair(next_pair(&mut inner, &span, source)?, registry, source)?;
            match name.as_str() {
                "sqrt" => Ok(Expr::sqrt(arg)),
                "abs" => Ok(Expr::func(Function::Abs, arg)),
                "exp" => Ok(Expr::func(Function::Exp, arg)),
                "log" => Ok(Expr::func(Function::Log, arg)),
                other => Err(ConstraintError::parse(
                    format!("Unknown function '{}'", other),
                    span,
                    source,
                )),
            }
        }

        Rule::number => parse_number(pair.as_str())
            .map(Expr::Num)
            .ok_or_else(|| ConstraintError::parse("Invalid number", span, source)),

        Rule::identifier => Ok(Expr::symbol(&registry.resolve(pair.as_str()))),

        other => Err(ConstraintError::parse(
            format!("Unexpected {:?} in expression", other),
            span,
            source,
        )),
    }
}

/// Exact value of a decimal literal: `2.5` is `5/2`
fn parse_number(text: &str) -> Option<BigRational> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    let digits: BigInt = format!("{}{}", whole, fraction).parse().ok()?;
    let mut scale = BigInt::one();
    for _ in 0..fraction.len() {
        scale *= 10;
    }
    Some(BigRational::new(digits, scale))
}

fn next_pair<'a>(
    pairs: &mut Pairs<'a, Rule>,
    span: &Span,
    source: &str,
) -> ConstraintResult<Pair<'a, Rule>> {
    pairs
        .next()
        .ok_or_else(|| ConstraintError::parse("Incomplete expression", span.clone(), source))
}
