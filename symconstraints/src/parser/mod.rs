use crate::ast::Span;
use crate::error::ConstraintError;
use crate::resource_limits::ResourceLimits;
use crate::semantic::{Expr, Relation};
use crate::symbol::SymbolRegistry;
use crate::ConstraintResult;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

pub mod expressions;

#[derive(Parser)]
#[grammar = "src/parser/relation.pest"]
pub struct RelationParser;

/// Parse relation text such as `"area = width * height"`.
///
/// Identifiers resolve against `registry`; unknown names are registered as
/// real symbols.
pub fn parse_relation(
    content: &str,
    registry: &mut SymbolRegistry,
    limits: &ResourceLimits,
) -> ConstraintResult<Relation> {
    check_size(content, limits)?;
    check_depth(content, limits)?;
    let pair = parse_rule(Rule::relation_input, content)?;
    let relation = first_inner(pair, Rule::relation, content)?;
    expressions::parse_relation_pair(relation, registry, content)
}

/// Parse a bare expression such as `"b**2 + 1"`
pub fn parse_expression(
    content: &str,
    registry: &mut SymbolRegistry,
    limits: &ResourceLimits,
) -> ConstraintResult<Expr> {
    check_size(content, limits)?;
    check_depth(content, limits)?;
    let pair = parse_rule(Rule::expression_input, content)?;
    let expression = first_inner(pair, Rule::expression, content)?;
    expressions::parse_expression_pair(expression, registry, content)
}

fn check_size(content: &str, limits: &ResourceLimits) -> ConstraintResult<()> {
    if content.len() > limits.max_relation_bytes {
        return Err(ConstraintError::LimitExceeded {
            limit_name: "max_relation_bytes".to_string(),
            limit_value: format!("{} bytes", limits.max_relation_bytes),
            actual_value: format!("{} bytes", content.len()),
            suggestion: "Split the relation into smaller relations".to_string(),
        });
    }
    Ok(())
}

/// Reject nesting deeper than `max_expression_depth` before pest recurses into it.
///
/// Depth counts open parentheses plus the length of each right-associative
/// power chain (`a**b**c` nests twice).
fn check_depth(content: &str, limits: &ResourceLimits) -> ConstraintResult<()> {
    // Power chain length per open group, outermost first
    let mut chains: Vec<usize> = vec![0];
    let mut chained = 0usize;
    let mut previous: Option<char> = None;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' => chains.push(0),
            ')' => {
                if chains.len() > 1 {
                    chained -= chains.pop().unwrap_or(0);
                }
            }
            '^' => extend_chain(&mut chains, &mut chained),
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                extend_chain(&mut chains, &mut chained);
            }
            '-' if !previous.is_some_and(ends_operand) => {}
            '*' | '/' | '+' | '-' | '=' | '<' | '>' | '!' => {
                if let Some(last) = chains.last_mut() {
                    chained -= *last;
                    *last = 0;
                }
            }
            _ => {}
        }

        let depth = chains.len() - 1 + chained;
        if depth > limits.max_expression_depth {
            return Err(ConstraintError::LimitExceeded {
                limit_name: "max_expression_depth".to_string(),
                limit_value: limits.max_expression_depth.to_string(),
                actual_value: format!("at least {}", depth),
                suggestion: "Simplify nested expressions to reduce depth".to_string(),
            });
        }
        if !c.is_whitespace() {
            previous = Some(c);
        }
    }
    Ok(())
}

fn extend_chain(chains: &mut [usize], chained: &mut usize) {
    if let Some(last) = chains.last_mut() {
        *last += 1;
        *chained += 1;
    }
}

/// Whether a `-` after this character is binary rather than a negation
fn ends_operand(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ')' || c == '.'
}

fn parse_rule(rule: Rule, content: &str) -> ConstraintResult<Pair<'_, Rule>> {
    match RelationParser::parse(rule, content) {
        Ok(mut pairs) => pairs.next().ok_or_else(|| {
            ConstraintError::parse("Empty input", Span::from_line_col(1, 1), content)
        }),
        Err(e) => {
            let span = match e.line_col {
                pest::error::LineColLocation::Pos((line, col)) => Span::from_line_col(line, col),
                pest::error::LineColLocation::Span((start_line, start_col), (_, _)) => {
                    Span::from_line_col(start_line, start_col)
                }
            };
            Err(ConstraintError::parse(e.variant.message(), span, content))
        }
    }
}

fn first_inner<'a>(pair: Pair<'a, Rule>, rule: Rule, content: &str) -> ConstraintResult<Pair<'a, Rule>> {
    let span = Span::from_pest_span(pair.as_span());
    pair.into_inner()
        .find(|inner| inner.as_rule() == rule)
        .ok_or_else(|| ConstraintError::parse(format!("Expected {:?}", rule), span, content))
}
