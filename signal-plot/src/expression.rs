//! Time expression evaluation
//!
//! A time expression is a literal (`15ms`), a constant reference (`t1`) or a
//! combination of both joined by `+`/`-` (`t1+5ms`). Results are milliseconds.
//!
//! Two evaluators exist:
//!
//! - **Legacy** reproduces how existing documents were always resolved: the
//!   constant is located by substring search (the last matching name wins and
//!   only one constant is substituted) and fragments joined by `-` are summed,
//!   not subtracted. `t1-5ms` with `t1 = 10` therefore resolves to `15`.
//! - **Strict** lexes the expression into literals, constant references and
//!   operators, parses them with a small `chumsky` grammar and folds the terms
//!   left to right with real subtraction.

use crate::config::ExpressionMode;
use crate::constants::{parse_number, strip_unit, ConstantTable, TIME_UNIT};
use crate::types::{PlotError, Result};
use chumsky::prelude::*;
use std::fmt;

/// Evaluate a time expression in the given mode
pub fn evaluate(expr: &str, constants: &ConstantTable, mode: ExpressionMode) -> Result<f64> {
    let value = match mode {
        ExpressionMode::Legacy => evaluate_legacy(expr, constants),
        ExpressionMode::Strict => evaluate_strict(expr, constants),
    }?;

    log::trace!("Evaluated '{}' ({:?}) to {} ms", expr, mode, value);
    Ok(value)
}

/// Substring-substitution evaluator kept for compatibility with existing documents
pub fn evaluate_legacy(expr: &str, constants: &ConstantTable) -> Result<f64> {
    let stripped = strip_unit(expr);

    if constants.is_empty() {
        return parse_number(expr, &stripped);
    }

    // Each match rebuilds the working string from the original expression,
    // so only the last matching constant survives.
    let mut working = None;
    for (name, value) in constants.iter() {
        if expr.contains(name) {
            working = Some(stripped.replace(name, &value.to_string()));
        }
    }

    let Some(working) = working else {
        return parse_number(expr, &stripped);
    };

    let has_plus = working.contains('+');
    let has_minus = working.contains('-');

    if !has_plus && !has_minus {
        return parse_number(expr, &working);
    }

    let mut total = 0.0;
    if has_plus {
        total += sum_fragments(expr, &working, '+')?;
    }
    if has_minus {
        total += sum_fragments(expr, &working, '-')?;
    }

    Ok(total)
}

fn sum_fragments(expr: &str, working: &str, separator: char) -> Result<f64> {
    working
        .split(separator)
        .map(|fragment| parse_number(expr, fragment))
        .sum()
}

/// Binary operator of a strict time expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
}

impl Operator {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
        }
    }
}

/// Lexical token of a strict time expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal in milliseconds (unit marker already consumed)
    Literal(f64),
    /// Reference to a named constant
    ConstantRef(String),
    Operator(Operator),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Literal(value) => write!(f, "{}", value),
            Token::ConstantRef(name) => write!(f, "{}", name),
            Token::Operator(Operator::Add) => write!(f, "+"),
            Token::Operator(Operator::Sub) => write!(f, "-"),
        }
    }
}

pub type Span = SimpleSpan<usize>;
type LexError<'src> = extra::Err<Rich<'src, char, Span>>;
type TermError<'tok> = extra::Err<Rich<'tok, Token, Span>>;

/// Operand of a strict expression before constant lookup
#[derive(Debug, Clone, PartialEq)]
enum Term {
    Literal(f64),
    Constant(String),
}

/// Lexer for strict time expressions: numbers with an optional `ms` marker,
/// identifiers, `+` and `-`. Whitespace between tokens is ignored.
pub fn lexer<'src>() -> impl Parser<'src, &'src str, Vec<(Token, Span)>, LexError<'src>> {
    let digits = text::digits(10).to_slice();

    let number = choice((
        digits.then(just('.').then(digits.or_not()).or_not()).to_slice(),
        just('.').then(digits).to_slice(),
    ))
    .try_map_with(|s: &str, e| match s.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Rich::custom(e.span(), format!("'{}' is not a finite number", s))),
    })
    .labelled("number");

    // `5ms` carries a unit marker, `5msx` is a number followed by an identifier
    let unit = just(TIME_UNIT).then(any().filter(|c: &char| is_identifier_char(*c)).not());
    let literal = number.then_ignore(unit.or_not()).map(Token::Literal);

    let constant = text::ident()
        .map(|name: &str| Token::ConstantRef(name.to_string()))
        .labelled("constant");

    let op = choice((
        just('+').to(Token::Operator(Operator::Add)),
        just('-').to(Token::Operator(Operator::Sub)),
    ))
    .labelled("operator");

    choice((op, literal, constant))
        .map_with(|tok, e| (tok, e.span()))
        .padded()
        .repeated()
        .collect()
}

/// Token grammar: `[sign] value (operator value)*`, each value paired with the
/// operator that applies it to the running total
fn terms<'tok>() -> impl Parser<'tok, &'tok [Token], Vec<(Operator, Term)>, TermError<'tok>> {
    let operator = select! { Token::Operator(op) => op }.labelled("operator");
    let value = select! {
        Token::Literal(value) => Term::Literal(value),
        Token::ConstantRef(name) => Term::Constant(name),
    }
    .labelled("value");

    operator
        .clone()
        .or_not()
        .map(|sign| sign.unwrap_or(Operator::Add))
        .then(value.clone())
        .then(operator.then(value).repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|(first, rest)| std::iter::once(first).chain(rest).collect())
}

fn parse_failure<E: fmt::Display>(expr: &str, errors: Vec<E>) -> PlotError {
    let reason = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    PlotError::parse(expr, reason)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split a time expression into tokens
pub fn tokenize(expr: &str) -> Result<Vec<Token>> {
    lexer()
        .parse(expr)
        .into_result()
        .map(|tokens| tokens.into_iter().map(|(tok, _)| tok).collect())
        .map_err(|errors| parse_failure(expr, errors))
}

/// Tokenizing evaluator: `+` adds, `-` subtracts, any number of constants
pub fn evaluate_strict(expr: &str, constants: &ConstantTable) -> Result<f64> {
    let tokens = tokenize(expr)?;
    let parsed = terms()
        .parse(tokens.as_slice())
        .into_result()
        .map_err(|errors| parse_failure(expr, errors))?;

    parsed.into_iter().try_fold(0.0, |total, (op, term)| {
        let value = match term {
            Term::Literal(value) => value,
            Term::Constant(name) => lookup_constant(expr, &name, constants)?,
        };
        Ok(op.apply(total, value))
    })
}

fn lookup_constant(expr: &str, name: &str, constants: &ConstantTable) -> Result<f64> {
    constants
        .get(name)
        // `t1ms` reads as constant `t1` with a unit marker
        .or_else(|| name.strip_suffix(TIME_UNIT).and_then(|n| constants.get(n)))
        .ok_or_else(|| PlotError::parse(expr, format!("unknown constant '{}'", name)))
}
