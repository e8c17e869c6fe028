use nom::{
    IResult,
    Parser,
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, multispace1, satisfy},
    combinator::{opt, recognize},
    multi::{many0, many1, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated},
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::engine::ast::Expr;
use crate::engine::special_forms::QUOTE;

/// Raised when source text cannot be read as a sequence of expressions.
/// Carries a short snippet of the offending input.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Syntax error near '{0}'")]
    Syntax(String),
}

// A single run of insignificant text: whitespace, or a line comment
// running from ';' to the end of the line.
fn blank(input: &str) -> IResult<&str, &str> {
    alt((multispace1, recognize(pair(char(';'), opt(is_not("\n")))))).parse(input)
}

// Zero or more blank runs.
fn ws0(input: &str) -> IResult<&str, &str> {
    recognize(many0(blank)).parse(input)
}

// One or more blank runs. Used as the separator between list elements,
// so a comment alone is enough to split two tokens.
fn ws1(input: &str) -> IResult<&str, &str> {
    recognize(many1(blank)).parse(input)
}

// Parses a number (f64) into an Expr::Number - raw token, no surrounding
// whitespace handling.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_number_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse raw number token");
    double.map(Expr::Number).parse(input)
}

// Parses a double-quoted string literal - raw token. There is no escape
// syntax; every character up to the next '"' is taken verbatim.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_string_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse raw string token");
    delimited(char('"'), opt(is_not("\"")), char('"'))
        .map(|contents: Option<&str>| Expr::String(contents.unwrap_or("").to_string()))
        .parse(input)
}

// Parses a symbol - raw token. The keywords "true" and "false" are
// classified here, after the full token is read, so that symbols which
// merely start with them (e.g. "true-ish") stay symbols.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_symbol_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse symbol");

    // Characters allowed to start a symbol.
    let initial_char = satisfy(|c: char| c.is_alphabetic() || "!$%&*/:<=>?@^_~+-".contains(c));

    // Characters allowed in subsequent parts of a symbol.
    let subsequent_char =
        satisfy(|c: char| c.is_alphanumeric() || "!$%&*/:<=>?@^_~+-.#".contains(c));

    let symbol_str_parser = recognize(pair(initial_char, many0(subsequent_char)));

    symbol_str_parser
        .map(|s: &str| match s {
            "true" => Expr::Bool(true),
            "false" => Expr::Bool(false),
            _ => Expr::Symbol(s.to_string()),
        })
        .parse(input)
}

// Parses the quote shorthand: 'expr reads as (quote expr).
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn parse_quoted_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse quote shorthand");
    preceded(char('\''), preceded(ws0, expr_recursive_impl))
        .map(|expr| Expr::List(vec![Expr::Symbol(QUOTE.to_string()), expr]))
        .parse(input)
}

// Parses a list of expressions e.g. (a b c) or (+ 1 2) - raw token
// (parens are part of the token). Recursive with expr_recursive_impl.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn list_raw(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse raw list token");
    delimited(
        tag("("),
        terminated(
            separated_list0(
                ws1,
                // Element parser: consumes leading blanks, then one core expression.
                preceded(ws0, expr_recursive_impl),
            ),
            // Consume trailing blanks before the closing parenthesis.
            ws0,
        ),
        tag(")"),
    )
    .map(Expr::List)
    .parse(input)
}

// Core recursive parser for any single expression type, without
// surrounding whitespace.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn expr_recursive_impl(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse core expression token (recursive_impl)");
    alt((
        parse_number_raw,
        parse_string_raw,
        parse_quoted_raw,
        list_raw,
        parse_symbol_raw,
    ))
    .parse(input)
}

/// Parses a single expression, consuming surrounding whitespace and
/// comments.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
pub fn parse_expr(input: &str) -> IResult<&str, Expr> {
    trace!("Attempting to parse expression (with surrounding whitespace handling)");
    delimited(ws0, expr_recursive_impl, ws0).parse(input)
}

/// Parses an entire source text into its sequence of top-level
/// expressions. A source containing only whitespace and comments yields
/// an empty sequence.
#[tracing::instrument(level = "debug", skip(source))]
pub fn parse_program(source: &str) -> Result<Vec<Expr>, ParseError> {
    let mut expressions = Vec::new();
    let mut remaining = source;

    while !only_blank(remaining) {
        match parse_expr(remaining) {
            Ok((rest, expr)) => {
                trace!(?expr, "Parsed top-level expression");
                expressions.push(expr);
                remaining = rest;
            }
            Err(_) => {
                let snippet: String = remaining.trim_start().chars().take(24).collect();
                return Err(ParseError::Syntax(snippet));
            }
        }
    }

    debug!(count = expressions.len(), "Parsed program");
    Ok(expressions)
}

// True when the rest of the source holds no further tokens.
fn only_blank(input: &str) -> bool {
    matches!(ws0(input), Ok((rest, _)) if rest.is_empty())
}
