//! Recursive-descent parser for the expression grammar, built on nom
//!
//! Every parser takes the current nesting depth. Parentheses, call
//! arguments, signs and exponents each add a level, so hostile input fails
//! with a parse error long before it can exhaust the stack.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::recognize,
    error::ErrorKind,
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair},
    IResult, Parser,
};

use super::ast::{BinaryOp, Expression, UnaryOp};
use super::{ExprResult, ExpressionError};

/// Deepest nesting of parentheses, signs and exponents accepted
const MAX_NESTING: usize = 32;

/// Longest expression source accepted, in bytes
const MAX_LENGTH: usize = 1024;

type ParseError<'a> = nom::error::Error<&'a str>;

/// Parse a complete expression string into a syntax tree
pub fn parse_expression(input: &str) -> ExprResult<Expression> {
    if input.trim().is_empty() {
        return Err(ExpressionError::EmptyExpression);
    }
    if input.len() > MAX_LENGTH {
        return Err(ExpressionError::ParseError {
            message: format!("Expression longer than {} bytes", MAX_LENGTH),
        });
    }
    check_parentheses(input)?;

    match expr(input, 0) {
        Ok((remainder, expression)) => {
            // Make sure the entire input was consumed
            if remainder.trim().is_empty() {
                Ok(expression)
            } else {
                Err(ExpressionError::ParseError {
                    message: format!("Unexpected trailing characters: '{}'", remainder.trim()),
                })
            }
        }
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => {
            Err(ExpressionError::ParseError {
                message: format!("Expression nested deeper than {} levels", MAX_NESTING),
            })
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExpressionError::ParseError {
            message: format!("Unexpected input at '{}' ({:?})", e.input, e.code),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ExpressionError::ParseError {
            message: "Incomplete expression".to_string(),
        }),
    }
}

/// Reject unbalanced or excessively nested parentheses before parsing
fn check_parentheses(input: &str) -> ExprResult<()> {
    let mut open = Vec::new();
    for (position, c) in input.char_indices() {
        match c {
            '(' => {
                open.push(position);
                if open.len() > MAX_NESTING {
                    return Err(ExpressionError::ParseError {
                        message: format!("Parentheses nested deeper than {}", MAX_NESTING),
                    });
                }
            }
            ')' => {
                if open.pop().is_none() {
                    return Err(ExpressionError::UnbalancedParentheses { position });
                }
            }
            _ => {}
        }
    }
    match open.first() {
        Some(&position) => Err(ExpressionError::UnbalancedParentheses { position }),
        None => Ok(()),
    }
}

/// Enter one more nesting level, failing hard past [`MAX_NESTING`]
fn descend(input: &str, depth: usize) -> Result<usize, nom::Err<ParseError<'_>>> {
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(ParseError::new(input, ErrorKind::TooLarge)));
    }
    Ok(depth + 1)
}

/// Wrap a parser so it skips surrounding whitespace
fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = ParseError<'a>>
where
    F: Parser<&'a str, Output = O, Error = ParseError<'a>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse an identifier (variable, parameter, constant or function name)
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Parse an unsigned numeric literal: `12`, `1.5`, `.5`, `2.`, `1e-3`
///
/// Only called when the input starts with a digit or `.`, so `double`
/// never sees a sign or the words `inf` and `nan`.
fn number(input: &str) -> IResult<&str, Expression> {
    let (input, value) = double::<&str, ParseError>(input)?;
    Ok((input, Expression::Number(value)))
}

/// Parse comma-separated call arguments
fn arguments(input: &str, depth: usize) -> IResult<&str, Vec<Expression>> {
    let (mut input, first) = expr(input, depth)?;
    let mut args = vec![first];

    loop {
        match ws(char(',')).parse(input) {
            Ok((rest, _)) => {
                let (rest, arg) = expr(rest, depth)?;
                args.push(arg);
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, args)),
            Err(e) => return Err(e),
        }
    }
}

/// Parse a function call with one or more arguments, or a variable reference
fn call_or_variable(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, name) = identifier(input)?;

    match ws(char('(')).parse(input) {
        Ok((rest, _)) => {
            let inner = descend(rest, depth)?;
            let (rest, args) = arguments(rest, inner)?;
            let (rest, _) = ws(char(')')).parse(rest)?;
            Ok((rest, Expression::Function(name.to_string(), args)))
        }
        Err(nom::Err::Error(_)) => Ok((input, Expression::Variable(name.to_string()))),
        Err(e) => Err(e),
    }
}

/// Parse a parenthesized expression
fn parens(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, _) = char('(').parse(input)?;
    let inner = descend(input, depth)?;
    let (input, expression) = expr(input, inner)?;
    let (input, _) = ws(char(')')).parse(input)?;
    Ok((input, expression))
}

/// Parse a primary expression (number, function call, variable, or parenthesized expression)
fn primary(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, _) = multispace0::<&str, ParseError>(input)?;
    let (input, expression) = match input.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '.' => number(input)?,
        Some('(') => parens(input, depth)?,
        _ => call_or_variable(input, depth)?,
    };
    let (input, _) = multispace0::<&str, ParseError>(input)?;
    Ok((input, expression))
}

/// Parse a power expression; the exponent may carry its own sign (`2^-x`)
fn power(input: &str, depth: usize) -> IResult<&str, Expression> {
    let (input, base) = primary(input, depth)?;

    match ws(char('^')).parse(input) {
        Ok((rest, _)) => {
            let inner = descend(rest, depth)?;
            let (rest, exponent) = unary(rest, inner)?;
            Ok((
                rest,
                Expression::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)),
            ))
        }
        Err(nom::Err::Error(_)) => Ok((input, base)),
        Err(e) => Err(e),
    }
}

/// Parse a signed expression (-expr, +expr)
fn unary(input: &str, depth: usize) -> IResult<&str, Expression> {
    match ws(one_of("+-")).parse(input) {
        Ok((rest, sign)) => {
            let inner = descend(rest, depth)?;
            let (rest, operand) = unary(rest, inner)?;
            let expression = if sign == '-' {
                Expression::Unary(UnaryOp::Neg, Box::new(operand))
            } else {
                operand
            };
            Ok((rest, expression))
        }
        Err(nom::Err::Error(_)) => power(input, depth),
        Err(e) => Err(e),
    }
}

/// Fold a left-associative chain of `operand (op operand)*`
///
/// An operator without a valid right operand ends the chain before the
/// operator; the caller reports the leftover input.
fn binary_chain<'a>(
    input: &'a str,
    depth: usize,
    operators: &'static str,
    operand: fn(&'a str, usize) -> IResult<&'a str, Expression>,
) -> IResult<&'a str, Expression> {
    let (mut input, mut lhs) = operand(input, depth)?;

    loop {
        let (rest, symbol) = match ws(one_of(operators)).parse(input) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => return Ok((input, lhs)),
            Err(e) => return Err(e),
        };
        let (rest, rhs) = match operand(rest, depth) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => return Ok((input, lhs)),
            Err(e) => return Err(e),
        };
        if let Some(op) = BinaryOp::from_symbol(symbol) {
            lhs = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        input = rest;
    }
}

/// Parse a multiplicative expression (expr * expr, expr / expr)
fn term(input: &str, depth: usize) -> IResult<&str, Expression> {
    binary_chain(input, depth, "*/", unary)
}

/// Parse an additive expression (expr + expr, expr - expr)
fn expr(input: &str, depth: usize) -> IResult<&str, Expression> {
    binary_chain(input, depth, "+-", term)
}
