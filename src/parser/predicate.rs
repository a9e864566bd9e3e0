// Predicate parser
// Format: <column> <op> <number | "text">

use super::ast::{CompareOp, Literal, Predicate};
use super::lexer::{identifier, number_literal, string_literal, ws};
use crate::error::TableError;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{eof, map, value},
    IResult,
};

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
    // Two-character operators first so `<=` is not read as `<`
    alt((
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
    ))(input)
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((
        map(string_literal, Literal::Text),
        map(number_literal, Literal::Number),
    ))(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    let (input, column) = ws(identifier)(input)?;
    let (input, op) = ws(compare_op)(input)?;
    let (input, value) = ws(literal)(input)?;
    let (input, _) = eof(input)?;

    Ok((input, Predicate { column, op, value }))
}

/// Parse a full predicate expression such as `beat_time < 0.55`
pub fn parse_predicate(input: &str) -> Result<Predicate, TableError> {
    let (_, parsed) =
        predicate(input).map_err(|_| TableError::InvalidPredicate(input.to_string()))?;

    if matches!(parsed.value, Literal::Text(_)) && !parsed.op.accepts_text() {
        return Err(TableError::InvalidPredicate(input.to_string()));
    }

    Ok(parsed)
}
