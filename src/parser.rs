//! Column and table expression parsing using nom.
//!
//! # Syntax Overview
//!
//! ```text
//! users.{id, name as n}
//! ──┬── ───────┬───────
//!   │          └── Expansion list (each entry may carry an alias)
//!   └── Prefix (prepended to every entry)
//! ```
//!
//! Anything without a `{...}` list is a single column expression.

use nom::{
    IResult,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, multispace0},
    combinator::all_consuming,
    multi::separated_list1,
    sequence::{delimited, tuple},
};

use crate::error::{ShardqlError, ShardqlResult};

/// Expand a column expression into the individual columns it names.
///
/// `"users.{id, name as n}"` becomes `["users.id", "users.name as n"]`;
/// any expression without braces is returned as-is (trimmed).
pub fn expand_columns(input: &str) -> ShardqlResult<Vec<String>> {
    let input = input.trim();
    if !input.contains('{') {
        if input.contains('}') {
            return Err(ShardqlError::parse(
                input.find('}').unwrap_or(0),
                "Unbalanced '}' in column expression",
            ));
        }
        return Ok(vec![input.to_string()]);
    }

    match all_consuming(parse_expansion)(input) {
        Ok((_, (prefix, items))) => Ok(items
            .into_iter()
            .map(|item| format!("{}{}", prefix, item.trim()))
            .collect()),
        Err(e) => Err(ShardqlError::parse(
            error_position(input, &e),
            format!("Invalid column expansion '{}'", input),
        )),
    }
}

/// Split `"expr as alias"` (case-insensitive `as`) into its parts.
pub fn split_alias(input: &str) -> (&str, Option<&str>) {
    // ASCII lowering keeps byte offsets aligned with the input.
    let lower = input.to_ascii_lowercase();
    match lower.rfind(" as ") {
        Some(idx) => {
            let alias = input[idx + 4..].trim();
            if alias.is_empty() {
                (input.trim(), None)
            } else {
                (input[..idx].trim(), Some(alias))
            }
        }
        None => (input.trim(), None),
    }
}

/// Parse `prefix{a, b, c}`.
fn parse_expansion(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    let (input, (prefix, items, _)) = tuple((
        take_until("{"),
        delimited(
            char('{'),
            separated_list1(char(','), parse_item),
            char('}'),
        ),
        multispace0,
    ))(input)?;
    Ok((input, (prefix, items)))
}

/// Parse one entry of an expansion list.
fn parse_item(input: &str) -> IResult<&str, &str> {
    delimited(
        multispace0,
        take_while1(|c: char| c != ',' && c != '}' && c != '{'),
        multispace0,
    )(input)
}

fn error_position(input: &str, err: &nom::Err<nom::error::Error<&str>>) -> usize {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => input.len() - e.input.len(),
        nom::Err::Incomplete(_) => input.len(),
    }
}
