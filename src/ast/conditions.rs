//! Condition clauses used by `where`, `having` and join `on` trees.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::query::Query;
use super::values::Value;

/// One predicate plus the combinator flags latched when it was appended.
#[derive(Debug, Clone)]
pub struct Condition {
    /// Joined to the previous predicate with `OR` instead of `AND`.
    pub is_or: bool,
    pub is_not: bool,
    pub kind: ConditionKind,
}

#[derive(Debug, Clone)]
pub enum ConditionKind {
    /// `column op value`
    Basic {
        column: String,
        op: String,
        value: Value,
    },
    /// LIKE-family string match.
    Str {
        column: String,
        op: StringOp,
        value: String,
        case_sensitive: bool,
    },
    /// Comparison on a date/time part of a column.
    DatePart {
        part: DatePart,
        column: String,
        op: String,
        value: Value,
    },
    /// `first op second`, both columns.
    Columns {
        first: String,
        op: String,
        second: String,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    InQuery {
        column: String,
        query: Box<Query>,
    },
    /// `column op (sub-query)`
    Sub {
        column: String,
        op: String,
        query: Box<Query>,
    },
    Between {
        column: String,
        lower: Value,
        higher: Value,
    },
    Null {
        column: String,
    },
    Boolean {
        column: String,
        value: bool,
    },
    /// Parenthesized group compiled from the inner query's conditions.
    Nested(Box<Query>),
    Exists(Box<Query>),
    Raw {
        expr: String,
        bindings: Arc<[Value]>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringOp {
    Like,
    Starts,
    Ends,
    Contains,
}

impl StringOp {
    /// Pattern actually bound for the LIKE comparison.
    pub fn pattern(&self, value: &str) -> String {
        match self {
            StringOp::Like => value.to_string(),
            StringOp::Starts => format!("{}%", value),
            StringOp::Ends => format!("%{}", value),
            StringOp::Contains => format!("%{}%", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePart {
    Date,
    Time,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePart {
    pub fn name(&self) -> &'static str {
        match self {
            DatePart::Date => "date",
            DatePart::Time => "time",
            DatePart::Year => "year",
            DatePart::Month => "month",
            DatePart::Day => "day",
            DatePart::Hour => "hour",
            DatePart::Minute => "minute",
            DatePart::Second => "second",
        }
    }

    pub fn upper(&self) -> String {
        self.name().to_uppercase()
    }
}

/// Comparison operators accepted by every dialect.
pub const OPERATORS: &[&str] = &[
    "=", "<", ">", "<=", ">=", "<>", "!=", "<=>", "like", "not like", "like binary", "ilike",
    "not ilike", "&", "|", "^", "<<", ">>", "rlike", "not rlike", "regexp", "not regexp", "~",
    "~*", "!~", "!~*", "similar to", "not similar to", "~~*", "!~~*",
];

/// Whether `op` (case-insensitive) is a known comparison operator.
pub fn is_known_operator(op: &str) -> bool {
    let op = op.trim().to_lowercase();
    OPERATORS.contains(&op.as_str())
}
