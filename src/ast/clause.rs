//! Clause model: one structural fragment of a statement per [`Clause`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::conditions::Condition;
use super::query::{Join, Query};
use super::values::Value;
use crate::compiler::Dialect;

/// Statement section a clause belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Select,
    Where,
    Having,
    From,
    Join,
    Order,
    Group,
    Limit,
    Insert,
    Update,
    Combine,
    Cte,
    Aggregate,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Component::Select => "select",
            Component::Where => "where",
            Component::Having => "having",
            Component::From => "from",
            Component::Join => "join",
            Component::Order => "order",
            Component::Group => "group",
            Component::Limit => "limit",
            Component::Insert => "insert",
            Component::Update => "update",
            Component::Combine => "combine",
            Component::Cte => "cte",
            Component::Aggregate => "aggregate",
        };
        write!(f, "{}", name)
    }
}

/// A clause tagged with its component and optional engine scope.
#[derive(Debug, Clone)]
pub struct Clause {
    pub component: Component,
    /// `None` applies to every dialect.
    pub engine: Option<Dialect>,
    pub kind: ClauseKind,
}

impl Clause {
    /// Eligibility filter used during compilation.
    pub fn applies_to(&self, engine: Option<Dialect>) -> bool {
        match (engine, self.engine) {
            (None, _) | (_, None) => true,
            (Some(requested), Some(own)) => requested == own,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ClauseKind {
    Column(ColumnClause),
    Condition(Condition),
    From(FromClause),
    Join(Box<Join>),
    Order(OrderClause),
    LimitOffset(LimitOffset),
    Insert(InsertClause),
    Update(UpdateClause),
    Combine(CombineClause),
    Aggregate(AggregateClause),
}

/// Selected column or group-by entry.
#[derive(Debug, Clone)]
pub enum ColumnClause {
    /// Column name, optionally dotted and/or `as`-aliased.
    Named(String),
    Raw {
        expr: String,
        bindings: Arc<[Value]>,
    },
    /// Sub-query projected as a column; aliased with the sub-query's alias.
    Query(Box<Query>),
}

/// Source of rows for `from`, `join` targets and CTE bodies.
#[derive(Debug, Clone)]
pub enum FromClause {
    /// Table name, optionally `as`-aliased.
    Table(String),
    Query {
        query: Box<Query>,
        alias: Option<String>,
    },
    Raw {
        expr: String,
        bindings: Arc<[Value]>,
        alias: Option<String>,
    },
}

impl FromClause {
    /// Name the source is addressed by (the alias, or the table itself).
    pub fn alias(&self) -> Option<&str> {
        match self {
            FromClause::Table(name) => {
                let (table, alias) = crate::parser::split_alias(name);
                Some(alias.unwrap_or(table))
            }
            FromClause::Query { alias, .. } | FromClause::Raw { alias, .. } => alias.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum OrderClause {
    Column { column: String, ascending: bool },
    Raw { expr: String, bindings: Arc<[Value]> },
    Random { seed: Option<String> },
}

/// Limit and offset for one engine scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum InsertClause {
    Values {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        returning_id: bool,
    },
    Query {
        columns: Vec<String>,
        query: Box<Query>,
    },
}

#[derive(Debug, Clone)]
pub struct UpdateClause {
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineOp {
    Union,
    Except,
    Intersect,
}

impl CombineOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            CombineOp::Union => "UNION",
            CombineOp::Except => "EXCEPT",
            CombineOp::Intersect => "INTERSECT",
        }
    }
}

#[derive(Debug, Clone)]
pub enum CombineClause {
    Query {
        op: CombineOp,
        all: bool,
        query: Box<Query>,
    },
    Raw {
        expr: String,
        bindings: Arc<[Value]>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateKind {
    Count,
    Avg,
    Sum,
    Max,
    Min,
}

impl AggregateKind {
    pub fn function(&self) -> &'static str {
        match self {
            AggregateKind::Count => "COUNT",
            AggregateKind::Avg => "AVG",
            AggregateKind::Sum => "SUM",
            AggregateKind::Max => "MAX",
            AggregateKind::Min => "MIN",
        }
    }

    /// Result column alias.
    pub fn alias(&self) -> &'static str {
        match self {
            AggregateKind::Count => "count",
            AggregateKind::Avg => "avg",
            AggregateKind::Sum => "sum",
            AggregateKind::Max => "max",
            AggregateKind::Min => "min",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregateClause {
    pub kind: AggregateKind,
    pub columns: Vec<String>,
}
