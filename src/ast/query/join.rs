//! Join clauses.
//!
//! A [`Join`] wraps a child query whose from-clause is the join target and
//! whose `where` conditions form the `ON` tree.

use serde::{Deserialize, Serialize};

use super::Query;
use crate::ast::clause::{ClauseKind, Component};
use crate::ast::values::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub query: Query,
}

impl Join {
    pub fn new(kind: JoinKind, query: Query) -> Self {
        Self { kind, query }
    }

    /// `ON first op second`
    pub fn on(mut self, first: impl Into<String>, op: impl Into<String>, second: impl Into<String>) -> Self {
        self.query = self.query.where_columns(first, op, second);
        self
    }

    pub fn or_on(mut self, first: impl Into<String>, op: impl Into<String>, second: impl Into<String>) -> Self {
        self.query = self.query.or_where_columns(first, op, second);
        self
    }

    /// Compare a column of the joined table with a bound value.
    pub fn where_(mut self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query = self.query.where_(column, op, value);
        self
    }

    pub fn or_where(mut self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query = self.query.or_where(column, op, value);
        self
    }

    pub fn where_null(mut self, column: impl Into<String>) -> Self {
        self.query = self.query.where_null(column);
        self
    }

    pub fn where_in<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.query = self.query.where_in(column, values);
        self
    }
}

impl Query {
    /// `INNER JOIN table ON first op second`
    pub fn join(
        self,
        table: impl Into<String>,
        first: impl Into<String>,
        op: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        let (first, op, second) = (first.into(), op.into(), second.into());
        self.join_with(table, JoinKind::Inner, move |j| j.on(first, op, second))
    }

    pub fn left_join(
        self,
        table: impl Into<String>,
        first: impl Into<String>,
        op: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        let (first, op, second) = (first.into(), op.into(), second.into());
        self.join_with(table, JoinKind::Left, move |j| j.on(first, op, second))
    }

    pub fn right_join(
        self,
        table: impl Into<String>,
        first: impl Into<String>,
        op: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        let (first, op, second) = (first.into(), op.into(), second.into());
        self.join_with(table, JoinKind::Right, move |j| j.on(first, op, second))
    }

    pub fn cross_join(self, table: impl Into<String>) -> Self {
        self.join_with(table, JoinKind::Cross, |j| j)
    }

    /// Join `table`, building the `ON` tree in `f`.
    pub fn join_with(self, table: impl Into<String>, kind: JoinKind, f: impl FnOnce(Join) -> Join) -> Self {
        let target = self.new_child().from(table);
        self.push_join(f(Join::new(kind, target)))
    }

    /// Join a derived table; the sub-query's alias names it.
    pub fn join_query(self, query: Query, kind: JoinKind, f: impl FnOnce(Join) -> Join) -> Self {
        let target = self.new_child().from_query(query);
        self.push_join(f(Join::new(kind, target)))
    }

    fn push_join(mut self, mut join: Join) -> Self {
        join.query = *self.adopt(join.query);
        self.add_component(Component::Join, ClauseKind::Join(Box::new(join)));
        self
    }
}
