//! Projection, source, ordering and grouping builders.

use std::sync::Arc;

use super::Query;
use crate::ast::clause::{ClauseKind, ColumnClause, Component, FromClause, OrderClause};
use crate::ast::values::Value;

impl Query {
    /// Replace the projection with `columns`.
    ///
    /// Entries may be dotted, aliased (`"name as n"`) or expansion lists
    /// (`"users.{id, name}"`).
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.method = super::Method::Select;
        self.clear_component(Component::Select);
        for column in columns {
            self.add_component(
                Component::Select,
                ClauseKind::Column(ColumnClause::Named(column.into())),
            );
        }
        self
    }

    /// Append a raw projection expression.
    pub fn select_raw(mut self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.method = super::Method::Select;
        self.add_component(
            Component::Select,
            ClauseKind::Column(ColumnClause::Raw {
                expr: expr.into(),
                bindings: Arc::from(bindings),
            }),
        );
        self
    }

    /// Append a sub-query column, aliased as `alias`.
    pub fn select_query(mut self, query: Query, alias: impl Into<String>) -> Self {
        self.method = super::Method::Select;
        let query = query.alias(alias);
        let query = self.adopt(query);
        self.add_component(Component::Select, ClauseKind::Column(ColumnClause::Query(query)));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Name this query when it is used as a sub-query, CTE or derived table.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    // ===== From =====

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.clear_component(Component::From);
        self.add_component(Component::From, ClauseKind::From(FromClause::Table(table.into())));
        self
    }

    /// Select from a derived table; the query's alias names it.
    pub fn from_query(mut self, query: Query) -> Self {
        self.clear_component(Component::From);
        let alias = query.alias.clone();
        let query = self.adopt(query);
        self.add_component(Component::From, ClauseKind::From(FromClause::Query { query, alias }));
        self
    }

    pub fn from_raw(mut self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.clear_component(Component::From);
        self.add_component(
            Component::From,
            ClauseKind::From(FromClause::Raw {
                expr: expr.into(),
                bindings: Arc::from(bindings),
                alias: None,
            }),
        );
        self
    }

    // ===== Ordering =====

    pub fn order_by<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_order(columns, true)
    }

    pub fn order_by_desc<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_order(columns, false)
    }

    fn push_order<I, S>(mut self, columns: I, ascending: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            self.add_component(
                Component::Order,
                ClauseKind::Order(OrderClause::Column {
                    column: column.into(),
                    ascending,
                }),
            );
        }
        self
    }

    pub fn order_by_raw(mut self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.add_component(
            Component::Order,
            ClauseKind::Order(OrderClause::Raw {
                expr: expr.into(),
                bindings: Arc::from(bindings),
            }),
        );
        self
    }

    /// Order by the dialect's random function.
    pub fn order_by_random(mut self, seed: Option<String>) -> Self {
        self.add_component(Component::Order, ClauseKind::Order(OrderClause::Random { seed }));
        self
    }

    // ===== Grouping =====

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            self.add_component(
                Component::Group,
                ClauseKind::Column(ColumnClause::Named(column.into())),
            );
        }
        self
    }

    pub fn group_by_raw(mut self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.add_component(
            Component::Group,
            ClauseKind::Column(ColumnClause::Raw {
                expr: expr.into(),
                bindings: Arc::from(bindings),
            }),
        );
        self
    }
}
