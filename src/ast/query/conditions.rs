//! `where` builders.
//!
//! Every condition latches the pending `or`/`not` flags at the moment it is
//! appended; `or_*` and `*_not_*` shorthands just set those flags first.

use std::sync::Arc;

use super::Query;
use crate::ast::clause::{ClauseKind, Component};
use crate::ast::conditions::{Condition, ConditionKind, DatePart, StringOp};
use crate::ast::values::Value;
use crate::error::{ShardqlError, ShardqlResult};

impl Query {
    /// Append a condition to `component`, consuming the pending flags.
    pub(crate) fn push_condition(mut self, component: Component, kind: ConditionKind) -> Self {
        let is_or = self.get_or();
        let is_not = self.get_not();
        self.add_component(
            component,
            ClauseKind::Condition(Condition { is_or, is_not, kind }),
        );
        self
    }

    /// `column op value`. A `NULL` value becomes `IS NULL` for `=` and
    /// `IS NOT NULL` for any other operator; the operator replaces a pending
    /// `not()`.
    pub fn where_(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(Component::Where, column.into(), op.into(), value.into())
    }

    pub(crate) fn condition(mut self, component: Component, column: String, op: String, value: Value) -> Self {
        if value.is_null() {
            let negate = op.trim() != "=";
            self.get_not();
            return self
                .set_not(negate)
                .push_condition(component, ConditionKind::Null { column });
        }
        self.push_condition(component, ConditionKind::Basic { column, op, value })
    }

    pub fn or_where(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.or().where_(column, op, value)
    }

    pub fn where_not(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.not().where_(column, op, value)
    }

    pub fn or_where_not(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.or().not().where_(column, op, value)
    }

    /// Compare two columns.
    pub fn where_columns(self, first: impl Into<String>, op: impl Into<String>, second: impl Into<String>) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Columns {
                first: first.into(),
                op: op.into(),
                second: second.into(),
            },
        )
    }

    pub fn or_where_columns(self, first: impl Into<String>, op: impl Into<String>, second: impl Into<String>) -> Self {
        self.or().where_columns(first, op, second)
    }

    // ===== Null / boolean =====

    pub fn where_null(self, column: impl Into<String>) -> Self {
        self.push_condition(Component::Where, ConditionKind::Null { column: column.into() })
    }

    pub fn or_where_null(self, column: impl Into<String>) -> Self {
        self.or().where_null(column)
    }

    pub fn where_not_null(self, column: impl Into<String>) -> Self {
        self.not().where_null(column)
    }

    pub fn or_where_not_null(self, column: impl Into<String>) -> Self {
        self.or().not().where_null(column)
    }

    pub fn where_true(self, column: impl Into<String>) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Boolean {
                column: column.into(),
                value: true,
            },
        )
    }

    pub fn where_false(self, column: impl Into<String>) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Boolean {
                column: column.into(),
                value: false,
            },
        )
    }

    // ===== String matching =====

    /// LIKE-family match; case-insensitive matching lowers both sides.
    pub fn where_str(
        self,
        column: impl Into<String>,
        op: StringOp,
        value: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Str {
                column: column.into(),
                op,
                value: value.into(),
                case_sensitive,
            },
        )
    }

    pub fn where_like(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_str(column, StringOp::Like, value, false)
    }

    pub fn where_not_like(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.not().where_like(column, value)
    }

    pub fn or_where_like(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.or().where_like(column, value)
    }

    pub fn where_starts(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_str(column, StringOp::Starts, value, false)
    }

    pub fn where_ends(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_str(column, StringOp::Ends, value, false)
    }

    pub fn where_contains(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.where_str(column, StringOp::Contains, value, false)
    }

    pub fn where_not_contains(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.not().where_contains(column, value)
    }

    // ===== Date parts =====

    pub fn where_date_part(
        self,
        part: DatePart,
        column: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::DatePart {
                part,
                column: column.into(),
                op: op.into(),
                value: value.into(),
            },
        )
    }

    pub fn where_date(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Date, column, op, value)
    }

    pub fn where_time(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Time, column, op, value)
    }

    pub fn where_year(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Year, column, op, value)
    }

    pub fn where_month(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Month, column, op, value)
    }

    pub fn where_day(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Day, column, op, value)
    }

    // ===== Sets and ranges =====

    /// `column IN (...)`. Duplicate values are dropped, keeping the first.
    pub fn where_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut distinct: Vec<Value> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        self.push_condition(
            Component::Where,
            ConditionKind::In {
                column: column.into(),
                values: distinct,
            },
        )
    }

    pub fn or_where_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or().where_in(column, values)
    }

    pub fn where_not_in<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.not().where_in(column, values)
    }

    /// `column IN (sub-query)`. The sub-query must have a source table.
    pub fn where_in_query(self, column: impl Into<String>, query: Query) -> ShardqlResult<Self> {
        if !query.has_component(Component::From, None) {
            return Err(ShardqlError::invalid_state(
                "sub-query used in IN must have a from clause",
            ));
        }
        let query = self.adopt(query);
        Ok(self.push_condition(
            Component::Where,
            ConditionKind::InQuery {
                column: column.into(),
                query,
            },
        ))
    }

    pub fn where_not_in_query(self, column: impl Into<String>, query: Query) -> ShardqlResult<Self> {
        self.not().where_in_query(column, query)
    }

    /// `column op (sub-query)`.
    pub fn where_sub(self, column: impl Into<String>, op: impl Into<String>, query: Query) -> Self {
        let query = self.adopt(query);
        self.push_condition(
            Component::Where,
            ConditionKind::Sub {
                column: column.into(),
                op: op.into(),
                query,
            },
        )
    }

    pub fn where_between(self, column: impl Into<String>, lower: impl Into<Value>, higher: impl Into<Value>) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Between {
                column: column.into(),
                lower: lower.into(),
                higher: higher.into(),
            },
        )
    }

    pub fn where_not_between(self, column: impl Into<String>, lower: impl Into<Value>, higher: impl Into<Value>) -> Self {
        self.not().where_between(column, lower, higher)
    }

    // ===== Groups, existence, raw =====

    /// Parenthesized group built on a child query. An empty group is omitted.
    pub fn where_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.nested(Component::Where, f)
    }

    pub fn or_where_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.or().where_group(f)
    }

    pub fn where_not_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.not().where_group(f)
    }

    pub(crate) fn nested(mut self, component: Component, f: impl FnOnce(Query) -> Query) -> Self {
        let group = f(self.new_child());
        if !group.has_component(component, None) {
            // Consume the flags so they do not leak onto the next condition.
            self.get_or();
            self.get_not();
            return self;
        }
        let group = self.adopt(group);
        self.push_condition(component, ConditionKind::Nested(group))
    }

    /// `EXISTS (sub-query)`. The projection is replaced by `1` and limited to one row.
    pub fn where_exists(self, mut query: Query) -> ShardqlResult<Self> {
        if !query.has_component(Component::From, None) {
            return Err(ShardqlError::invalid_state(
                "sub-query used in EXISTS must have a from clause",
            ));
        }
        query.clear_component(Component::Select);
        let query = query.select_raw("1", vec![]).limit(1);
        let query = self.adopt(query);
        Ok(self.push_condition(Component::Where, ConditionKind::Exists(query)))
    }

    pub fn where_not_exists(self, query: Query) -> ShardqlResult<Self> {
        self.not().where_exists(query)
    }

    pub fn or_where_exists(self, query: Query) -> ShardqlResult<Self> {
        self.or().where_exists(query)
    }

    pub fn where_raw(self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Raw {
                expr: expr.into(),
                bindings: Arc::from(bindings),
            },
        )
    }

    pub fn or_where_raw(self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.or().where_raw(expr, bindings)
    }
}
