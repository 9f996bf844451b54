//! `having` builders, mirroring the `where` family.

use std::sync::Arc;

use super::Query;
use crate::ast::clause::Component;
use crate::ast::conditions::ConditionKind;
use crate::ast::values::Value;

impl Query {
    pub fn having(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(Component::Having, column.into(), op.into(), value.into())
    }

    pub fn or_having(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.or().having(column, op, value)
    }

    pub fn having_not(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.not().having(column, op, value)
    }

    pub fn having_columns(self, first: impl Into<String>, op: impl Into<String>, second: impl Into<String>) -> Self {
        self.push_condition(
            Component::Having,
            ConditionKind::Columns {
                first: first.into(),
                op: op.into(),
                second: second.into(),
            },
        )
    }

    pub fn having_null(self, column: impl Into<String>) -> Self {
        self.push_condition(Component::Having, ConditionKind::Null { column: column.into() })
    }

    pub fn having_not_null(self, column: impl Into<String>) -> Self {
        self.not().having_null(column)
    }

    pub fn having_in<I, V>(self, column: impl Into<String>, values: I) -> Self
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
            Component::Having,
            ConditionKind::In {
                column: column.into(),
                values: distinct,
            },
        )
    }

    pub fn having_between(self, column: impl Into<String>, lower: impl Into<Value>, higher: impl Into<Value>) -> Self {
        self.push_condition(
            Component::Having,
            ConditionKind::Between {
                column: column.into(),
                lower: lower.into(),
                higher: higher.into(),
            },
        )
    }

    /// Parenthesized group; the closure builds it with `having*` calls.
    pub fn having_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.nested(Component::Having, f)
    }

    pub fn or_having_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.or().having_group(f)
    }

    pub fn having_raw(self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.push_condition(
            Component::Having,
            ConditionKind::Raw {
                expr: expr.into(),
                bindings: Arc::from(bindings),
            },
        )
    }

    pub fn or_having_raw(self, expr: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.or().having_raw(expr, bindings)
    }
}
