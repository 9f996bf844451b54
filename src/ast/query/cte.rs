//! Common table expressions.

use std::sync::Arc;

use super::Query;
use crate::ast::clause::{ClauseKind, Component, FromClause};
use crate::ast::values::Value;
use crate::error::{ShardqlError, ShardqlResult};

impl Query {
    /// Add `query` as a CTE named by its alias.
    ///
    /// Re-declaring an alias is allowed; resolution keeps the first declaration.
    pub fn with(mut self, mut query: Query) -> ShardqlResult<Self> {
        let alias = match query.alias.take() {
            Some(alias) if !alias.trim().is_empty() => alias,
            _ => {
                return Err(ShardqlError::invalid_state(
                    "a CTE query must have an alias",
                ));
            }
        };
        let query = self.adopt(query);
        self.add_component(
            Component::Cte,
            ClauseKind::From(FromClause::Query {
                query,
                alias: Some(alias),
            }),
        );
        Ok(self)
    }

    pub fn with_as(self, alias: impl Into<String>, query: Query) -> ShardqlResult<Self> {
        self.with(query.alias(alias))
    }

    /// Add a raw SQL body as a CTE named `alias`.
    pub fn with_raw(
        mut self,
        alias: impl Into<String>,
        sql: impl Into<String>,
        bindings: Vec<Value>,
    ) -> ShardqlResult<Self> {
        let alias = alias.into();
        if alias.trim().is_empty() {
            return Err(ShardqlError::invalid_state("a CTE must have an alias"));
        }
        self.add_component(
            Component::Cte,
            ClauseKind::From(FromClause::Raw {
                expr: sql.into(),
                bindings: Arc::from(bindings),
                alias: Some(alias),
            }),
        );
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_requires_alias() {
        let err = Query::table("t").with(Query::table("u")).unwrap_err();
        assert!(matches!(err, ShardqlError::InvalidState(_)));
        let err = Query::table("t").with_raw(" ", "SELECT 1", vec![]).unwrap_err();
        assert!(matches!(err, ShardqlError::InvalidState(_)));
    }

    #[test]
    fn test_with_moves_alias_to_clause() {
        let q = Query::table("t").with_as("recent", Query::table("u")).unwrap();
        let clause = q.get_components(Component::Cte, None).next().unwrap();
        let ClauseKind::From(from) = &clause.kind else {
            panic!("expected CTE source");
        };
        assert_eq!(from.alias(), Some("recent"));
        let ClauseKind::From(FromClause::Query { query, .. }) = &clause.kind else {
            panic!("expected query body");
        };
        assert_eq!(query.get_alias(), None);
    }
}
