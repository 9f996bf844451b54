//! Set operations.

use std::sync::Arc;

use super::{Method, Query};
use crate::ast::clause::{ClauseKind, CombineClause, CombineOp, Component};
use crate::ast::values::Value;
use crate::error::{ShardqlError, ShardqlResult};

impl Query {
    /// Append `op [ALL] query`. Both sides must be select queries.
    pub fn combine(mut self, op: CombineOp, all: bool, query: Query) -> ShardqlResult<Self> {
        if self.method != Method::Select || query.method != Method::Select {
            return Err(ShardqlError::invalid_state(
                "only select queries can be combined",
            ));
        }
        let query = self.adopt(query);
        self.add_component(
            Component::Combine,
            ClauseKind::Combine(CombineClause::Query { op, all, query }),
        );
        Ok(self)
    }

    pub fn union(self, query: Query) -> ShardqlResult<Self> {
        self.combine(CombineOp::Union, false, query)
    }

    pub fn union_all(self, query: Query) -> ShardqlResult<Self> {
        self.combine(CombineOp::Union, true, query)
    }

    pub fn except(self, query: Query) -> ShardqlResult<Self> {
        self.combine(CombineOp::Except, false, query)
    }

    pub fn except_all(self, query: Query) -> ShardqlResult<Self> {
        self.combine(CombineOp::Except, true, query)
    }

    pub fn intersect(self, query: Query) -> ShardqlResult<Self> {
        self.combine(CombineOp::Intersect, false, query)
    }

    pub fn intersect_all(self, query: Query) -> ShardqlResult<Self> {
        self.combine(CombineOp::Intersect, true, query)
    }

    /// Append a raw set-operation fragment, e.g. `UNION SELECT ...`.
    pub fn combine_raw(mut self, expr: impl Into<String>, bindings: Vec<Value>) -> ShardqlResult<Self> {
        if self.method != Method::Select {
            return Err(ShardqlError::invalid_state(
                "only select queries can be combined",
            ));
        }
        self.add_component(
            Component::Combine,
            ClauseKind::Combine(CombineClause::Raw {
                expr: expr.into(),
                bindings: Arc::from(bindings),
            }),
        );
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_rejects_non_select() {
        let delete = Query::table("a").as_delete();
        let err = Query::table("b").union(delete).unwrap_err();
        assert!(matches!(err, ShardqlError::InvalidState(_)));
    }
}
