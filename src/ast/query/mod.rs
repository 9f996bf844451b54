//! The [`Query`] AST and its fluent builder.
//!
//! Builder methods consume and return the query. Methods that can reject
//! their input return `ShardqlResult<Query>` and validate before mutating.
//!
//! ```
//! use shardql::ast::Query;
//!
//! let q = Query::table("orders")
//!     .where_("status", "=", "paid")
//!     .or()
//!     .where_null("refunded_at")
//!     .order_by(["id"])
//!     .for_page(3, 20);
//! assert_eq!(q.get_limit(None), Some(20));
//! assert_eq!(q.get_offset(None), Some(40));
//! ```

mod combine;
mod conditions;
mod cte;
mod dml;
mod having;
mod join;
mod select;

pub use join::{Join, JoinKind};

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::clause::{Clause, ClauseKind, Component, LimitOffset};
use crate::compiler::Dialect;
use crate::error::{ShardqlError, ShardqlResult};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique query identity, used for the non-owning parent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryId(u64);

impl QueryId {
    fn next() -> Self {
        QueryId(NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Aggregate,
}

/// An ordered clause list plus builder state.
#[derive(Debug)]
pub struct Query {
    id: QueryId,
    pub(crate) clauses: Vec<Clause>,
    pub(crate) method: Method,
    pub(crate) distinct: bool,
    pub(crate) alias: Option<String>,
    pub(crate) engine_scope: Option<Dialect>,
    parent: Option<QueryId>,
    pending_or: bool,
    pending_not: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: every clause is cloned, scalar state copied, pending flags reset.
impl Clone for Query {
    fn clone(&self) -> Self {
        Self {
            id: QueryId::next(),
            clauses: self.clauses.clone(),
            method: self.method,
            distinct: self.distinct,
            alias: self.alias.clone(),
            engine_scope: self.engine_scope,
            parent: self.parent,
            pending_or: false,
            pending_not: false,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self {
            id: QueryId::next(),
            clauses: Vec::new(),
            method: Method::Select,
            distinct: false,
            alias: None,
            engine_scope: None,
            parent: None,
            pending_or: false,
            pending_not: false,
        }
    }

    /// A select query over `table` (`"table"` or `"table as alias"`).
    pub fn table(table: impl Into<String>) -> Self {
        Self::new().from(table)
    }

    /// A child query that inherits this query's engine scope and records it as parent.
    pub fn new_child(&self) -> Self {
        let mut child = Self::new();
        child.engine_scope = self.engine_scope;
        child.parent = Some(self.id);
        child
    }

    pub fn id(&self) -> QueryId {
        self.id
    }

    pub fn parent(&self) -> Option<QueryId> {
        self.parent
    }

    /// Link this query to a parent. A query cannot be its own parent.
    pub fn set_parent(mut self, parent: QueryId) -> ShardqlResult<Self> {
        if parent == self.id {
            return Err(ShardqlError::invalid_state(
                "a query cannot be set as its own parent",
            ));
        }
        self.parent = Some(parent);
        Ok(self)
    }

    /// Take ownership of a sub-query embedded in one of this query's clauses.
    pub(crate) fn adopt(&self, mut child: Query) -> Box<Query> {
        child.parent = Some(self.id);
        Box::new(child)
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn get_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn engine_scope(&self) -> Option<Dialect> {
        self.engine_scope
    }

    // ===== Boolean combinators =====

    pub fn and(mut self) -> Self {
        self.pending_or = false;
        self
    }

    pub fn or(mut self) -> Self {
        self.pending_or = true;
        self
    }

    /// Negate the next condition. Flags not consumed by a condition have no effect.
    pub fn not(mut self) -> Self {
        self.pending_not = true;
        self
    }

    pub(crate) fn set_not(mut self, flag: bool) -> Self {
        self.pending_not = flag;
        self
    }

    pub(crate) fn set_or(mut self, flag: bool) -> Self {
        self.pending_or = flag;
        self
    }

    /// Read and reset the pending-or flag.
    pub(crate) fn get_or(&mut self) -> bool {
        std::mem::take(&mut self.pending_or)
    }

    /// Read and reset the pending-not flag.
    pub(crate) fn get_not(&mut self) -> bool {
        std::mem::take(&mut self.pending_not)
    }

    // ===== Component bookkeeping =====

    /// Append a clause under the current engine scope.
    pub fn add_component(&mut self, component: Component, kind: ClauseKind) {
        self.clauses.push(Clause {
            component,
            engine: self.engine_scope,
            kind,
        });
    }

    /// Clauses of `component` eligible for `engine`, in insertion order.
    pub fn get_components(
        &self,
        component: Component,
        engine: Option<Dialect>,
    ) -> impl Iterator<Item = &Clause> {
        self.clauses
            .iter()
            .filter(move |c| c.component == component && c.applies_to(engine))
    }

    /// The eligible clause of `component`, preferring an exact engine match.
    pub fn get_one_component(&self, component: Component, engine: Option<Dialect>) -> Option<&Clause> {
        self.get_components(component, engine)
            .find(|c| c.engine == engine)
            .or_else(|| self.get_components(component, engine).find(|c| c.engine.is_none()))
    }

    pub fn has_component(&self, component: Component, engine: Option<Dialect>) -> bool {
        self.get_components(component, engine).next().is_some()
    }

    /// Remove clauses of `component` visible under the current engine scope.
    pub fn clear_component(&mut self, component: Component) {
        let scope = self.engine_scope;
        self.clauses
            .retain(|c| !(c.component == component && c.applies_to(scope)));
    }

    // ===== Engine scope =====

    /// Apply `f` with clauses scoped to `engine`, restoring the previous scope.
    pub fn for_engine(mut self, engine: Dialect, f: impl FnOnce(Query) -> Query) -> Self {
        let previous = self.engine_scope;
        self.engine_scope = Some(engine);
        let mut query = f(self);
        query.engine_scope = previous;
        query
    }

    pub fn for_mysql(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.for_engine(Dialect::MySql, f)
    }

    pub fn for_postgres(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.for_engine(Dialect::Postgres, f)
    }

    pub fn for_sqlserver(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.for_engine(Dialect::SqlServer, f)
    }

    pub fn for_oracle(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.for_engine(Dialect::Oracle, f)
    }

    pub fn for_firebird(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.for_engine(Dialect::Firebird, f)
    }

    // ===== Conditional building =====

    pub fn when(self, condition: bool, f: impl FnOnce(Query) -> Query) -> Self {
        if condition { f(self) } else { self }
    }

    pub fn when_not(self, condition: bool, f: impl FnOnce(Query) -> Query) -> Self {
        self.when(!condition, f)
    }

    // ===== Limit / offset =====

    fn update_limit(&mut self, f: impl FnOnce(&mut LimitOffset)) {
        let scope = self.engine_scope;
        let pos = self.clauses.iter().position(|c| {
            c.component == Component::Limit
                && c.engine == scope
                && matches!(c.kind, ClauseKind::LimitOffset(_))
        });
        let idx = match pos {
            Some(idx) => idx,
            None => {
                self.add_component(Component::Limit, ClauseKind::LimitOffset(LimitOffset::default()));
                self.clauses.len() - 1
            }
        };
        if let ClauseKind::LimitOffset(lo) = &mut self.clauses[idx].kind {
            f(lo);
        }
    }

    /// Limit the row count. `0` clears the limit.
    pub fn limit(mut self, n: u64) -> Self {
        self.update_limit(|lo| lo.limit = (n > 0).then_some(n));
        self
    }

    /// Skip `n` rows. `0` clears the offset.
    pub fn offset(mut self, n: u64) -> Self {
        self.update_limit(|lo| lo.offset = (n > 0).then_some(n));
        self
    }

    /// Drop limit and offset in every engine scope.
    pub fn clear_paging(mut self) -> Self {
        self.clauses.retain(|c| c.component != Component::Limit);
        self
    }

    pub fn take(self, n: u64) -> Self {
        self.limit(n)
    }

    pub fn skip(self, n: u64) -> Self {
        self.offset(n)
    }

    /// 1-based page helper.
    pub fn for_page(self, page: u64, per_page: u64) -> Self {
        let page = page.max(1);
        self.skip((page - 1).saturating_mul(per_page)).take(per_page)
    }

    fn limit_offset(&self, engine: Option<Dialect>) -> LimitOffset {
        match self.get_one_component(Component::Limit, engine).map(|c| &c.kind) {
            Some(ClauseKind::LimitOffset(lo)) => *lo,
            _ => LimitOffset::default(),
        }
    }

    pub fn get_limit(&self, engine: Option<Dialect>) -> Option<u64> {
        self.limit_offset(engine).limit
    }

    pub fn get_offset(&self, engine: Option<Dialect>) -> Option<u64> {
        self.limit_offset(engine).offset
    }

    pub fn has_limit(&self, engine: Option<Dialect>) -> bool {
        self.get_limit(engine).is_some()
    }

    pub fn has_offset(&self, engine: Option<Dialect>) -> bool {
        self.get_offset(engine).is_some()
    }
}
