//! SQL compilation: one AST, six dialects.
//!
//! Pipeline per [`Compiler::compile`] call:
//! 1. clone the query so the caller's AST is never touched
//! 2. compile the statement body for its method (select, aggregate, insert,
//!    update, delete); for selects the dialect's limit strategy runs last
//!    and may wrap everything assembled so far
//! 3. prepend the resolved `WITH` preamble
//! 4. rename positional `?` markers to the dialect's named tokens
//!
//! ```
//! use shardql::ast::Query;
//! use shardql::compiler::Dialect;
//!
//! let q = Query::table("users").where_("id", "=", 7).offset(20).limit(10);
//! let result = Dialect::SqlServer.compiler().compile(&q).unwrap();
//! assert_eq!(
//!     result.raw_sql,
//!     "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS [row_num] \
//!      FROM [users] WHERE [id] = ?) AS [results_wrapper] WHERE [row_num] BETWEEN ? AND ?"
//! );
//! ```

pub mod binder;
pub mod conditions;
pub mod context;
pub mod cte;
pub mod dialect;
pub mod dml;
pub mod select;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

pub use context::{Fragment, NamedBindings, SqlResult};
pub use cte::CteResolver;
pub use dialect::Dialect;
pub use sql::sqlserver::SqlServerCompiler;
pub use traits::{Compiler, MAX_LIMIT};

use tracing::debug;

use crate::ast::{Component, Method, Query};
use crate::error::ShardqlResult;

/// Full compile pipeline shared by every dialect.
pub(crate) fn compile_query<C: Compiler + ?Sized>(c: &C, query: &Query) -> ShardqlResult<SqlResult> {
    let query = query.clone();

    let body = match query.method() {
        Method::Select => c.compile_select_query(&query)?,
        Method::Aggregate => {
            let mut query = query.clone();
            query.clear_component(Component::Limit);
            query.clear_component(Component::Order);
            query.clear_component(Component::Group);
            select::compile_aggregate_query(c, &query)?
        }
        Method::Insert => c.compile_insert_query(&query)?,
        Method::Update => dml::compile_update_query(c, &query)?,
        Method::Delete => dml::compile_delete_query(c, &query)?,
    };

    let statement = cte::prepend_ctes(c, &query, body)?;
    let result = binder::bind(statement.sql, statement.bindings, c.parameter_prefix());

    debug!(
        target: "shardql::compiler",
        dialect = %c.dialect(),
        bindings = result.bindings.len(),
        "compiled: {}",
        result
    );
    Ok(result)
}
