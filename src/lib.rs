//! # shardql
//!
//! A programmatic SQL query builder that compiles one AST to six SQL dialects,
//! plus a pagination engine that walks a family of same-shaped tables
//! ("shards") as if they were one logical table.
//!
//! ## Quick Example
//!
//! ```
//! use shardql::prelude::*;
//!
//! let query = Query::table("users")
//!     .select(["id", "email"])
//!     .where_("active", "=", true)
//!     .order_by_desc(["created_at"])
//!     .limit(10);
//!
//! let result = Dialect::MySql.compiler().compile(&query).unwrap();
//! assert_eq!(
//!     result.raw_sql,
//!     "SELECT `id`, `email` FROM `users` WHERE `active` = ? ORDER BY `created_at` DESC LIMIT ?"
//! );
//! assert_eq!(result.sql.matches("@p").count(), 2);
//! ```
//!
//! ## Layers
//!
//! | Module       | Role                                                   |
//! |--------------|--------------------------------------------------------|
//! | [`ast`]      | Clause model and the fluent [`Query`](ast::Query) AST  |
//! | [`compiler`] | Dialect compilers, CTE resolver, parameter binder      |
//! | [`shard`]    | Shard directory, row-count cache, cross-shard paging   |
//! | [`engine`]   | Statement execution collaborator (sqlx backed)         |
//! | [`schema`]   | Table discovery collaborator and injected caches       |

pub mod ast;
pub mod compiler;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod parser;
pub mod schema;
pub mod shard;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::compiler::{Compiler, Dialect, SqlResult};
    pub use crate::config::ShardqlConfig;
    pub use crate::context::Context;
    pub use crate::engine::{Executor, Row};
    pub use crate::error::*;
    pub use crate::schema::{SchemaSource, TableInfo};
    pub use crate::shard::{ShardQuery, ShardedTable};
}

/// Compile a query with the given dialect's default compiler.
///
/// # Example
///
/// ```
/// use shardql::{compile, ast::Query, compiler::Dialect};
///
/// let result = compile(&Query::table("users").limit(5), Dialect::Oracle).unwrap();
/// assert_eq!(result.raw_sql, "SELECT * FROM (SELECT * FROM \"users\") WHERE ROWNUM <= ?");
/// ```
pub fn compile(
    query: &ast::Query,
    dialect: compiler::Dialect,
) -> error::ShardqlResult<compiler::SqlResult> {
    dialect.compiler().compile(query)
}
