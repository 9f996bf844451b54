//! Compiler test modules.
//!
//! - `core`: select, join, set operation, DML and aggregate statements
//! - `dialects`: per-dialect pagination, quoting and literals
//! - `conditions`: where/having trees
//! - `cte`: CTE resolution and the `WITH` preamble
//! - `binder`: named parameter binding

mod core;
mod cte;
mod dialects;

use crate::ast::{Query, Value};
use crate::compiler::Dialect;

/// Raw SQL for `query` under `dialect`'s default compiler.
fn sql(query: &Query, dialect: Dialect) -> String {
    dialect.compiler().compile(query).unwrap().raw_sql
}

fn bindings(query: &Query, dialect: Dialect) -> Vec<Value> {
    dialect.compiler().compile(query).unwrap().bindings
}
