//! The per-dialect [`Compiler`] trait.
//!
//! Dialects override the small constant hooks (quoting, literals, random,
//! date parts) and, where their pagination differs, the projection, limit
//! or whole-select steps. Everything else is provided.

use super::context::{Fragment, SqlResult};
use super::dialect::Dialect;
use super::{binder, dml, select};
use crate::ast::{DatePart, Query, Value};
use crate::error::ShardqlResult;
use crate::parser::split_alias;

/// Limit substituted when only an offset is requested.
pub const MAX_LIMIT: &str = "18446744073709551615";

pub trait Compiler: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Engine code used to filter scoped clauses.
    fn engine(&self) -> Option<Dialect> {
        Some(self.dialect())
    }

    fn opening_identifier(&self) -> &'static str {
        "\""
    }

    fn closing_identifier(&self) -> &'static str {
        "\""
    }

    fn column_as_keyword(&self) -> &'static str {
        "AS "
    }

    fn table_as_keyword(&self) -> &'static str {
        "AS "
    }

    /// Prefix of named parameter tokens (`@p0`, `:p0`, ...).
    fn parameter_prefix(&self) -> &'static str {
        "@p"
    }

    /// Statement appended to an insert to read back the generated id.
    fn last_id(&self) -> Option<&'static str> {
        Some("SELECT last_insert_rowid() as Id")
    }

    fn compile_random(&self, _seed: Option<&str>) -> String {
        "RANDOM()".to_string()
    }

    fn compile_true(&self) -> &'static str {
        "true"
    }

    fn compile_false(&self) -> &'static str {
        "false"
    }

    /// Quote a single identifier segment. `*` is never quoted.
    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        let close = self.closing_identifier();
        format!(
            "{}{}{}",
            self.opening_identifier(),
            value.replace(close, &close.repeat(2)),
            close
        )
    }

    /// Quote a possibly dotted, possibly `as`-aliased column reference.
    fn wrap(&self, expr: &str) -> String {
        let (name, alias) = split_alias(expr);
        let wrapped = self.wrap_segments(name);
        match alias {
            Some(alias) => format!("{} {}{}", wrapped, self.column_as_keyword(), self.wrap_value(alias)),
            None => wrapped,
        }
    }

    /// Quote a table reference; aliases use the table `AS` keyword.
    fn wrap_table(&self, expr: &str) -> String {
        let (name, alias) = split_alias(expr);
        let wrapped = self.wrap_segments(name);
        match alias {
            Some(alias) => format!("{} {}{}", wrapped, self.table_as_keyword(), self.wrap_value(alias)),
            None => wrapped,
        }
    }

    fn wrap_segments(&self, name: &str) -> String {
        name.split('.')
            .map(|segment| self.wrap_value(segment.trim()))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Left-hand side of a date-part comparison on an already wrapped column.
    fn compile_date_part(&self, part: DatePart, column: &str) -> String {
        format!("{}({})", part.upper(), column)
    }

    /// Native limit/offset fragment appended after `ORDER BY`.
    fn compile_limit(&self, query: &Query, bindings: &mut Vec<Value>) -> ShardqlResult<Option<String>> {
        Ok(select::compile_limit_offset(self, query, bindings))
    }

    /// `SELECT [DISTINCT] columns`.
    fn compile_columns(&self, query: &Query, bindings: &mut Vec<Value>) -> ShardqlResult<String> {
        select::compile_columns(self, query, bindings)
    }

    fn compile_select_query(&self, query: &Query) -> ShardqlResult<Fragment> {
        select::compile_select_query(self, query)
    }

    fn compile_insert_query(&self, query: &Query) -> ShardqlResult<Fragment> {
        dml::compile_insert_query(self, query)
    }

    /// Compile `query` to SQL text plus bindings. The query is never mutated.
    fn compile(&self, query: &Query) -> ShardqlResult<SqlResult> {
        super::compile_query(self, query)
    }

    /// Bind a hand-written statement with positional `?` markers.
    fn compile_raw(&self, sql: &str, bindings: Vec<Value>) -> SqlResult {
        binder::bind(sql.to_string(), bindings, self.parameter_prefix())
    }
}
