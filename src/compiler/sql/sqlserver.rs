//! SQL Server.
//!
//! Legacy pagination (the default) emulates limit with `TOP (?)` and
//! limit+offset with a `ROW_NUMBER()` window over a wrapped select. With it
//! turned off, the native `OFFSET ? ROWS FETCH NEXT ? ROWS ONLY` is used.

use super::super::context::Fragment;
use super::super::dialect::Dialect;
use super::super::select;
use super::super::traits::Compiler;
use crate::ast::{Component, DatePart, Query, Value};
use crate::error::ShardqlResult;

#[derive(Debug, Clone, Copy)]
pub struct SqlServerCompiler {
    pub legacy_pagination: bool,
}

impl Default for SqlServerCompiler {
    fn default() -> Self {
        Self {
            legacy_pagination: true,
        }
    }
}

impl SqlServerCompiler {
    pub fn new(legacy_pagination: bool) -> Self {
        Self { legacy_pagination }
    }
}

impl Compiler for SqlServerCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn opening_identifier(&self) -> &'static str {
        "["
    }

    fn closing_identifier(&self) -> &'static str {
        "]"
    }

    fn last_id(&self) -> Option<&'static str> {
        Some("SELECT scope_identity() as Id")
    }

    fn compile_random(&self, _seed: Option<&str>) -> String {
        "NEWID()".to_string()
    }

    fn compile_true(&self) -> &'static str {
        "CAST(1 AS BIT)"
    }

    fn compile_false(&self) -> &'static str {
        "CAST(0 AS BIT)"
    }

    fn compile_date_part(&self, part: DatePart, column: &str) -> String {
        match part {
            DatePart::Date => format!("CAST({} AS DATE)", column),
            DatePart::Time => format!("CAST({} AS TIME)", column),
            other => format!("DATEPART({}, {})", other.upper(), column),
        }
    }

    /// Limit without offset becomes `TOP (?)`, bound ahead of the projection.
    fn compile_columns(&self, query: &Query, bindings: &mut Vec<Value>) -> ShardqlResult<String> {
        let compiled = select::compile_columns(self, query, bindings)?;
        if !self.legacy_pagination {
            return Ok(compiled);
        }

        let engine = self.engine();
        match (query.get_limit(engine), query.get_offset(engine)) {
            (Some(limit), None) => {
                bindings.insert(0, Value::from(limit));
                if let Some(rest) = compiled.strip_prefix("SELECT DISTINCT") {
                    Ok(format!("SELECT DISTINCT TOP (?){}", rest))
                } else {
                    let rest = compiled.strip_prefix("SELECT").unwrap_or(&compiled);
                    Ok(format!("SELECT TOP (?){}", rest))
                }
            }
            _ => Ok(compiled),
        }
    }

    fn compile_limit(&self, query: &Query, bindings: &mut Vec<Value>) -> ShardqlResult<Option<String>> {
        if self.legacy_pagination {
            return Ok(None);
        }

        let engine = self.engine();
        let (limit, offset) = (query.get_limit(engine), query.get_offset(engine));
        if limit.is_none() && offset.is_none() {
            return Ok(None);
        }

        let safe_order = if query.has_component(Component::Order, engine) {
            ""
        } else {
            "ORDER BY (SELECT 0) "
        };

        bindings.push(Value::from(offset.unwrap_or(0)));
        match limit {
            None => Ok(Some(format!("{}OFFSET ? ROWS", safe_order))),
            Some(limit) => {
                bindings.push(Value::from(limit));
                Ok(Some(format!("{}OFFSET ? ROWS FETCH NEXT ? ROWS ONLY", safe_order)))
            }
        }
    }

    /// With an offset, number the rows and filter a wrapping select on them.
    fn compile_select_query(&self, query: &Query) -> ShardqlResult<Fragment> {
        let engine = self.engine();
        let Some(offset) = query.get_offset(engine).filter(|_| self.legacy_pagination) else {
            return select::compile_select_query(self, query);
        };
        let limit = query.get_limit(engine);

        let mut query = query.clone();
        if !query.has_component(Component::Select, engine) {
            query = query.select(["*"]);
        }
        let mut order_bindings = Vec::new();
        let order = select::compile_orders(self, &query, &mut order_bindings)?
            .unwrap_or_else(|| "ORDER BY (SELECT 0)".to_string());
        let mut query = query.select_raw(
            format!("ROW_NUMBER() OVER ({}) AS [row_num]", order),
            order_bindings,
        );
        query.clear_component(Component::Order);

        let inner = select::compile_select_query(self, &query)?;
        let mut bindings = inner.bindings;
        bindings.push(Value::from(offset.saturating_add(1)));
        let sql = match limit {
            None => format!(
                "SELECT * FROM ({}) AS [results_wrapper] WHERE [row_num] >= ?",
                inner.sql
            ),
            Some(limit) => {
                bindings.push(Value::from(limit.saturating_add(offset)));
                format!(
                    "SELECT * FROM ({}) AS [results_wrapper] WHERE [row_num] BETWEEN ? AND ?",
                    inner.sql
                )
            }
        };
        Ok(Fragment::new(sql, bindings))
    }
}
