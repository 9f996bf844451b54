//! Firebird.
//!
//! `FIRST ?` / `SKIP ?` prefix the projection when only one of limit and
//! offset is set; with both, `ROWS ? TO ?` follows the order clause.
//! Identifiers are upper-cased.

use super::super::context::Fragment;
use super::super::dialect::Dialect;
use super::super::{dml, select};
use super::super::traits::Compiler;
use crate::ast::{DatePart, InsertClause, Query, Value};
use crate::error::ShardqlResult;

pub struct FirebirdCompiler;

impl Compiler for FirebirdCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::Firebird
    }

    fn last_id(&self) -> Option<&'static str> {
        None
    }

    fn compile_random(&self, _seed: Option<&str>) -> String {
        "RAND()".to_string()
    }

    fn compile_true(&self) -> &'static str {
        "1"
    }

    fn compile_false(&self) -> &'static str {
        "0"
    }

    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        format!("\"{}\"", value.replace('"', "\"\"").to_uppercase())
    }

    fn compile_date_part(&self, part: DatePart, column: &str) -> String {
        match part {
            DatePart::Date => format!("CAST({} AS DATE)", column),
            DatePart::Time => format!("CAST({} AS TIME)", column),
            other => format!("EXTRACT({} FROM {})", other.upper(), column),
        }
    }

    fn compile_columns(&self, query: &Query, bindings: &mut Vec<Value>) -> ShardqlResult<String> {
        let compiled = select::compile_columns(self, query, bindings)?;
        let engine = self.engine();
        let rest = compiled.strip_prefix("SELECT").unwrap_or(&compiled);
        match (query.get_limit(engine), query.get_offset(engine)) {
            (Some(limit), None) => {
                bindings.insert(0, Value::from(limit));
                Ok(format!("SELECT FIRST ?{}", rest))
            }
            (None, Some(offset)) => {
                bindings.insert(0, Value::from(offset));
                Ok(format!("SELECT SKIP ?{}", rest))
            }
            _ => Ok(compiled),
        }
    }

    fn compile_limit(&self, query: &Query, bindings: &mut Vec<Value>) -> ShardqlResult<Option<String>> {
        let engine = self.engine();
        match (query.get_limit(engine), query.get_offset(engine)) {
            (Some(limit), Some(offset)) => {
                bindings.push(Value::from(offset.saturating_add(1)));
                bindings.push(Value::from(limit.saturating_add(offset)));
                Ok(Some("ROWS ? TO ?".to_string()))
            }
            _ => Ok(None),
        }
    }

    /// Several rows insert as a `UNION ALL` of selects from `RDB$DATABASE`.
    fn compile_insert_query(&self, query: &Query) -> ShardqlResult<Fragment> {
        let InsertClause::Values { columns, rows, .. } = dml::insert_clause(self, query)? else {
            return dml::compile_insert_query(self, query);
        };
        if rows.len() < 2 {
            return dml::compile_insert_query(self, query);
        }

        let table = dml::target_table(self, query)?;
        let mut bindings = Vec::new();
        let selects = rows
            .iter()
            .map(|row| format!("SELECT {} FROM RDB$DATABASE", dml::row_parameters(row, &mut bindings)))
            .collect::<Vec<_>>()
            .join(" UNION ALL ");
        Ok(Fragment::new(
            format!(
                "INSERT INTO {} ({}) {}",
                table,
                dml::column_list(self, columns),
                selects
            ),
            bindings,
        ))
    }
}
