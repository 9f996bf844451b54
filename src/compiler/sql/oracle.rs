//! Oracle 11g.
//!
//! There is no native limit syntax; pagination wraps the compiled select
//! with `ROWNUM` filters. `AS` is omitted before column and table aliases.

use super::super::context::Fragment;
use super::super::dialect::Dialect;
use super::super::{dml, select};
use super::super::traits::Compiler;
use crate::ast::{DatePart, InsertClause, Query, Value};
use crate::error::{ShardqlError, ShardqlResult};

pub struct OracleCompiler;

impl OracleCompiler {
    /// Wrap `statement` for the query's limit and offset.
    fn apply_limit(&self, query: &Query, statement: Fragment) -> Fragment {
        let engine = self.engine();
        let Fragment { sql, mut bindings } = statement;
        let wrapper = self.wrap_value("results_wrapper");
        let row_num = self.wrap_value("row_num");

        let sql = match (query.get_limit(engine), query.get_offset(engine)) {
            (None, None) => sql,
            (Some(limit), None) => {
                bindings.push(Value::from(limit));
                format!("SELECT * FROM ({}) WHERE ROWNUM <= ?", sql)
            }
            (None, Some(offset)) => {
                bindings.push(Value::from(offset));
                format!(
                    "SELECT * FROM (SELECT {w}.*, ROWNUM {r} FROM ({sql}) {w}) WHERE {r} > ?",
                    w = wrapper,
                    r = row_num,
                    sql = sql
                )
            }
            (Some(limit), Some(offset)) => {
                bindings.push(Value::from(limit.saturating_add(offset)));
                bindings.push(Value::from(offset));
                format!(
                    "SELECT * FROM (SELECT {w}.*, ROWNUM {r} FROM ({sql}) {w} WHERE ROWNUM <= ?) WHERE {r} > ?",
                    w = wrapper,
                    r = row_num,
                    sql = sql
                )
            }
        };
        Fragment::new(sql, bindings)
    }
}

impl Compiler for OracleCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn column_as_keyword(&self) -> &'static str {
        ""
    }

    fn table_as_keyword(&self) -> &'static str {
        ""
    }

    fn parameter_prefix(&self) -> &'static str {
        ":p"
    }

    fn last_id(&self) -> Option<&'static str> {
        None
    }

    fn compile_random(&self, _seed: Option<&str>) -> String {
        "DBMS_RANDOM.VALUE".to_string()
    }

    fn compile_true(&self) -> &'static str {
        "1"
    }

    fn compile_false(&self) -> &'static str {
        "0"
    }

    fn compile_date_part(&self, part: DatePart, column: &str) -> String {
        match part {
            DatePart::Date => format!("TRUNC({})", column),
            DatePart::Time => format!("TO_CHAR({}, 'HH24:MI:SS')", column),
            other => format!("EXTRACT({} FROM {})", other.upper(), column),
        }
    }

    fn compile_limit(&self, _query: &Query, _bindings: &mut Vec<Value>) -> ShardqlResult<Option<String>> {
        Err(ShardqlError::unsupported(
            "oracle11g has no native limit syntax; pagination is applied by ROWNUM wrapping",
        ))
    }

    fn compile_select_query(&self, query: &Query) -> ShardqlResult<Fragment> {
        let statement = select::compile_select_sections(self, query, false)?;
        Ok(self.apply_limit(query, statement))
    }

    /// Several rows insert through `INSERT ALL ... SELECT 1 FROM DUAL`.
    fn compile_insert_query(&self, query: &Query) -> ShardqlResult<Fragment> {
        let InsertClause::Values { columns, rows, .. } = dml::insert_clause(self, query)? else {
            return dml::compile_insert_query(self, query);
        };
        if rows.len() < 2 {
            return dml::compile_insert_query(self, query);
        }

        let table = dml::target_table(self, query)?;
        let columns = dml::column_list(self, columns);
        let mut bindings = Vec::new();
        let intos = rows
            .iter()
            .map(|row| {
                format!(
                    "INTO {} ({}) VALUES ({})",
                    table,
                    columns,
                    dml::row_parameters(row, &mut bindings)
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Fragment::new(
            format!("INSERT ALL {} SELECT 1 FROM DUAL", intos),
            bindings,
        ))
    }
}
