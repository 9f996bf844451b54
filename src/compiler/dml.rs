//! Insert, update and delete statements.

use super::conditions::parameter;
use super::context::Fragment;
use super::select::{compile_joins, compile_wheres};
use super::traits::Compiler;
use crate::ast::{ClauseKind, Component, FromClause, InsertClause, Query, Value};
use crate::error::{ShardqlError, ShardqlResult};

/// The wrapped target table of a DML statement.
pub fn target_table<C: Compiler + ?Sized>(c: &C, query: &Query) -> ShardqlResult<String> {
    match query.get_one_component(Component::From, c.engine()).map(|clause| &clause.kind) {
        Some(ClauseKind::From(FromClause::Table(table))) => Ok(c.wrap_table(table)),
        Some(ClauseKind::From(FromClause::Raw { expr, .. })) => Ok(expr.clone()),
        Some(_) => Err(ShardqlError::invalid_state(
            "a DML statement needs a table, not a sub-query",
        )),
        None => Err(ShardqlError::invalid_state("no table set for the statement")),
    }
}

pub fn insert_clause<'q, C: Compiler + ?Sized>(c: &C, query: &'q Query) -> ShardqlResult<&'q InsertClause> {
    match query.get_one_component(Component::Insert, c.engine()).map(|clause| &clause.kind) {
        Some(ClauseKind::Insert(insert)) => Ok(insert),
        _ => Err(ShardqlError::invalid_state("insert query has no values")),
    }
}

/// `"a", "b"`
pub fn column_list<C: Compiler + ?Sized>(c: &C, columns: &[String]) -> String {
    columns
        .iter()
        .map(|col| c.wrap(col))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `?, ?` for one row, binding in column order.
pub fn row_parameters(row: &[Value], bindings: &mut Vec<Value>) -> String {
    row.iter()
        .map(|value| parameter(value, bindings))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Append the dialect's last-id statement.
pub fn append_last_id<C: Compiler + ?Sized>(c: &C, sql: &mut String) -> ShardqlResult<()> {
    match c.last_id() {
        Some(last_id) => {
            sql.push(';');
            sql.push_str(last_id);
            Ok(())
        }
        None => Err(ShardqlError::unsupported(format!(
            "{} cannot return the inserted id",
            c.dialect()
        ))),
    }
}

pub fn compile_insert_query<C: Compiler + ?Sized>(c: &C, query: &Query) -> ShardqlResult<Fragment> {
    let table = target_table(c, query)?;
    let mut bindings = Vec::new();

    let sql = match insert_clause(c, query)? {
        InsertClause::Values {
            columns,
            rows,
            returning_id,
        } => {
            let values = rows
                .iter()
                .map(|row| format!("({})", row_parameters(row, &mut bindings)))
                .collect::<Vec<_>>()
                .join(", ");
            let mut sql = format!(
                "INSERT INTO {} ({}) VALUES {}",
                table,
                column_list(c, columns),
                values
            );
            if *returning_id {
                append_last_id(c, &mut sql)?;
            }
            sql
        }
        InsertClause::Query { columns, query } => {
            let sub = c.compile_select_query(query)?;
            bindings.extend(sub.bindings);
            format!("INSERT INTO {} ({}) {}", table, column_list(c, columns), sub.sql)
        }
    };
    Ok(Fragment::new(sql, bindings))
}

pub fn compile_update_query<C: Compiler + ?Sized>(c: &C, query: &Query) -> ShardqlResult<Fragment> {
    let table = target_table(c, query)?;
    let Some(ClauseKind::Update(update)) =
        query.get_one_component(Component::Update, c.engine()).map(|clause| &clause.kind)
    else {
        return Err(ShardqlError::invalid_state("update query has no values"));
    };

    let mut bindings = Vec::new();
    let assignments = update
        .columns
        .iter()
        .zip(&update.values)
        .map(|(column, value)| format!("{} = {}", c.wrap(column), parameter(value, &mut bindings)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("UPDATE {} SET {}", table, assignments);
    if let Some(wheres) = compile_wheres(c, query, &mut bindings)? {
        sql.push(' ');
        sql.push_str(&wheres);
    }
    Ok(Fragment::new(sql, bindings))
}

/// `DELETE FROM t WHERE ...`; with joins, `DELETE alias FROM t ... JOIN ...`.
pub fn compile_delete_query<C: Compiler + ?Sized>(c: &C, query: &Query) -> ShardqlResult<Fragment> {
    let table = target_table(c, query)?;
    let mut bindings = Vec::new();

    let joins = compile_joins(c, query, &mut bindings)?;
    let mut sql = match &joins {
        None => format!("DELETE FROM {}", table),
        Some(joins) => {
            let alias = query
                .get_one_component(Component::From, c.engine())
                .and_then(|clause| match &clause.kind {
                    ClauseKind::From(from) => from.alias(),
                    _ => None,
                })
                .map(|alias| c.wrap_value(alias))
                .unwrap_or_else(|| table.clone());
            format!("DELETE {} FROM {} {}", alias, table, joins)
        }
    };
    if let Some(wheres) = compile_wheres(c, query, &mut bindings)? {
        sql.push(' ');
        sql.push_str(&wheres);
    }
    Ok(Fragment::new(sql, bindings))
}
