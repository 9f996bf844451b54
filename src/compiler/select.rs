//! Select statement assembly.

use super::conditions::compile_conditions;
use super::context::Fragment;
use super::traits::{Compiler, MAX_LIMIT};
use crate::ast::{
    AggregateKind, ClauseKind, ColumnClause, CombineClause, Component, FromClause, OrderClause,
    Query, Value,
};
use crate::error::{ShardqlError, ShardqlResult};
use crate::parser::expand_columns;

/// Body sections followed by the dialect's native limit, then set operations.
pub fn compile_select_query<C: Compiler + ?Sized>(c: &C, query: &Query) -> ShardqlResult<Fragment> {
    compile_select_sections(c, query, true)
}

/// Select sections in textual order; `with_limit = false` leaves pagination
/// to a dialect that wraps the statement instead.
pub fn compile_select_sections<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    with_limit: bool,
) -> ShardqlResult<Fragment> {
    let mut bindings = Vec::new();
    let mut parts = vec![c.compile_columns(query, &mut bindings)?];
    parts.extend(compile_from(c, query, &mut bindings)?);
    parts.extend(compile_joins(c, query, &mut bindings)?);
    parts.extend(compile_wheres(c, query, &mut bindings)?);
    parts.extend(compile_groups(c, query, &mut bindings)?);
    parts.extend(compile_having(c, query, &mut bindings)?);
    parts.extend(compile_orders(c, query, &mut bindings)?);
    if with_limit {
        parts.extend(c.compile_limit(query, &mut bindings)?);
    }
    parts.extend(compile_unions(c, query, &mut bindings)?);

    let sql = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Fragment::new(sql, bindings))
}

/// `SELECT [DISTINCT] ...`, or the aggregate projection for aggregate queries.
pub fn compile_columns<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<String> {
    let engine = c.engine();

    if let Some(ClauseKind::Aggregate(aggregate)) =
        query.get_one_component(Component::Aggregate, engine).map(|clause| &clause.kind)
    {
        if let [column] = aggregate.columns.as_slice() {
            let mut inner = c.wrap(column);
            if query.is_distinct() && column != "*" {
                inner = format!("DISTINCT {}", inner);
            }
            return Ok(format!(
                "SELECT {}({}) {}{}",
                aggregate.kind.function(),
                inner,
                c.column_as_keyword(),
                c.wrap_value(aggregate.kind.alias())
            ));
        }
        return Ok("SELECT 1".to_string());
    }

    let mut columns = Vec::new();
    for clause in query.get_components(Component::Select, engine) {
        let ClauseKind::Column(column) = &clause.kind else {
            continue;
        };
        columns.push(compile_column(c, column, bindings)?);
    }

    let columns = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    };
    let distinct = if query.is_distinct() { "DISTINCT " } else { "" };
    Ok(format!("SELECT {}{}", distinct, columns))
}

pub fn compile_column<C: Compiler + ?Sized>(
    c: &C,
    column: &ColumnClause,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<String> {
    match column {
        ColumnClause::Named(name) => Ok(expand_columns(name)?
            .iter()
            .map(|col| c.wrap(col))
            .collect::<Vec<_>>()
            .join(", ")),
        ColumnClause::Raw { expr, bindings: own } => {
            bindings.extend(own.iter().cloned());
            Ok(expr.clone())
        }
        ColumnClause::Query(sub) => {
            let compiled = c.compile_select_query(sub)?;
            bindings.extend(compiled.bindings);
            Ok(match sub.get_alias() {
                Some(alias) => format!("({}) {}{}", compiled.sql, c.column_as_keyword(), c.wrap_value(alias)),
                None => format!("({})", compiled.sql),
            })
        }
    }
}

/// Render a table, derived table or raw source.
pub fn compile_table_expression<C: Compiler + ?Sized>(
    c: &C,
    from: &FromClause,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<String> {
    match from {
        FromClause::Table(table) => Ok(c.wrap_table(table)),
        FromClause::Query { query, alias } => {
            let compiled = c.compile_select_query(query)?;
            bindings.extend(compiled.bindings);
            Ok(match alias {
                Some(alias) => format!("({}) {}{}", compiled.sql, c.table_as_keyword(), c.wrap_value(alias)),
                None => format!("({})", compiled.sql),
            })
        }
        FromClause::Raw { expr, bindings: own, .. } => {
            bindings.extend(own.iter().cloned());
            Ok(expr.clone())
        }
    }
}

pub fn compile_from<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<Option<String>> {
    match query.get_one_component(Component::From, c.engine()).map(|clause| &clause.kind) {
        Some(ClauseKind::From(from)) => Ok(Some(format!(
            "FROM {}",
            compile_table_expression(c, from, bindings)?
        ))),
        _ => Ok(None),
    }
}

pub fn compile_joins<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<Option<String>> {
    let engine = c.engine();
    let mut joins = Vec::new();
    for clause in query.get_components(Component::Join, engine) {
        let ClauseKind::Join(join) = &clause.kind else {
            continue;
        };
        let target = match join.query.get_one_component(Component::From, engine).map(|cl| &cl.kind) {
            Some(ClauseKind::From(from)) => compile_table_expression(c, from, bindings)?,
            _ => {
                return Err(ShardqlError::invalid_state("join target has no table"));
            }
        };
        let on = compile_conditions(c, &join.query, Component::Where, bindings)?;
        if on.is_empty() {
            joins.push(format!("{} {}", join.kind.keyword(), target));
        } else {
            joins.push(format!("{} {} ON {}", join.kind.keyword(), target, on));
        }
    }
    Ok((!joins.is_empty()).then(|| joins.join(" ")))
}

pub fn compile_wheres<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<Option<String>> {
    let sql = compile_conditions(c, query, Component::Where, bindings)?;
    Ok((!sql.is_empty()).then(|| format!("WHERE {}", sql)))
}

pub fn compile_groups<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<Option<String>> {
    let mut groups = Vec::new();
    for clause in query.get_components(Component::Group, c.engine()) {
        if let ClauseKind::Column(column) = &clause.kind {
            groups.push(compile_column(c, column, bindings)?);
        }
    }
    Ok((!groups.is_empty()).then(|| format!("GROUP BY {}", groups.join(", "))))
}

pub fn compile_having<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<Option<String>> {
    let sql = compile_conditions(c, query, Component::Having, bindings)?;
    Ok((!sql.is_empty()).then(|| format!("HAVING {}", sql)))
}

pub fn compile_orders<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<Option<String>> {
    let mut orders = Vec::new();
    for clause in query.get_components(Component::Order, c.engine()) {
        let ClauseKind::Order(order) = &clause.kind else {
            continue;
        };
        orders.push(match order {
            OrderClause::Column { column, ascending } => {
                let direction = if *ascending { "" } else { " DESC" };
                format!("{}{}", c.wrap(column), direction)
            }
            OrderClause::Raw { expr, bindings: own } => {
                bindings.extend(own.iter().cloned());
                expr.clone()
            }
            OrderClause::Random { seed } => c.compile_random(seed.as_deref()),
        });
    }
    Ok((!orders.is_empty()).then(|| format!("ORDER BY {}", orders.join(", "))))
}

/// `UNION [ALL] ...` fragments in declaration order.
pub fn compile_unions<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<Option<String>> {
    let mut combined = Vec::new();
    for clause in query.get_components(Component::Combine, c.engine()) {
        let ClauseKind::Combine(combine) = &clause.kind else {
            continue;
        };
        match combine {
            CombineClause::Query { op, all, query } => {
                let compiled = c.compile_select_query(query)?;
                bindings.extend(compiled.bindings);
                let all = if *all { "ALL " } else { "" };
                combined.push(format!("{} {}{}", op.keyword(), all, compiled.sql));
            }
            CombineClause::Raw { expr, bindings: own } => {
                bindings.extend(own.iter().cloned());
                combined.push(expr.clone());
            }
        }
    }
    Ok((!combined.is_empty()).then(|| combined.join(" ")))
}

/// `LIMIT ?` / `LIMIT <max> OFFSET ?` / `LIMIT ? OFFSET ?`.
pub fn compile_limit_offset<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    bindings: &mut Vec<Value>,
) -> Option<String> {
    let engine = c.engine();
    match (query.get_limit(engine), query.get_offset(engine)) {
        (None, None) => None,
        (Some(limit), None) => {
            bindings.push(Value::from(limit));
            Some("LIMIT ?".to_string())
        }
        (None, Some(offset)) => {
            bindings.push(Value::from(offset));
            Some(format!("LIMIT {} OFFSET ?", MAX_LIMIT))
        }
        (Some(limit), Some(offset)) => {
            bindings.push(Value::from(limit));
            bindings.push(Value::from(offset));
            Some("LIMIT ? OFFSET ?".to_string())
        }
    }
}

/// Aggregate projection. Counting several columns counts the distinct rows of
/// a wrapped projection.
pub fn compile_aggregate_query<C: Compiler + ?Sized>(c: &C, query: &Query) -> ShardqlResult<Fragment> {
    let engine = c.engine();
    let Some(ClauseKind::Aggregate(aggregate)) =
        query.get_one_component(Component::Aggregate, engine).map(|clause| &clause.kind)
    else {
        return Err(ShardqlError::invalid_state("aggregate query has no aggregate clause"));
    };

    // A projected or distinct `COUNT(*)` counts the rows the projection returns.
    let counts_projection = aggregate.kind == AggregateKind::Count
        && aggregate.columns == ["*"]
        && (query.is_distinct() || query.has_component(Component::Select, engine));

    match aggregate.columns.len() {
        0 => Err(ShardqlError::invalid_argument("aggregate needs at least one column")),
        1 if counts_projection => {
            let mut inner = query.clone();
            inner.clear_component(Component::Aggregate);
            wrap_count(c, aggregate.kind, &inner)
        }
        1 => c.compile_select_query(query),
        _ if aggregate.kind != AggregateKind::Count => Err(ShardqlError::invalid_argument(format!(
            "{} accepts a single column",
            aggregate.kind.function()
        ))),
        _ => {
            let mut inner = query.clone();
            inner.clear_component(Component::Aggregate);
            let inner = inner.select(aggregate.columns.clone());
            wrap_count(c, aggregate.kind, &inner)
        }
    }
}

/// `SELECT COUNT(*) AS "count" FROM (<inner>) AS "count_query"`.
fn wrap_count<C: Compiler + ?Sized>(c: &C, kind: AggregateKind, inner: &Query) -> ShardqlResult<Fragment> {
    let compiled = c.compile_select_query(inner)?;
    let sql = format!(
        "SELECT COUNT(*) {}{} FROM ({}) {}{}",
        c.column_as_keyword(),
        c.wrap_value(kind.alias()),
        compiled.sql,
        c.table_as_keyword(),
        c.wrap_value("count_query")
    );
    Ok(Fragment::new(sql, compiled.bindings))
}
