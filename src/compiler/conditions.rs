//! Condition-tree compilation shared by `WHERE`, `HAVING` and join `ON`.

use super::traits::Compiler;
use crate::ast::{ClauseKind, Component, Condition, ConditionKind, Query, Value, is_known_operator};
use crate::error::{ShardqlError, ShardqlResult};

/// Placeholder for `value`, or the inlined expression for [`Value::Raw`].
pub fn parameter(value: &Value, bindings: &mut Vec<Value>) -> String {
    match value {
        Value::Raw(expr) => expr.clone(),
        other => {
            bindings.push(other.clone());
            "?".to_string()
        }
    }
}

/// Reject operators outside the known list before they reach SQL text.
pub fn check_operator(op: &str) -> ShardqlResult<&str> {
    if is_known_operator(op) {
        Ok(op.trim())
    } else {
        Err(ShardqlError::invalid_argument(format!(
            "the operator '{}' cannot be used",
            op
        )))
    }
}

/// Join every eligible condition of `component`. The first condition's
/// combinator is ignored. Returns an empty string when there is none.
pub fn compile_conditions<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    component: Component,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<String> {
    let mut sql = String::new();
    for clause in query.get_components(component, c.engine()) {
        let ClauseKind::Condition(condition) = &clause.kind else {
            continue;
        };
        let compiled = compile_condition(c, condition, component, bindings)?;
        if compiled.is_empty() {
            continue;
        }
        if !sql.is_empty() {
            sql.push_str(if condition.is_or { " OR " } else { " AND " });
        }
        sql.push_str(&compiled);
    }
    Ok(sql)
}

fn negate(sql: String, is_not: bool) -> String {
    if is_not { format!("NOT ({})", sql) } else { sql }
}

pub fn compile_condition<C: Compiler + ?Sized>(
    c: &C,
    condition: &Condition,
    component: Component,
    bindings: &mut Vec<Value>,
) -> ShardqlResult<String> {
    let is_not = condition.is_not;
    let sql = match &condition.kind {
        ConditionKind::Basic { column, op, value } => {
            let op = check_operator(op)?;
            negate(format!("{} {} {}", c.wrap(column), op, parameter(value, bindings)), is_not)
        }
        ConditionKind::Str {
            column,
            op,
            value,
            case_sensitive,
        } => {
            let (column, value) = if *case_sensitive {
                (c.wrap(column), op.pattern(value))
            } else {
                (format!("LOWER({})", c.wrap(column)), op.pattern(value).to_lowercase())
            };
            bindings.push(Value::String(value));
            negate(format!("{} LIKE ?", column), is_not)
        }
        ConditionKind::DatePart {
            part,
            column,
            op,
            value,
        } => {
            let op = check_operator(op)?;
            let left = c.compile_date_part(*part, &c.wrap(column));
            negate(format!("{} {} {}", left, op, parameter(value, bindings)), is_not)
        }
        ConditionKind::Columns { first, op, second } => {
            let op = check_operator(op)?;
            negate(format!("{} {} {}", c.wrap(first), op, c.wrap(second)), is_not)
        }
        ConditionKind::In { column, values } => {
            if values.is_empty() {
                // Nothing is IN an empty set; everything is NOT IN it.
                return Ok(if is_not { "1 = 1" } else { "1 = 0" }.to_string());
            }
            let params = values
                .iter()
                .map(|value| parameter(value, bindings))
                .collect::<Vec<_>>()
                .join(", ");
            let op = if is_not { "NOT IN" } else { "IN" };
            format!("{} {} ({})", c.wrap(column), op, params)
        }
        ConditionKind::InQuery { column, query } => {
            let sub = c.compile_select_query(query)?;
            bindings.extend(sub.bindings);
            let op = if is_not { "NOT IN" } else { "IN" };
            format!("{} {} ({})", c.wrap(column), op, sub.sql)
        }
        ConditionKind::Sub { column, op, query } => {
            let op = check_operator(op)?;
            let sub = c.compile_select_query(query)?;
            bindings.extend(sub.bindings);
            negate(format!("{} {} ({})", c.wrap(column), op, sub.sql), is_not)
        }
        ConditionKind::Between { column, lower, higher } => {
            let op = if is_not { "NOT BETWEEN" } else { "BETWEEN" };
            let lower = parameter(lower, bindings);
            let higher = parameter(higher, bindings);
            format!("{} {} {} AND {}", c.wrap(column), op, lower, higher)
        }
        ConditionKind::Null { column } => {
            let op = if is_not { "IS NOT NULL" } else { "IS NULL" };
            format!("{} {}", c.wrap(column), op)
        }
        ConditionKind::Boolean { column, value } => {
            let op = if is_not { "!=" } else { "=" };
            let literal = if *value { c.compile_true() } else { c.compile_false() };
            format!("{} {} {}", c.wrap(column), op, literal)
        }
        ConditionKind::Nested(query) => {
            let inner = compile_conditions(c, query, component, bindings)?;
            if inner.is_empty() {
                return Ok(String::new());
            }
            negate(format!("({})", inner), is_not)
        }
        ConditionKind::Exists(query) => {
            let sub = c.compile_select_query(query)?;
            bindings.extend(sub.bindings);
            let op = if is_not { "NOT EXISTS" } else { "EXISTS" };
            format!("{} ({})", op, sub.sql)
        }
        ConditionKind::Raw { expr, bindings: own } => {
            bindings.extend(own.iter().cloned());
            negate(expr.clone(), is_not)
        }
    };
    Ok(sql)
}
