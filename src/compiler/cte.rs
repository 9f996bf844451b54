//! CTE resolution and the `WITH` preamble.

use std::collections::HashSet;

use super::context::Fragment;
use super::dialect::Dialect;
use super::traits::Compiler;
use crate::ast::{ClauseKind, Component, FromClause, Query};
use crate::error::{ShardqlError, ShardqlResult};

/// Collects the CTEs reachable from a query in dependency order.
///
/// Each CTE appears after every CTE its body declares, and an alias seen
/// twice keeps its first declaration. The seen-set lives for one
/// [`resolve`](CteResolver::resolve) call only.
pub struct CteResolver<'q> {
    root: &'q Query,
    engine: Option<Dialect>,
    seen: HashSet<&'q str>,
}

impl<'q> CteResolver<'q> {
    pub fn new(root: &'q Query, engine: Option<Dialect>) -> Self {
        Self {
            root,
            engine,
            seen: HashSet::new(),
        }
    }

    pub fn resolve(mut self) -> Vec<&'q FromClause> {
        let root = self.root;
        self.find(root)
    }

    fn find(&mut self, query: &'q Query) -> Vec<&'q FromClause> {
        let mut result: Vec<&'q FromClause> = Vec::new();
        for clause in query.get_components(Component::Cte, self.engine) {
            let ClauseKind::From(cte) = &clause.kind else {
                continue;
            };
            let Some(alias) = cte.alias() else {
                continue;
            };
            if !self.seen.insert(alias) {
                continue;
            }
            result.push(cte);
            if let FromClause::Query { query: body, .. } = cte {
                let dependencies = self.find(body);
                result.splice(0..0, dependencies);
            }
        }
        result
    }
}

/// `"alias" AS (body)`
fn compile_cte<C: Compiler + ?Sized>(c: &C, cte: &FromClause) -> ShardqlResult<Fragment> {
    match cte {
        FromClause::Query {
            query,
            alias: Some(alias),
        } => {
            let body = c.compile_select_query(query)?;
            Ok(Fragment::new(
                format!("{} AS ({})", c.wrap_value(alias), body.sql),
                body.bindings,
            ))
        }
        FromClause::Raw {
            expr,
            bindings,
            alias: Some(alias),
        } => Ok(Fragment::new(
            format!("{} AS ({})", c.wrap_value(alias), expr),
            bindings.to_vec(),
        )),
        _ => Err(ShardqlError::invalid_state("a CTE must have an alias and a body")),
    }
}

/// Prefix `statement` with `WITH ...` when the query declares CTEs.
pub fn prepend_ctes<C: Compiler + ?Sized>(
    c: &C,
    query: &Query,
    statement: Fragment,
) -> ShardqlResult<Fragment> {
    let ctes = CteResolver::new(query, c.engine()).resolve();
    if ctes.is_empty() {
        return Ok(statement);
    }

    let mut definitions = Vec::with_capacity(ctes.len());
    let mut bindings = Vec::new();
    for cte in ctes {
        let compiled = compile_cte(c, cte)?;
        definitions.push(compiled.sql);
        bindings.extend(compiled.bindings);
    }
    bindings.extend(statement.bindings);

    Ok(Fragment::new(
        format!("WITH {} {}", definitions.join(", "), statement.sql),
        bindings,
    ))
}
