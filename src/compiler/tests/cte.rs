use pretty_assertions::assert_eq;

use super::{bindings, sql};
use crate::ast::{FromClause, Query, Value};
use crate::compiler::{CteResolver, Dialect};
use crate::error::ShardqlError;

fn aliases(ctes: &[&FromClause]) -> Vec<String> {
    ctes.iter()
        .filter_map(|cte| cte.alias())
        .map(str::to_string)
        .collect()
}

/// `c` depends on `b`, which depends on `a`.
fn chained() -> Query {
    let a = Query::table("users").alias("a");
    let b = Query::table("a").with(a).unwrap().alias("b");
    let c = Query::table("b").with(b).unwrap().alias("c");
    Query::table("c").with(c).unwrap()
}

#[test]
fn test_dependencies_come_first() {
    let q = chained();
    let ctes = CteResolver::new(&q, None).resolve();
    assert_eq!(aliases(&ctes), vec!["a", "b", "c"]);
}

#[test]
fn test_resolution_is_repeatable() {
    let q = chained();
    let first = aliases(&CteResolver::new(&q, None).resolve());
    let second = aliases(&CteResolver::new(&q, None).resolve());
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_alias_keeps_first() {
    let q = Query::table("x")
        .with(Query::table("users").alias("x"))
        .unwrap()
        .with(Query::table("admins").alias("x"))
        .unwrap();
    let ctes = CteResolver::new(&q, None).resolve();
    assert_eq!(aliases(&ctes), vec!["x"]);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "WITH \"x\" AS (SELECT * FROM \"users\") SELECT * FROM \"x\""
    );
}

#[test]
fn test_with_preamble() {
    let a = Query::table("users").alias("a");
    let b = Query::table("a").with(a).unwrap().alias("b");
    let q = Query::table("b").with(b).unwrap();
    assert_eq!(
        sql(&q, Dialect::Generic),
        "WITH \"a\" AS (SELECT * FROM \"users\"), \"b\" AS (SELECT * FROM \"a\") SELECT * FROM \"b\""
    );
}

#[test]
fn test_cte_bindings_come_first() {
    let q = Query::table("x")
        .with_raw("x", "SELECT ? AS n", vec![Value::from(1)])
        .unwrap()
        .where_("n", "=", 2);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "WITH \"x\" AS (SELECT ? AS n) SELECT * FROM \"x\" WHERE \"n\" = ?"
    );
    assert_eq!(bindings(&q, Dialect::Generic), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_preamble_outside_pagination() {
    let q = Query::table("a")
        .with(Query::table("users").alias("a"))
        .unwrap()
        .limit(5);
    assert_eq!(
        sql(&q, Dialect::SqlServer),
        "WITH [a] AS (SELECT * FROM [users]) SELECT TOP (?) * FROM [a]"
    );
    assert_eq!(
        sql(&q, Dialect::Oracle),
        "WITH \"a\" AS (SELECT * FROM \"users\") SELECT * FROM (SELECT * FROM \"a\") WHERE ROWNUM <= ?"
    );
}

#[test]
fn test_engine_scoped_cte() {
    let q = Query::table("a").for_postgres(|q| q.with(Query::table("users").alias("a")).unwrap());
    assert!(sql(&q, Dialect::Postgres).starts_with("WITH \"a\" AS"));
    assert_eq!(sql(&q, Dialect::MySql), "SELECT * FROM `a`");
}

#[test]
fn test_cte_without_alias_rejected() {
    let err = Query::table("x").with(Query::table("users")).unwrap_err();
    assert!(matches!(err, ShardqlError::InvalidState(_)));

    let err = Query::table("x").with_raw("  ", "SELECT 1", vec![]).unwrap_err();
    assert!(matches!(err, ShardqlError::InvalidState(_)));
}
