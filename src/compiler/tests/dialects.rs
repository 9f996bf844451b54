//! Per-dialect pagination, quoting and literal tests.

use pretty_assertions::assert_eq;

use super::{bindings, sql};
use crate::ast::{Query, Value};
use crate::compiler::sql::oracle::OracleCompiler;
use crate::compiler::{Compiler, Dialect, SqlServerCompiler};
use crate::error::ShardqlError;

fn users() -> Query {
    Query::table("users")
}

#[test]
fn test_limit_only_every_dialect() {
    let q = users().limit(10);
    let expected = [
        (Dialect::Generic, "SELECT * FROM \"users\" LIMIT ?"),
        (Dialect::MySql, "SELECT * FROM `users` LIMIT ?"),
        (Dialect::Postgres, "SELECT * FROM \"users\" LIMIT ?"),
        (Dialect::SqlServer, "SELECT TOP (?) * FROM [users]"),
        (Dialect::Oracle, "SELECT * FROM (SELECT * FROM \"users\") WHERE ROWNUM <= ?"),
        (Dialect::Firebird, "SELECT FIRST ? * FROM \"USERS\""),
    ];
    for (dialect, sql_text) in expected {
        assert_eq!(sql(&q, dialect), sql_text, "dialect {}", dialect);
        assert_eq!(bindings(&q, dialect), vec![Value::Int(10)], "dialect {}", dialect);
    }
}

#[test]
fn test_generic_offset_only_uses_max_limit() {
    let q = users().offset(5);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT * FROM \"users\" LIMIT 18446744073709551615 OFFSET ?"
    );
    assert_eq!(bindings(&q, Dialect::Generic), vec![Value::Int(5)]);
}

#[test]
fn test_mysql_limit_offset() {
    let q = users().limit(10).offset(5);
    assert_eq!(sql(&q, Dialect::MySql), "SELECT * FROM `users` LIMIT ? OFFSET ?");
    assert_eq!(bindings(&q, Dialect::MySql), vec![Value::Int(10), Value::Int(5)]);
}

#[test]
fn test_postgres_named_parameters() {
    let q = users().where_("id", "=", 1).limit(10).offset(5);
    let result = Dialect::Postgres.compiler().compile(&q).unwrap();
    assert_eq!(
        result.sql,
        "SELECT * FROM \"users\" WHERE \"id\" = @p0 LIMIT @p1 OFFSET @p2"
    );
}

#[test]
fn test_sqlserver_top_after_where_bindings() {
    let q = users().where_("a", "=", 1).limit(10);
    assert_eq!(sql(&q, Dialect::SqlServer), "SELECT TOP (?) * FROM [users] WHERE [a] = ?");
    assert_eq!(
        bindings(&q, Dialect::SqlServer),
        vec![Value::Int(10), Value::Int(1)]
    );
}

#[test]
fn test_sqlserver_distinct_top() {
    let q = users().distinct().select(["city"]).limit(3);
    assert_eq!(sql(&q, Dialect::SqlServer), "SELECT DISTINCT TOP (?) [city] FROM [users]");
}

#[test]
fn test_sqlserver_offset_only() {
    let q = users().offset(5);
    assert_eq!(
        sql(&q, Dialect::SqlServer),
        "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS [row_num] \
         FROM [users]) AS [results_wrapper] WHERE [row_num] >= ?"
    );
    assert_eq!(bindings(&q, Dialect::SqlServer), vec![Value::Int(6)]);
}

#[test]
fn test_sqlserver_limit_offset_keeps_order_in_window() {
    let q = users().order_by(["name"]).limit(10).offset(20);
    assert_eq!(
        sql(&q, Dialect::SqlServer),
        "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY [name]) AS [row_num] \
         FROM [users]) AS [results_wrapper] WHERE [row_num] BETWEEN ? AND ?"
    );
    assert_eq!(
        bindings(&q, Dialect::SqlServer),
        vec![Value::Int(21), Value::Int(30)]
    );
}

#[test]
fn test_sqlserver_native_pagination() {
    let compiler = SqlServerCompiler::new(false);

    let q = users().limit(10).offset(20);
    let result = compiler.compile(&q).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM [users] ORDER BY (SELECT 0) OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
    );
    assert_eq!(result.bindings, vec![Value::Int(20), Value::Int(10)]);

    let q = users().order_by(["id"]).offset(20);
    let result = compiler.compile(&q).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM [users] ORDER BY [id] OFFSET ? ROWS");
    assert_eq!(result.bindings, vec![Value::Int(20)]);

    let q = users().limit(10);
    let result = compiler.compile(&q).unwrap();
    assert_eq!(result.bindings, vec![Value::Int(0), Value::Int(10)]);
}

#[test]
fn test_oracle_offset_only() {
    let q = users().offset(5);
    assert_eq!(
        sql(&q, Dialect::Oracle),
        "SELECT * FROM (SELECT \"results_wrapper\".*, ROWNUM \"row_num\" \
         FROM (SELECT * FROM \"users\") \"results_wrapper\") WHERE \"row_num\" > ?"
    );
    assert_eq!(bindings(&q, Dialect::Oracle), vec![Value::Int(5)]);
}

#[test]
fn test_oracle_limit_offset() {
    let q = users().limit(10).offset(5);
    assert_eq!(
        sql(&q, Dialect::Oracle),
        "SELECT * FROM (SELECT \"results_wrapper\".*, ROWNUM \"row_num\" \
         FROM (SELECT * FROM \"users\") \"results_wrapper\" WHERE ROWNUM <= ?) WHERE \"row_num\" > ?"
    );
    assert_eq!(bindings(&q, Dialect::Oracle), vec![Value::Int(15), Value::Int(5)]);
}

#[test]
fn test_oracle_named_parameters() {
    let q = users().limit(10);
    let result = Dialect::Oracle.compiler().compile(&q).unwrap();
    assert_eq!(result.sql, "SELECT * FROM (SELECT * FROM \"users\") WHERE ROWNUM <= :p0");
}

#[test]
fn test_oracle_native_limit_unsupported() {
    let q = users().limit(10);
    let err = OracleCompiler.compile_limit(&q, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, ShardqlError::Unsupported(_)));
}

#[test]
fn test_oracle_aliases_without_as() {
    let q = Query::table("users as u").select(["u.name as n"]);
    assert_eq!(sql(&q, Dialect::Oracle), "SELECT \"u\".\"name\" \"n\" FROM \"users\" \"u\"");
}

#[test]
fn test_firebird_pagination() {
    let q = users().offset(5);
    assert_eq!(sql(&q, Dialect::Firebird), "SELECT SKIP ? * FROM \"USERS\"");

    let q = users().limit(10).offset(5);
    assert_eq!(sql(&q, Dialect::Firebird), "SELECT * FROM \"USERS\" ROWS ? TO ?");
    assert_eq!(bindings(&q, Dialect::Firebird), vec![Value::Int(6), Value::Int(15)]);

    let q = users().where_("id", ">", 3).limit(10);
    assert_eq!(sql(&q, Dialect::Firebird), "SELECT FIRST ? * FROM \"USERS\" WHERE \"ID\" > ?");
    assert_eq!(bindings(&q, Dialect::Firebird), vec![Value::Int(10), Value::Int(3)]);
}

#[test]
fn test_boolean_literals() {
    let q = Query::table("t").where_true("active").where_false("deleted");
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT * FROM \"t\" WHERE \"active\" = true AND \"deleted\" = false"
    );
    assert_eq!(
        sql(&q, Dialect::SqlServer),
        "SELECT * FROM [t] WHERE [active] = CAST(1 AS BIT) AND [deleted] = CAST(0 AS BIT)"
    );
    assert_eq!(
        sql(&q, Dialect::Oracle),
        "SELECT * FROM \"t\" WHERE \"active\" = 1 AND \"deleted\" = 0"
    );
}

#[test]
fn test_date_parts() {
    let year = Query::table("t").where_year("created", "=", 2024);
    assert_eq!(sql(&year, Dialect::Generic), "SELECT * FROM \"t\" WHERE YEAR(\"created\") = ?");
    assert_eq!(sql(&year, Dialect::MySql), "SELECT * FROM `t` WHERE YEAR(`created`) = ?");
    assert_eq!(
        sql(&year, Dialect::Postgres),
        "SELECT * FROM \"t\" WHERE DATE_PART('YEAR', \"created\") = ?"
    );
    assert_eq!(
        sql(&year, Dialect::SqlServer),
        "SELECT * FROM [t] WHERE DATEPART(YEAR, [created]) = ?"
    );
    assert_eq!(
        sql(&year, Dialect::Oracle),
        "SELECT * FROM \"t\" WHERE EXTRACT(YEAR FROM \"created\") = ?"
    );
    assert_eq!(
        sql(&year, Dialect::Firebird),
        "SELECT * FROM \"T\" WHERE EXTRACT(YEAR FROM \"CREATED\") = ?"
    );

    let date = Query::table("t").where_date("created", "=", "2024-01-31");
    assert_eq!(sql(&date, Dialect::Postgres), "SELECT * FROM \"t\" WHERE \"created\"::date = ?");
    assert_eq!(
        sql(&date, Dialect::SqlServer),
        "SELECT * FROM [t] WHERE CAST([created] AS DATE) = ?"
    );
    assert_eq!(sql(&date, Dialect::Oracle), "SELECT * FROM \"t\" WHERE TRUNC(\"created\") = ?");
}

#[test]
fn test_multi_row_insert_oracle() {
    let q = Query::table("t")
        .as_insert_rows(
            ["a", "b"],
            vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]],
        )
        .unwrap();
    assert_eq!(
        sql(&q, Dialect::Oracle),
        "INSERT ALL INTO \"t\" (\"a\", \"b\") VALUES (?, ?) INTO \"t\" (\"a\", \"b\") VALUES (?, ?) \
         SELECT 1 FROM DUAL"
    );
    assert_eq!(
        bindings(&q, Dialect::Oracle),
        vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
    );
}

#[test]
fn test_multi_row_insert_firebird() {
    let q = Query::table("t")
        .as_insert_rows(
            ["a", "b"],
            vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]],
        )
        .unwrap();
    assert_eq!(
        sql(&q, Dialect::Firebird),
        "INSERT INTO \"T\" (\"A\", \"B\") SELECT ?, ? FROM RDB$DATABASE \
         UNION ALL SELECT ?, ? FROM RDB$DATABASE"
    );
}

#[test]
fn test_engine_scoped_limit() {
    let mysql_only = users().for_mysql(|q| q.limit(5));
    assert_eq!(sql(&mysql_only, Dialect::MySql), "SELECT * FROM `users` LIMIT ?");
    assert_eq!(sql(&mysql_only, Dialect::SqlServer), "SELECT * FROM [users]");

    let sqlsrv_only = users().for_sqlserver(|q| q.limit(5));
    assert_eq!(sql(&sqlsrv_only, Dialect::MySql), "SELECT * FROM `users`");
    assert_eq!(sql(&sqlsrv_only, Dialect::SqlServer), "SELECT TOP (?) * FROM [users]");
}

#[test]
fn test_engine_scoped_limit_overrides_unscoped() {
    let q = users().limit(10).for_postgres(|q| q.limit(3));
    assert_eq!(bindings(&q, Dialect::Postgres), vec![Value::Int(3)]);
    assert_eq!(bindings(&q, Dialect::MySql), vec![Value::Int(10)]);
}

#[test]
fn test_clone_compiles_identically() {
    let q = users()
        .select(["id", "name"])
        .where_("age", ">", 21)
        .order_by(["name"])
        .limit(10)
        .offset(20);
    let copy = q.clone();
    for dialect in Dialect::ALL {
        let compiler = dialect.compiler();
        assert_eq!(
            compiler.compile(&q).unwrap(),
            compiler.compile(&copy).unwrap(),
            "dialect {}",
            dialect
        );
    }
}

#[test]
fn test_huge_limit_saturates() {
    let q = users().limit(u64::MAX).offset(5);
    let max = Value::Int(i64::MAX);

    assert_eq!(bindings(&q, Dialect::Generic), vec![max.clone(), Value::Int(5)]);
    assert_eq!(bindings(&q, Dialect::MySql), vec![max.clone(), Value::Int(5)]);
    assert_eq!(bindings(&q, Dialect::SqlServer), vec![Value::Int(6), max.clone()]);
    assert_eq!(bindings(&q, Dialect::Oracle), vec![max.clone(), Value::Int(5)]);
    assert_eq!(bindings(&q, Dialect::Firebird), vec![Value::Int(6), max.clone()]);

    let q = users().limit(10).offset(u64::MAX);
    assert_eq!(bindings(&q, Dialect::SqlServer), vec![max.clone(), max.clone()]);
    assert_eq!(bindings(&q, Dialect::Firebird), vec![max.clone(), max.clone()]);
    assert_eq!(bindings(&q, Dialect::Oracle), vec![max.clone(), max]);
}
