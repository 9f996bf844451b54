//! Core statement tests (generic dialect unless noted).

use pretty_assertions::assert_eq;

use super::{bindings, sql};
use crate::ast::{AggregateKind, Query, Value};
use crate::compiler::Dialect;
use crate::error::ShardqlError;

#[test]
fn test_select_columns() {
    let q = Query::table("users").select(["id", "name as n"]);
    assert_eq!(sql(&q, Dialect::Generic), "SELECT \"id\", \"name\" AS \"n\" FROM \"users\"");
}

#[test]
fn test_select_expansion() {
    let q = Query::table("users").select(["users.{id, email}"]);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT \"users\".\"id\", \"users\".\"email\" FROM \"users\""
    );
}

#[test]
fn test_select_distinct() {
    let q = Query::table("users").distinct().select(["city"]);
    assert_eq!(sql(&q, Dialect::Generic), "SELECT DISTINCT \"city\" FROM \"users\"");
}

#[test]
fn test_where_combinators() {
    let q = Query::table("users")
        .where_("age", ">", 18)
        .or()
        .where_("vip", "=", true)
        .where_not("status", "=", "banned");
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT * FROM \"users\" WHERE \"age\" > ? OR \"vip\" = ? AND NOT (\"status\" = ?)"
    );
    assert_eq!(
        bindings(&q, Dialect::Generic),
        vec![Value::Int(18), Value::Bool(true), Value::from("banned")]
    );
}

#[test]
fn test_joins() {
    let q = Query::table("orders as o")
        .join("users as u", "u.id", "=", "o.user_id")
        .left_join("refunds", "refunds.order_id", "=", "o.id");
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT * FROM \"orders\" AS \"o\" \
         INNER JOIN \"users\" AS \"u\" ON \"u\".\"id\" = \"o\".\"user_id\" \
         LEFT JOIN \"refunds\" ON \"refunds\".\"order_id\" = \"o\".\"id\""
    );
}

#[test]
fn test_cross_join() {
    let q = Query::table("a").cross_join("b");
    assert_eq!(sql(&q, Dialect::Generic), "SELECT * FROM \"a\" CROSS JOIN \"b\"");
}

#[test]
fn test_group_having_order() {
    let q = Query::table("sales")
        .select(["region"])
        .select_raw("SUM(amount) AS total", vec![])
        .group_by(["region"])
        .having_raw("SUM(amount) > ?", vec![Value::from(100)])
        .order_by_desc(["region"]);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT \"region\", SUM(amount) AS total FROM \"sales\" GROUP BY \"region\" \
         HAVING SUM(amount) > ? ORDER BY \"region\" DESC"
    );
}

#[test]
fn test_order_by_random() {
    let q = Query::table("quotes").order_by_random(None);
    assert_eq!(sql(&q, Dialect::Generic), "SELECT * FROM \"quotes\" ORDER BY RANDOM()");
    assert_eq!(sql(&q, Dialect::SqlServer), "SELECT * FROM [quotes] ORDER BY NEWID()");
    assert_eq!(
        sql(&q, Dialect::Oracle),
        "SELECT * FROM \"quotes\" ORDER BY DBMS_RANDOM.VALUE"
    );
}

#[test]
fn test_union() {
    let q = Query::table("a")
        .select(["id"])
        .union(Query::table("b").select(["id"]))
        .unwrap()
        .union_all(Query::table("c").select(["id"]))
        .unwrap();
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT \"id\" FROM \"a\" UNION SELECT \"id\" FROM \"b\" UNION ALL SELECT \"id\" FROM \"c\""
    );
}

#[test]
fn test_from_sub_query() {
    let inner = Query::table("users").where_("active", "=", true).alias("u");
    let q = Query::new().from_query(inner).select(["u.id"]);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT \"u\".\"id\" FROM (SELECT * FROM \"users\" WHERE \"active\" = ?) AS \"u\""
    );
}

#[test]
fn test_sub_query_column() {
    let orders = Query::table("orders")
        .select_raw("COUNT(*)", vec![])
        .where_columns("orders.user_id", "=", "users.id");
    let q = Query::table("users").select(["id"]).select_query(orders, "orders");
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT \"id\", (SELECT COUNT(*) FROM \"orders\" WHERE \"orders\".\"user_id\" = \"users\".\"id\") \
         AS \"orders\" FROM \"users\""
    );
}

#[test]
fn test_insert() {
    let q = Query::table("users")
        .as_insert(["name", "age"], vec![Value::from("ann"), Value::from(30)])
        .unwrap();
    assert_eq!(
        sql(&q, Dialect::Generic),
        "INSERT INTO \"users\" (\"name\", \"age\") VALUES (?, ?)"
    );
}

#[test]
fn test_insert_rows() {
    let q = Query::table("t")
        .as_insert_rows(["a"], vec![vec![Value::from(1)], vec![Value::from(2)]])
        .unwrap();
    assert_eq!(sql(&q, Dialect::Generic), "INSERT INTO \"t\" (\"a\") VALUES (?), (?)");
    assert_eq!(bindings(&q, Dialect::Generic), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_insert_from_query() {
    let source = Query::table("users").select(["id"]).where_("old", "=", true);
    let q = Query::table("archive").as_insert_query(["id"], source).unwrap();
    assert_eq!(
        sql(&q, Dialect::Generic),
        "INSERT INTO \"archive\" (\"id\") SELECT \"id\" FROM \"users\" WHERE \"old\" = ?"
    );
}

#[test]
fn test_insert_returning_id() {
    let q = Query::table("t")
        .as_insert(["a"], vec![Value::from(1)])
        .unwrap()
        .returning_id();
    assert_eq!(
        sql(&q, Dialect::MySql),
        "INSERT INTO `t` (`a`) VALUES (?);SELECT last_insert_id() as Id"
    );
    assert_eq!(
        sql(&q, Dialect::SqlServer),
        "INSERT INTO [t] ([a]) VALUES (?);SELECT scope_identity() as Id"
    );
    let err = Dialect::Oracle.compiler().compile(&q).unwrap_err();
    assert!(matches!(err, ShardqlError::Unsupported(_)));
}

#[test]
fn test_update() {
    let q = Query::table("users")
        .where_("id", "=", 1)
        .as_update(
            ["name", "hits"],
            vec![Value::from("bob"), Value::Raw("hits + 1".into())],
        )
        .unwrap();
    assert_eq!(
        sql(&q, Dialect::Generic),
        "UPDATE \"users\" SET \"name\" = ?, \"hits\" = hits + 1 WHERE \"id\" = ?"
    );
    assert_eq!(bindings(&q, Dialect::Generic), vec![Value::from("bob"), Value::Int(1)]);
}

#[test]
fn test_delete() {
    let q = Query::table("users").where_("id", "=", 1).as_delete();
    assert_eq!(sql(&q, Dialect::Generic), "DELETE FROM \"users\" WHERE \"id\" = ?");
}

#[test]
fn test_delete_with_join() {
    let q = Query::table("users as u")
        .join("bans as b", "b.user_id", "=", "u.id")
        .as_delete();
    assert_eq!(
        sql(&q, Dialect::Generic),
        "DELETE \"u\" FROM \"users\" AS \"u\" INNER JOIN \"bans\" AS \"b\" ON \"b\".\"user_id\" = \"u\".\"id\""
    );
}

#[test]
fn test_count_drops_limit_and_order() {
    let q = Query::table("users")
        .where_("active", "=", true)
        .order_by(["id"])
        .limit(5)
        .as_count(Vec::<String>::new());
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT COUNT(*) AS \"count\" FROM \"users\" WHERE \"active\" = ?"
    );
    assert_eq!(
        sql(&q, Dialect::SqlServer),
        "SELECT COUNT(*) AS [count] FROM [users] WHERE [active] = ?"
    );
}

#[test]
fn test_count_distinct_column() {
    let q = Query::table("users").distinct().as_count(["email"]);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT COUNT(DISTINCT \"email\") AS \"count\" FROM \"users\""
    );
}

#[test]
fn test_count_several_columns() {
    let q = Query::table("users").distinct().as_count(["city", "country"]);
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT COUNT(*) AS \"count\" FROM (SELECT DISTINCT \"city\", \"country\" FROM \"users\") AS \"count_query\""
    );
}

#[test]
fn test_other_aggregates() {
    let q = Query::table("t").as_avg("price");
    assert_eq!(sql(&q, Dialect::Generic), "SELECT AVG(\"price\") AS \"avg\" FROM \"t\"");
    let q = Query::table("t").as_max("price");
    assert_eq!(sql(&q, Dialect::Oracle), "SELECT MAX(\"price\") \"max\" FROM \"t\"");

    let q = Query::table("t").as_aggregate(AggregateKind::Sum, ["a", "b"]);
    let err = Dialect::Generic.compiler().compile(&q).unwrap_err();
    assert!(matches!(err, ShardqlError::InvalidArgument(_)));
}

#[test]
fn test_compile_leaves_query_untouched() {
    let q = Query::table("users").order_by(["id"]).limit(5).as_count(["*"]);
    let before = q.clauses().len();
    sql(&q, Dialect::SqlServer);
    sql(&q, Dialect::Generic);
    assert_eq!(q.clauses().len(), before);
    assert_eq!(q.get_limit(None), Some(5));
}

#[test]
fn test_unknown_operator_rejected() {
    let q = Query::table("t").where_("a", "= 1; --", 1);
    let err = Dialect::Generic.compiler().compile(&q).unwrap_err();
    assert!(matches!(err, ShardqlError::InvalidArgument(_)));
}

#[test]
fn test_display_inlines_bindings() {
    let q = Query::table("users").where_("name", "=", "O'Brien").limit(3);
    let result = Dialect::Generic.compiler().compile(&q).unwrap();
    assert_eq!(
        result.to_string(),
        "SELECT * FROM \"users\" WHERE \"name\" = 'O''Brien' LIMIT 3"
    );
}

#[test]
fn test_compile_raw() {
    let result = Dialect::Generic
        .compiler()
        .compile_raw("SELECT * FROM t WHERE a = ? AND b = ?", vec![1.into(), 2.into()]);
    assert_eq!(result.sql, "SELECT * FROM t WHERE a = @p0 AND b = @p1");
    assert_eq!(result.named_bindings["p1"], Value::Int(2));
}

#[test]
fn test_for_page_saturates() {
    let q = Query::table("users").for_page(u64::MAX, 10);
    assert_eq!(q.get_offset(None), Some(u64::MAX));
    assert_eq!(q.get_limit(None), Some(10));
}

#[test]
fn test_count_of_projection() {
    let q = Query::table("t")
        .select(["kind"])
        .distinct()
        .as_count(Vec::<String>::new());
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT COUNT(*) AS \"count\" FROM (SELECT DISTINCT \"kind\" FROM \"t\") AS \"count_query\""
    );

    let q = Query::table("t").distinct().as_count(Vec::<String>::new());
    assert_eq!(
        sql(&q, Dialect::Generic),
        "SELECT COUNT(*) AS \"count\" FROM (SELECT DISTINCT * FROM \"t\") AS \"count_query\""
    );

    let q = Query::table("t").select(["kind"]).where_("a", "=", 1).as_count(Vec::<String>::new());
    assert_eq!(
        sql(&q, Dialect::Oracle),
        "SELECT COUNT(*) \"count\" FROM (SELECT \"kind\" FROM \"t\" WHERE \"a\" = ?) \"count_query\""
    );
}
