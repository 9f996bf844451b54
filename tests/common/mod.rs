//! In-memory database shared by the integration tests.
//!
//! Every table holds `count` synthetic rows `{"table": name, "n": i}`. The
//! mock reads the table from the first quoted `FROM` target and the page
//! window from the `LIMIT @pN` / `OFFSET @pN` tokens of the statement it
//! receives.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use shardql::compiler::NamedBindings;
use shardql::engine::{Executor, Row};
use shardql::error::ShardqlResult;
use shardql::schema::{ColumnInfo, SchemaSource, TableInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Rows,
    Scalar,
    Execute,
}

#[derive(Debug, Clone)]
pub struct Statement {
    pub kind: Kind,
    pub sql: String,
    pub bindings: NamedBindings,
}

impl Statement {
    /// Integer bound to `@pN` for index `n`.
    pub fn binding(&self, n: usize) -> Option<i64> {
        self.bindings.get(&format!("p{}", n)).and_then(|v| v.as_i64())
    }
}

#[derive(Default)]
pub struct MockDb {
    tables: Mutex<BTreeMap<String, i64>>,
    statements: Mutex<Vec<Statement>>,
    schema_calls: AtomicUsize,
}

impl MockDb {
    pub fn with_tables(tables: &[(&str, i64)]) -> Self {
        let db = Self::default();
        for (name, count) in tables {
            db.set_table(name, *count);
        }
        db
    }

    pub fn set_table(&self, name: &str, count: i64) {
        self.tables.lock().insert(name.to_string(), count);
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().clone()
    }

    pub fn of_kind(&self, kind: Kind) -> Vec<Statement> {
        self.statements().into_iter().filter(|s| s.kind == kind).collect()
    }

    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }

    fn record(&self, kind: Kind, sql: &str, bindings: &NamedBindings) {
        self.statements.lock().push(Statement {
            kind,
            sql: sql.to_string(),
            bindings: bindings.clone(),
        });
    }

    fn rows_in(&self, sql: &str) -> i64 {
        table_of(sql)
            .and_then(|table| self.tables.lock().get(&table).copied())
            .unwrap_or(0)
    }
}

/// First quoted table after a `FROM`.
fn table_of(sql: &str) -> Option<String> {
    sql.match_indices("FROM ").find_map(|(at, from)| {
        let start = at + from.len();
        let quote = sql[start..].chars().next().filter(|c| *c == '"' || *c == '`')?;
        let rest = &sql[start + 1..];
        rest.find(quote).map(|len| rest[..len].to_string())
    })
}

fn token_value(sql: &str, keyword: &str, bindings: &NamedBindings) -> Option<i64> {
    let needle = format!("{} @p", keyword);
    let start = sql.find(&needle)? + needle.len();
    let digits: String = sql[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    bindings.get(&format!("p{}", digits)).and_then(|v| v.as_i64())
}

impl Executor for MockDb {
    async fn fetch_all(&self, sql: &str, bindings: &NamedBindings) -> ShardqlResult<Vec<Row>> {
        self.record(Kind::Rows, sql, bindings);
        let total = self.rows_in(sql);
        let offset = token_value(sql, "OFFSET", bindings).unwrap_or(0);
        let limit = token_value(sql, "LIMIT", bindings).unwrap_or(total);
        let table = table_of(sql).unwrap_or_default();

        Ok((offset..(offset + limit).min(total))
            .map(|n| {
                let mut row = Row::new();
                row.insert("table".to_string(), serde_json::json!(table));
                row.insert("n".to_string(), serde_json::json!(n));
                row
            })
            .collect())
    }

    async fn fetch_scalar(&self, sql: &str, bindings: &NamedBindings) -> ShardqlResult<i64> {
        self.record(Kind::Scalar, sql, bindings);
        Ok(self.rows_in(sql))
    }

    async fn execute(&self, sql: &str, bindings: &NamedBindings) -> ShardqlResult<u64> {
        self.record(Kind::Execute, sql, bindings);
        Ok(1)
    }
}

impl SchemaSource for MockDb {
    async fn list_tables(&self, prefix: &str, db_name: Option<&str>) -> ShardqlResult<Vec<TableInfo>> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        // Newest first, so callers cannot rely on the listing order.
        Ok(self
            .tables
            .lock()
            .keys()
            .rev()
            .filter(|name| name.starts_with(prefix))
            .map(|name| {
                let info = TableInfo::new(name.as_str());
                match db_name {
                    Some(db) => info.in_db(db),
                    None => info,
                }
            })
            .collect())
    }

    async fn list_columns(&self, _table_name: &str, _db_name: Option<&str>) -> ShardqlResult<Vec<ColumnInfo>> {
        Ok(Vec::new())
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rows_summary(rows: &[Row]) -> Vec<(String, i64)> {
    rows.iter()
        .map(|row| {
            (
                row["table"].as_str().unwrap_or_default().to_string(),
                row["n"].as_i64().unwrap_or(-1),
            )
        })
        .collect()
}
