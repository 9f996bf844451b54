//! Execution context: compile, log, execute.
//!
//! A [`Context`] owns the executor, the dialect compiler and the injected
//! name caches. Every statement goes through [`Context::compile`], which logs
//! the inlined SQL before the executor sees it.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{info, warn};

use crate::ast::Query;
use crate::compiler::{Compiler, SqlResult};
use crate::config::ShardqlConfig;
use crate::engine::{Executor, Row};
use crate::error::{ShardqlError, ShardqlResult};
use crate::schema::{FieldNameCache, SchemaSource, TableNameCache};
use crate::shard::{ShardQuery, ShardedTable};

/// Receives the inlined SQL of every statement before it runs.
pub type SqlSink = Arc<dyn Fn(&str) + Send + Sync>;

pub struct Context<X: Executor> {
    executor: X,
    compiler: Box<dyn Compiler>,
    table_names: Arc<TableNameCache>,
    field_names: Arc<FieldNameCache>,
    sink: Option<SqlSink>,
    log_sql: bool,
    page_size: i64,
}

impl<X: Executor> Context<X> {
    pub fn new(executor: X, compiler: Box<dyn Compiler>) -> Self {
        Self {
            executor,
            compiler,
            table_names: Arc::new(TableNameCache::new()),
            field_names: Arc::new(FieldNameCache::new()),
            sink: None,
            log_sql: false,
            page_size: ShardqlConfig::default().page_size,
        }
    }

    pub fn from_config(executor: X, config: &ShardqlConfig) -> Self {
        let mut context = Self::new(executor, config.compiler());
        context.log_sql = config.log_sql;
        context.page_size = config.page_size;
        context
    }

    /// Call `sink` with the SQL of every statement. A panicking sink is
    /// logged and otherwise ignored.
    pub fn with_logger(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Share caches with other contexts.
    pub fn with_caches(mut self, table_names: Arc<TableNameCache>, field_names: Arc<FieldNameCache>) -> Self {
        self.table_names = table_names;
        self.field_names = field_names;
        self
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    pub fn compiler(&self) -> &dyn Compiler {
        self.compiler.as_ref()
    }

    pub fn table_names(&self) -> &TableNameCache {
        &self.table_names
    }

    pub fn field_names(&self) -> &FieldNameCache {
        &self.field_names
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn compile(&self, query: &Query) -> ShardqlResult<SqlResult> {
        let result = self.compiler.compile(query)?;
        self.log(&result);
        Ok(result)
    }

    fn log(&self, result: &SqlResult) {
        if !self.log_sql && self.sink.is_none() {
            return;
        }
        let sql = result.to_string();
        if self.log_sql {
            info!(target: "shardql::sql", dialect = %self.compiler.dialect(), "{}", sql);
        }
        if let Some(sink) = &self.sink {
            if catch_unwind(AssertUnwindSafe(|| sink(&sql))).is_err() {
                warn!(target: "shardql::sql", "SQL logging sink panicked; statement still runs");
            }
        }
    }

    pub async fn fetch_all(&self, query: &Query) -> ShardqlResult<Vec<Row>> {
        let result = self.compile(query)?;
        self.executor.fetch_all(&result.sql, &result.named_bindings).await
    }

    pub async fn fetch_scalar(&self, query: &Query) -> ShardqlResult<i64> {
        let result = self.compile(query)?;
        self.executor
            .fetch_scalar(&result.sql, &result.named_bindings)
            .await
    }

    /// Run an insert, update or delete; returns the affected row count.
    pub async fn execute(&self, query: &Query) -> ShardqlResult<u64> {
        let result = self.compile(query)?;
        self.executor.execute(&result.sql, &result.named_bindings).await
    }

    /// `COUNT(*)` of the query's rows.
    pub async fn count(&self, query: &Query) -> ShardqlResult<i64> {
        let count = query.clone().as_count(Vec::<String>::new());
        self.fetch_scalar(&count).await
    }

    /// Walk `query` page by page, handing each non-empty page to `f` with its
    /// 1-based number. `f` returns `false` to stop. Returns the number of
    /// pages delivered.
    pub async fn chunk<F>(&self, query: &Query, size: i64, mut f: F) -> ShardqlResult<u64>
    where
        F: FnMut(Vec<Row>, u64) -> bool,
    {
        if size <= 0 {
            return Err(ShardqlError::invalid_argument(format!(
                "chunk size must be greater than 0, got {}",
                size
            )));
        }
        let size = size.unsigned_abs();

        let mut page = 0;
        loop {
            let rows = self
                .fetch_all(&query.clone().for_page(page + 1, size))
                .await?;
            if rows.is_empty() {
                break;
            }
            page += 1;
            let full = rows.len() as u64 == size;
            if !f(rows, page) || !full {
                break;
            }
        }
        Ok(page)
    }
}

impl<X: Executor + SchemaSource> Context<X> {
    /// Run `query` across the tables of `table`.
    pub fn sharded<'a>(&'a self, table: &'a ShardedTable, query: Query) -> ShardQuery<'a, X> {
        ShardQuery::new(self, table, query)
    }
}
