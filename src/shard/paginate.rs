//! Counting and paging across the tables of a [`ShardedTable`].

use tracing::debug;

use super::counter::UNCOUNTED;
use super::directory::ShardedTable;
use crate::ast::Query;
use crate::context::Context;
use crate::engine::{Executor, Row};
use crate::error::{ShardqlError, ShardqlResult};
use crate::schema::SchemaSource;

/// A predicate template run against every table of a [`ShardedTable`].
///
/// The template's own table is replaced per shard; its conditions, joins
/// and ordering are reused as they are.
pub struct ShardQuery<'a, X: Executor + SchemaSource> {
    context: &'a Context<X>,
    table: &'a ShardedTable,
    query: Query,
}

impl<'a, X: Executor + SchemaSource> ShardQuery<'a, X> {
    pub fn new(context: &'a Context<X>, table: &'a ShardedTable, query: Query) -> Self {
        Self { context, table, query }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn table(&self) -> &ShardedTable {
        self.table
    }

    /// Tables in walk order, loading the directory when needed.
    pub async fn tables(&self, reload: bool) -> ShardqlResult<Vec<String>> {
        self.table
            .load(self.context.executor(), self.context.table_names(), reload)
            .await
    }

    /// Rows of `table` matching the template.
    ///
    /// A cached count is returned as is. Otherwise the count query runs, and
    /// its result is cached only when the table was [`UNCOUNTED`].
    pub async fn count_table(&self, table: &str) -> ShardqlResult<i64> {
        let counts = self.table.counts();
        let cached = counts.get(table);
        if cached >= 0 {
            return Ok(cached);
        }

        debug!(target: "shardql::shard", table, dynamic = cached != UNCOUNTED, "counting shard");
        let count = self.context.count(&self.query.clone().from(table)).await?;
        if cached == UNCOUNTED {
            counts.set_if_uncounted(table, count);
        }
        Ok(count)
    }

    /// Sum of [`count_table`](Self::count_table) over every listed table.
    pub async fn count_all(&self, reload: bool) -> ShardqlResult<i64> {
        let mut total = 0;
        for table in self.tables(reload).await? {
            total += self.count_table(&table).await?;
        }
        Ok(total)
    }

    /// Rows of 1-based `page` of the tables walked as one window.
    ///
    /// Tables lying wholly before the page are skipped by their counts. The
    /// first contributing table is read from the remaining offset, later ones
    /// from their first row, until `size` rows are collected.
    pub async fn paginate(&self, page: i64, size: i64) -> ShardqlResult<Vec<Row>> {
        if page <= 0 {
            return Err(ShardqlError::invalid_argument(format!(
                "page must be >= 1, got {}",
                page
            )));
        }
        if size <= 0 {
            return Err(ShardqlError::invalid_argument(format!(
                "size must be greater than 0, got {}",
                size
            )));
        }

        let mut offset = (page - 1).saturating_mul(size);
        let mut rows: Vec<Row> = Vec::new();
        for table in self.tables(false).await? {
            let count = self.count_table(&table).await?;
            if offset >= count {
                offset -= count;
                continue;
            }

            let remaining = size - rows.len() as i64;
            debug!(target: "shardql::shard", table = %table, limit = remaining, offset, "fetching shard");
            let query = self
                .query
                .clone()
                .from(table.as_str())
                .clear_paging()
                .limit(remaining.unsigned_abs())
                .offset(offset.unsigned_abs());
            rows.extend(self.context.fetch_all(&query).await?);
            offset = 0;

            if rows.len() as i64 >= size {
                break;
            }
        }
        Ok(rows)
    }

    /// [`paginate`](Self::paginate) with the context's configured page size.
    pub async fn paginate_default(&self, page: i64) -> ShardqlResult<Vec<Row>> {
        self.paginate(page, self.context.page_size()).await
    }
}
