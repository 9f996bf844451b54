//! Shard directory: the physical tables behind one logical table.
//!
//! `Unloaded -> Loaded(tables, counts)`. Loading lists tables by name prefix
//! through a [`SchemaSource`] (via the shared [`TableNameCache`]), keeps the
//! ones accepted by the filter and seeds their counts.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::info;

use super::counter::ShardCounts;
use crate::error::ShardqlResult;
use crate::schema::{SchemaSource, TableNameCache};

/// Accepts `(table_name, owning_db)`.
pub type TableFilter = Arc<dyn Fn(&str, Option<&str>) -> bool + Send + Sync>;

pub struct ShardedTable {
    prefix: String,
    db_name: Option<String>,
    filter: Option<TableFilter>,
    descending: AtomicBool,
    /// Ascending by name; `None` until loaded.
    tables: RwLock<Option<Vec<String>>>,
    counts: ShardCounts,
}

impl fmt::Debug for ShardedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedTable")
            .field("prefix", &self.prefix)
            .field("db_name", &self.db_name)
            .field("filtered", &self.filter.is_some())
            .field("descending", &self.is_descending())
            .field("tables", &*self.tables.read())
            .finish()
    }
}

impl ShardedTable {
    /// Tables whose names start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            db_name: None,
            filter: None,
            descending: AtomicBool::new(false),
            tables: RwLock::new(None),
            counts: ShardCounts::new(),
        }
    }

    /// Only list tables of this database or schema.
    pub fn in_database(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = Some(db_name.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Fn(&str, Option<&str>) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn db_name(&self) -> Option<&str> {
        self.db_name.as_deref()
    }

    /// Walk tables in descending name order. Sticky until changed.
    pub fn set_descending(&self, descending: bool) {
        self.descending.store(descending, Ordering::Relaxed);
    }

    pub fn is_descending(&self) -> bool {
        self.descending.load(Ordering::Relaxed)
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.read().is_some()
    }

    pub fn counts(&self) -> &ShardCounts {
        &self.counts
    }

    /// Loaded tables in walk order; empty while unloaded.
    pub fn tables(&self) -> Vec<String> {
        let mut tables = self.tables.read().clone().unwrap_or_default();
        if self.is_descending() {
            tables.reverse();
        }
        tables
    }

    /// Load on first use, or again when `reload` is set. Returns the tables
    /// in walk order.
    pub async fn load<S: SchemaSource>(
        &self,
        source: &S,
        cache: &TableNameCache,
        reload: bool,
    ) -> ShardqlResult<Vec<String>> {
        if !reload && self.is_loaded() {
            return Ok(self.tables());
        }

        let listed = cache
            .get_or_load(source, &self.prefix, self.db_name.as_deref(), reload)
            .await?;
        let mut names: Vec<String> = listed
            .iter()
            .filter(|info| info.table_name.starts_with(&self.prefix))
            .filter(|info| match &self.filter {
                Some(filter) => filter(&info.table_name, info.owning_db.as_deref()),
                None => true,
            })
            .map(|info| info.table_name.clone())
            .collect();
        names.sort();
        names.dedup();

        self.counts.seed(&names);
        info!(
            target: "shardql::shard",
            prefix = %self.prefix,
            tables = names.len(),
            descending = self.is_descending(),
            reload,
            "shard directory loaded"
        );
        *self.tables.write() = Some(names);
        Ok(self.tables())
    }

    /// Drop the loaded list; the next [`load`](Self::load) lists again.
    pub fn unload(&self) {
        *self.tables.write() = None;
    }
}
