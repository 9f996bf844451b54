//! Schema discovery collaborator and the name caches injected into a
//! [`Context`](crate::context::Context).
//!
//! Both caches are thread-safe maps; callers never lock around them.

use std::any::TypeId;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::Value;
use crate::error::ShardqlResult;

/// One physical table returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    /// Database or schema owning the table, when the source reports it.
    pub owning_db: Option<String>,
    pub row_count_hint: Option<i64>,
}

impl TableInfo {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            owning_db: None,
            row_count_hint: None,
        }
    }

    pub fn in_db(mut self, db: impl Into<String>) -> Self {
        self.owning_db = Some(db.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Table and column discovery.
pub trait SchemaSource: Send + Sync {
    /// Tables whose name starts with `prefix`, optionally restricted to `db_name`.
    fn list_tables(
        &self,
        prefix: &str,
        db_name: Option<&str>,
    ) -> impl Future<Output = ShardqlResult<Vec<TableInfo>>> + Send;

    fn list_columns(
        &self,
        table_name: &str,
        db_name: Option<&str>,
    ) -> impl Future<Output = ShardqlResult<Vec<ColumnInfo>>> + Send;
}

/// A value type whose fields can be inserted or updated as columns.
pub trait Bindable: 'static {
    /// Column names, in the order `field_values` returns them.
    fn field_names() -> Vec<String>;
    fn field_values(&self) -> Vec<Value>;
}

/// Discovered tables keyed by `(prefix, db_name)`.
#[derive(Debug, Default)]
pub struct TableNameCache {
    tables: DashMap<(String, Option<String>), Arc<[TableInfo]>>,
}

impl TableNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached listing, or a fresh one from `source` when missing or `reload` is set.
    pub async fn get_or_load<S: SchemaSource>(
        &self,
        source: &S,
        prefix: &str,
        db_name: Option<&str>,
        reload: bool,
    ) -> ShardqlResult<Arc<[TableInfo]>> {
        let key = (prefix.to_string(), db_name.map(str::to_string));
        if !reload {
            if let Some(hit) = self.tables.get(&key) {
                return Ok(Arc::clone(hit.value()));
            }
        }

        let loaded: Arc<[TableInfo]> = source.list_tables(prefix, db_name).await?.into();
        debug!(
            target: "shardql::schema",
            prefix,
            db = db_name.unwrap_or(""),
            tables = loaded.len(),
            "discovered tables"
        );
        self.tables.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn invalidate(&self, prefix: &str, db_name: Option<&str>) {
        self.tables
            .remove(&(prefix.to_string(), db_name.map(str::to_string)));
    }

    pub fn clear(&self) {
        self.tables.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Field names per [`Bindable`] type, computed once per type.
#[derive(Debug, Default)]
pub struct FieldNameCache {
    names: DashMap<TypeId, Arc<[String]>>,
}

impl FieldNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_names<T: Bindable>(&self) -> Arc<[String]> {
        let entry = self
            .names
            .entry(TypeId::of::<T>())
            .or_insert_with(|| T::field_names().into());
        Arc::clone(entry.value())
    }

    pub fn invalidate<T: Bindable>(&self) {
        self.names.remove(&TypeId::of::<T>());
    }

    pub fn clear(&self) {
        self.names.clear();
    }
}
