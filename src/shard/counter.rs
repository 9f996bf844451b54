//! Per-table row-count cache with sentinel states.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Not counted yet; the first count is cached.
pub const UNCOUNTED: i64 = -1;
/// Never cached; every count query runs again.
pub const DYNAMIC: i64 = -2;

/// Physical table name to row count, [`UNCOUNTED`] or [`DYNAMIC`].
#[derive(Debug, Default)]
pub struct ShardCounts {
    counts: DashMap<String, i64>,
}

impl ShardCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tables` after a (re)load and drop every other entry.
    /// New tables start [`UNCOUNTED`]; known entries keep their value.
    pub fn seed<I, S>(&self, tables: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tables: Vec<String> = tables.into_iter().map(|t| t.as_ref().to_string()).collect();
        self.counts.retain(|name, _| tables.contains(name));
        for table in tables {
            self.counts.entry(table).or_insert(UNCOUNTED);
        }
    }

    /// Forget materialized counts. [`DYNAMIC`] marks survive.
    pub fn reset(&self) {
        for mut entry in self.counts.iter_mut() {
            if *entry.value() != DYNAMIC {
                *entry.value_mut() = UNCOUNTED;
            }
        }
    }

    /// Cached value, [`UNCOUNTED`] for an unknown table.
    pub fn get(&self, table: &str) -> i64 {
        self.counts.get(table).map(|count| *count).unwrap_or(UNCOUNTED)
    }

    pub fn set(&self, table: impl Into<String>, count: i64) {
        self.counts.insert(table.into(), count);
    }

    /// Store `count` only if the table is unknown or still [`UNCOUNTED`].
    /// Returns whether it was stored.
    pub fn set_if_uncounted(&self, table: &str, count: i64) -> bool {
        match self.counts.entry(table.to_string()) {
            Entry::Occupied(mut entry) if *entry.get() == UNCOUNTED => {
                entry.insert(count);
                true
            }
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(count);
                true
            }
        }
    }

    /// Provide a known count so no count query runs for `table`.
    pub fn prime(&self, table: impl Into<String>, count: u64) {
        self.set(table, i64::try_from(count).unwrap_or(i64::MAX));
    }

    pub fn mark_dynamic(&self, table: impl Into<String>) {
        self.set(table, DYNAMIC);
    }

    pub fn contains(&self, table: &str) -> bool {
        self.counts.contains_key(table)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.counts.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
