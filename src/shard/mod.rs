//! Sharded tables: a family of same-shaped physical tables read as one
//! logical table.
//!
//! - [`counter`]: cached per-table row counts with `UNCOUNTED`/`DYNAMIC` sentinels
//! - [`directory`]: table discovery, filtering and walk order
//! - [`paginate`]: total counts and cross-table pages

pub mod counter;
pub mod directory;
pub mod paginate;

pub use counter::{DYNAMIC, ShardCounts, UNCOUNTED};
pub use directory::{ShardedTable, TableFilter};
pub use paginate::ShardQuery;
