//! Positional-to-named parameter binding.

use super::context::{NamedBindings, SqlResult};
use crate::ast::Value;

/// Rename the i-th `?` of `raw_sql` to `{prefix}{i}` and map `p{i}` to the
/// i-th binding.
///
/// The scan is purely textual: a `?` inside a quoted literal is renamed too.
pub fn bind(raw_sql: String, bindings: Vec<Value>, prefix: &str) -> SqlResult {
    let mut sql = String::with_capacity(raw_sql.len() + bindings.len() * prefix.len());
    let mut index = 0usize;
    for ch in raw_sql.chars() {
        if ch == '?' {
            sql.push_str(&format!("{}{}", prefix, index));
            index += 1;
        } else {
            sql.push(ch);
        }
    }

    let named_bindings: NamedBindings = bindings
        .iter()
        .enumerate()
        .map(|(i, value)| (format!("p{}", i), value.clone()))
        .collect();

    SqlResult {
        raw_sql,
        sql,
        bindings,
        named_bindings,
    }
}
