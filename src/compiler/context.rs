use std::collections::HashMap;

use crate::ast::Value;

/// Parameter name (`p0`, `p1`, ...) to bound value.
pub type NamedBindings = HashMap<String, Value>;

/// Partially compiled SQL with its positional bindings, in textual order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }
}

/// Output of one compile call.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    /// SQL with positional `?` placeholders.
    pub raw_sql: String,
    /// SQL with dialect-named parameter tokens.
    pub sql: String,
    pub bindings: Vec<Value>,
    pub named_bindings: NamedBindings,
}

/// Raw SQL with every placeholder replaced by its literal, for logs.
impl std::fmt::Display for SqlResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut values = self.bindings.iter();
        for ch in self.raw_sql.chars() {
            if ch != '?' {
                write!(f, "{}", ch)?;
                continue;
            }
            match values.next() {
                Some(value) => write!(f, "{}", value)?,
                None => write!(f, "?")?,
            }
        }
        Ok(())
    }
}
