//! Clause model and query AST.

pub mod clause;
pub mod conditions;
pub mod query;
pub mod values;

pub use clause::*;
pub use conditions::*;
pub use query::*;
pub use values::*;
