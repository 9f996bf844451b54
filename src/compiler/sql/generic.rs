use super::super::dialect::Dialect;
use super::super::traits::Compiler;

/// SQL-92-ish default dialect.
pub struct GenericCompiler;

impl Compiler for GenericCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }
}
