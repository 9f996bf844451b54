use super::super::dialect::Dialect;
use super::super::traits::Compiler;

pub struct MySqlCompiler;

impl Compiler for MySqlCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn opening_identifier(&self) -> &'static str {
        "`"
    }

    fn closing_identifier(&self) -> &'static str {
        "`"
    }

    fn last_id(&self) -> Option<&'static str> {
        Some("SELECT last_insert_id() as Id")
    }

    fn compile_random(&self, seed: Option<&str>) -> String {
        format!("RAND({})", seed.unwrap_or(""))
    }
}
