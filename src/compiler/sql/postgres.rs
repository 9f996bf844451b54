use super::super::dialect::Dialect;
use super::super::traits::Compiler;
use crate::ast::DatePart;

pub struct PostgresCompiler;

impl Compiler for PostgresCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn last_id(&self) -> Option<&'static str> {
        Some("SELECT lastval()")
    }

    fn compile_date_part(&self, part: DatePart, column: &str) -> String {
        match part {
            DatePart::Date => format!("{}::date", column),
            DatePart::Time => format!("{}::time", column),
            other => format!("DATE_PART('{}', {})", other.upper(), column),
        }
    }
}
