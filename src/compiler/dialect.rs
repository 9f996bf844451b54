use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::sql::firebird::FirebirdCompiler;
use super::sql::generic::GenericCompiler;
use super::sql::mysql::MySqlCompiler;
use super::sql::oracle::OracleCompiler;
use super::sql::postgres::PostgresCompiler;
use super::sql::sqlserver::SqlServerCompiler;
use super::traits::Compiler;
use crate::error::ShardqlError;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "generic")]
    Generic,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "postgres", alias = "pgsql", alias = "postgresql")]
    Postgres,
    #[serde(rename = "sqlsrv", alias = "sqlserver", alias = "mssql")]
    SqlServer,
    /// Oracle 11g: pagination through `ROWNUM` wrapping.
    #[serde(rename = "oracle11g", alias = "oracle")]
    Oracle,
    #[serde(rename = "firebird")]
    Firebird,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::Generic,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::SqlServer,
        Dialect::Oracle,
        Dialect::Firebird,
    ];

    /// Engine code used to scope clauses.
    pub fn code(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::SqlServer => "sqlsrv",
            Dialect::Oracle => "oracle11g",
            Dialect::Firebird => "firebird",
        }
    }

    /// Default compiler for this dialect.
    pub fn compiler(&self) -> Box<dyn Compiler> {
        match self {
            Dialect::Generic => Box::new(GenericCompiler),
            Dialect::MySql => Box::new(MySqlCompiler),
            Dialect::Postgres => Box::new(PostgresCompiler),
            Dialect::SqlServer => Box::new(SqlServerCompiler::default()),
            Dialect::Oracle => Box::new(OracleCompiler),
            Dialect::Firebird => Box::new(FirebirdCompiler),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Dialect {
    type Err = ShardqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" | "default" => Ok(Dialect::Generic),
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pgsql" => Ok(Dialect::Postgres),
            "sqlsrv" | "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "oracle11g" | "oracle" => Ok(Dialect::Oracle),
            "firebird" => Ok(Dialect::Firebird),
            other => Err(ShardqlError::invalid_argument(format!(
                "unknown dialect '{}'",
                other
            ))),
        }
    }
}
