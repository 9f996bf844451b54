//! shardql configuration
//!
//! Loaded from `<config dir>/shardql/config.toml` when present. Every field has
//! a default, so an empty file is valid.
//!
//! ```toml
//! database_url = "postgres://localhost/app"
//! dialect = "postgres"
//! log_sql = true
//! page_size = 50
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compiler::{Compiler, Dialect, SqlServerCompiler};
use crate::error::{ShardqlError, ShardqlResult};

/// Environment variable overriding `database_url`.
pub const DATABASE_URL_ENV: &str = "SHARDQL_DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardqlConfig {
    /// Database connection URL
    pub database_url: Option<String>,

    /// Dialect used to compile queries (`generic`, `mysql`, `postgres`,
    /// `sqlsrv`, `oracle11g`, `firebird`)
    pub dialect: Dialect,

    /// SQL Server: emulate pagination with `TOP` and `ROW_NUMBER()`
    pub sqlserver_legacy_pagination: bool,

    /// Log every compiled statement through `tracing`
    pub log_sql: bool,

    /// Page size used by `paginate_default`
    pub page_size: i64,
}

impl Default for ShardqlConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            dialect: Dialect::Generic,
            sqlserver_legacy_pagination: true,
            log_sql: false,
            page_size: 100,
        }
    }
}

impl ShardqlConfig {
    pub fn builder() -> ShardqlConfigBuilder {
        ShardqlConfigBuilder::default()
    }

    /// `<config dir>/shardql/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shardql").join("config.toml"))
    }

    pub fn from_toml(content: &str) -> ShardqlResult<Self> {
        let config: ShardqlConfig =
            toml::from_str(content).map_err(|e| ShardqlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, then apply the environment override.
    pub fn load_from(path: impl AsRef<Path>) -> ShardqlResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load the default file if it exists, else defaults; the environment
    /// override applies either way.
    pub fn load() -> ShardqlResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(path),
            _ => {
                let mut config = Self::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.database_url = Some(url);
            }
        }
    }

    pub fn validate(&self) -> ShardqlResult<()> {
        if self.page_size <= 0 {
            return Err(ShardqlError::Config(format!(
                "page_size must be greater than 0, got {}",
                self.page_size
            )));
        }
        Ok(())
    }

    /// Compiler for the configured dialect.
    pub fn compiler(&self) -> Box<dyn Compiler> {
        match self.dialect {
            Dialect::SqlServer => Box::new(SqlServerCompiler::new(self.sqlserver_legacy_pagination)),
            other => other.compiler(),
        }
    }
}

/// Builder for ShardqlConfig
#[derive(Debug, Default)]
pub struct ShardqlConfigBuilder {
    config: ShardqlConfig,
}

impl ShardqlConfigBuilder {
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    pub fn sqlserver_legacy_pagination(mut self, enabled: bool) -> Self {
        self.config.sqlserver_legacy_pagination = enabled;
        self
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.config.log_sql = enabled;
        self
    }

    pub fn page_size(mut self, size: i64) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn build(self) -> ShardqlResult<ShardqlConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
