//! Store Configuration
//!
//! `TigerStyle`: Sensible defaults, builder pattern, explicit over implicit.
//!
//! Selects the backend behind a [`RowStore`](crate::RowStore) and carries
//! its settings.
//!
//! ## Environment Variables
//!
//! - `ROWSTORE_BACKEND` - `json`/`file`, `sql`/`mysql`, or `memory` (default: `file`)
//! - `ROWSTORE_DATA_DIR` - File backend directory (default: `data`)
//! - `DATABASE_URL` - SQL connection URL (required for `sql`)
//! - `ROWSTORE_TABLE_PREFIX` - SQL table prefix (default: `store`)
//! - `ROWSTORE_DB_MAX_CONNECTIONS` - SQL pool size (default: 10)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rowstore_core::constants::{
    FILE_DATA_DIR_DEFAULT, SQL_POOL_CONNECTIONS_COUNT_DEFAULT, SQL_POOL_CONNECTIONS_COUNT_MAX,
    SQL_TABLE_PREFIX_DEFAULT,
};

use crate::storage::{StoreError, StoreResult};

/// Backend selector variable.
pub const ENV_BACKEND: &str = "ROWSTORE_BACKEND";
/// File backend data directory variable.
pub const ENV_DATA_DIR: &str = "ROWSTORE_DATA_DIR";
/// SQL connection URL variable.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// SQL table prefix variable.
pub const ENV_TABLE_PREFIX: &str = "ROWSTORE_TABLE_PREFIX";
/// SQL pool size variable.
pub const ENV_MAX_CONNECTIONS: &str = "ROWSTORE_DB_MAX_CONNECTIONS";

// =============================================================================
// BackendKind
// =============================================================================

/// Which storage engine a store delegates to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// One JSON document per table on the local filesystem
    #[default]
    File,
    /// MySQL, one physical table per logical table
    Sql,
    /// In-process memory, for tests and local development
    Memory,
}

impl BackendKind {
    /// Canonical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sql => "sql",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(Self::File),
            "sql" | "mysql" => Ok(Self::Sql),
            "memory" => Ok(Self::Memory),
            other => Err(StoreError::config(format!(
                "unknown backend {other:?} (expected json, file, sql, mysql or memory)"
            ))),
        }
    }
}

// =============================================================================
// StoreConfig
// =============================================================================

/// Configuration for a row store.
///
/// # Example
///
/// ```rust
/// use rowstore::{BackendKind, StoreConfig};
///
/// let config = StoreConfig::default()
///     .with_backend(BackendKind::Sql)
///     .with_database_url("mysql://app@localhost/app")
///     .with_table_prefix("blog");
/// assert_eq!(config.backend.as_str(), "sql");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage engine.
    ///
    /// Default: `File`
    pub backend: BackendKind,

    /// Directory for table files (file backend).
    ///
    /// Default: `data`
    pub data_dir: PathBuf,

    /// Connection URL (SQL backend).
    pub database_url: Option<String>,

    /// Prefix for physical table names (SQL backend).
    ///
    /// Default: `store`
    pub table_prefix: String,

    /// Maximum pooled connections (SQL backend).
    ///
    /// Default: 10
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: PathBuf::from(FILE_DATA_DIR_DEFAULT),
            database_url: None,
            table_prefix: SQL_TABLE_PREFIX_DEFAULT.to_string(),
            max_connections: SQL_POOL_CONNECTIONS_COUNT_DEFAULT,
        }
    }
}

impl StoreConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `StoreError::Config` for an unknown backend name or an
    /// unparsable pool size.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Unset and empty variables keep their defaults.
    ///
    /// # Errors
    /// Same as [`StoreConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_BACKEND) {
            config.backend = raw.parse()?;
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        config.database_url = get(ENV_DATABASE_URL);
        if let Some(prefix) = get(ENV_TABLE_PREFIX) {
            config.table_prefix = prefix.trim().to_string();
        }
        if let Some(raw) = get(ENV_MAX_CONNECTIONS) {
            config.max_connections = raw.trim().parse().map_err(|_| {
                StoreError::config(format!("{ENV_MAX_CONNECTIONS} must be a positive integer, got {raw:?}"))
            })?;
        }

        Ok(config)
    }

    /// Set the storage engine.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the file backend directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the SQL connection URL.
    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the SQL table prefix.
    #[must_use]
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Set the SQL pool size.
    #[must_use]
    pub fn with_max_connections(mut self, count: u32) -> Self {
        self.max_connections = count;
        self
    }

    /// Check the settings the selected backend needs.
    ///
    /// # Errors
    /// Returns `StoreError::Config` describing the first problem found.
    pub fn validate(&self) -> StoreResult<()> {
        match self.backend {
            BackendKind::File => {
                if self.data_dir.as_os_str().is_empty() {
                    return Err(StoreError::config("data_dir is empty"));
                }
            }
            BackendKind::Sql => {
                if !cfg!(feature = "mysql") {
                    return Err(StoreError::config(
                        "sql backend selected but rowstore was built without the mysql feature",
                    ));
                }
                if self.database_url.as_deref().map_or(true, str::is_empty) {
                    return Err(StoreError::config(format!(
                        "sql backend requires {ENV_DATABASE_URL}"
                    )));
                }
                if self.table_prefix.is_empty() {
                    return Err(StoreError::config("table_prefix is empty"));
                }
                if self.max_connections == 0 || self.max_connections > SQL_POOL_CONNECTIONS_COUNT_MAX {
                    return Err(StoreError::config(format!(
                        "max_connections must be in 1..={SQL_POOL_CONNECTIONS_COUNT_MAX}, got {}",
                        self.max_connections
                    )));
                }
            }
            BackendKind::Memory => {}
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
