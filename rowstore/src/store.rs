//! `RowStore` - Backend Façade
//!
//! `TigerStyle`: Five operations, one backend, fail fast on bad config.
//!
//! The rest of an application talks to tables only through [`RowStore`].
//! Which engine sits behind it is decided once, from a [`StoreConfig`]. A
//! configuration that does not validate does not fall back to a default
//! engine: the store keeps the error and returns it from every call.
//!
//! Inputs and outputs pass through untouched apart from normalization of
//! the loosely typed arguments (`Row | Row[]`, comma-separated conflict
//! columns).

use std::sync::Arc;

use rowstore_core::{ConflictColumns, Filter, ListOptions, Row, RowBatch, Selection};

use crate::config::{BackendKind, StoreConfig};
use crate::storage::{FileBackend, RowBackend, SimBackend, StoreError, StoreResult};

#[cfg(feature = "mysql")]
use crate::storage::MySqlBackend;

// =============================================================================
// RowStore
// =============================================================================

/// Table store delegating to one configured backend.
///
/// Cheap to clone; clones share the backend.
///
/// # Example
///
/// ```rust
/// use rowstore::{ListOptions, RowStore, SimBackend};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RowStore::new(SimBackend::default());
///
/// store.insert_rows("posts", json!({"id": "x", "n": 1})).await?;
/// let row = store
///     .list_rows("posts", &ListOptions::new().single())
///     .await?
///     .into_single();
/// assert_eq!(row.unwrap()["n"], json!(1));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RowStore {
    backend: Result<Arc<dyn RowBackend>, StoreError>,
}

impl RowStore {
    /// Create a store over `backend`.
    #[must_use]
    pub fn new(backend: impl RowBackend + 'static) -> Self {
        Self::from_backend(Arc::new(backend))
    }

    /// Create a store over a shared backend.
    #[must_use]
    pub fn from_backend(backend: Arc<dyn RowBackend>) -> Self {
        Self {
            backend: Ok(backend),
        }
    }

    /// Create the backend `config` selects.
    ///
    /// Performs no I/O: the file backend creates its directory on first
    /// write and the SQL pool connects on first use. Building a SQL store
    /// must happen inside a Tokio runtime.
    ///
    /// Never fails; an invalid config yields a store whose every call
    /// returns the configuration error.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        let backend = config.validate().and_then(|()| build_backend(config));

        match &backend {
            Ok(backend) => tracing::info!(backend = backend.name(), "row store ready"),
            Err(e) => tracing::error!(error = %e, "row store misconfigured; all calls will fail"),
        }

        Self { backend }
    }

    /// Create the backend selected by environment variables.
    ///
    /// See [`StoreConfig::from_env`] for the variables read.
    #[must_use]
    pub fn from_env() -> Self {
        match StoreConfig::from_env() {
            Ok(config) => Self::from_config(&config),
            Err(e) => {
                tracing::error!(error = %e, "row store misconfigured; all calls will fail");
                Self { backend: Err(e) }
            }
        }
    }

    /// Name of the active backend, or `None` if misconfigured.
    #[must_use]
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().ok().map(|backend| backend.name())
    }

    /// The configuration error every call returns, if any.
    #[must_use]
    pub fn config_error(&self) -> Option<&StoreError> {
        self.backend.as_ref().err()
    }

    fn backend(&self) -> StoreResult<&dyn RowBackend> {
        match &self.backend {
            Ok(backend) => Ok(backend.as_ref()),
            Err(e) => Err(e.clone()),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// List rows of `table`.
    ///
    /// Returns [`Selection::One`] when `options.single` is set.
    ///
    /// # Errors
    /// Configuration, table-name, and backend errors.
    pub async fn list_rows(&self, table: &str, options: &ListOptions) -> StoreResult<Selection> {
        self.backend()?.list_rows(table, options).await
    }

    /// Append one row or many.
    ///
    /// # Errors
    /// Configuration, table-name, and backend errors.
    pub async fn insert_rows(&self, table: &str, values: impl Into<RowBatch>) -> StoreResult<Vec<Row>> {
        self.backend()?.insert_rows(table, values.into()).await
    }

    /// Merge rows into their conflicting counterparts or append them.
    ///
    /// `on_conflict` is a comma-separated column list; `None` or an empty
    /// list means `id`.
    ///
    /// # Errors
    /// Configuration, table-name, and backend errors.
    pub async fn upsert_rows(
        &self,
        table: &str,
        values: impl Into<RowBatch>,
        on_conflict: Option<&str>,
    ) -> StoreResult<Vec<Row>> {
        let conflict = ConflictColumns::from(on_conflict);
        self.backend()?
            .upsert_rows(table, values.into(), &conflict)
            .await
    }

    /// Merge `patch` into every row matching `filters`.
    ///
    /// # Errors
    /// Configuration, table-name, and backend errors.
    pub async fn update_rows(&self, table: &str, patch: &Row, filters: &[Filter]) -> StoreResult<Vec<Row>> {
        self.backend()?.update_rows(table, patch, filters).await
    }

    /// Remove every row matching `filters`.
    ///
    /// # Errors
    /// Configuration, table-name, and backend errors.
    pub async fn delete_rows(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Row>> {
        self.backend()?.delete_rows(table, filters).await
    }
}

impl std::fmt::Debug for RowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("RowStore");
        match &self.backend {
            Ok(backend) => debug.field("backend", &backend.name()),
            Err(e) => debug.field("error", e),
        };
        debug.finish()
    }
}

fn build_backend(config: &StoreConfig) -> StoreResult<Arc<dyn RowBackend>> {
    match config.backend {
        BackendKind::File => Ok(Arc::new(FileBackend::new(&config.data_dir))),
        BackendKind::Memory => Ok(Arc::new(SimBackend::default())),
        BackendKind::Sql => build_sql_backend(config),
    }
}

#[cfg(feature = "mysql")]
fn build_sql_backend(config: &StoreConfig) -> StoreResult<Arc<dyn RowBackend>> {
    let url = config.database_url.as_deref().unwrap_or_default();
    let backend = MySqlBackend::connect_lazy(url, &config.table_prefix, config.max_connections)?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "mysql"))]
fn build_sql_backend(_config: &StoreConfig) -> StoreResult<Arc<dyn RowBackend>> {
    Err(StoreError::config(
        "sql backend selected but rowstore was built without the mysql feature",
    ))
}

// =============================================================================
// Tests
// =============================================================================
