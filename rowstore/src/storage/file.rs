//! `FileBackend` - Flat-File JSON Tables
//!
//! `TigerStyle`: Durable tables on a plain filesystem, no database server.
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   table-posts.json      { "rows": [ {...}, {...} ] }
//!   table-settings.json
//! ```
//!
//! # Concurrency
//!
//! Every write takes the table's lock from a shared [`LockRegistry`] and
//! holds it across read-modify-write, so writers to one table are applied
//! one at a time in arrival order and never lose each other's rows. Reads
//! take no lock and may observe the table before or after a queued write.
//! The lock is in-process only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rowstore_core::constants::{FILE_DATA_DIR_DEFAULT, FILE_TABLE_EXTENSION, FILE_TABLE_PREFIX};
use rowstore_core::mutation::{apply_delete, apply_update, apply_upsert};
use rowstore_core::query::evaluate;
use rowstore_core::{ConflictColumns, Filter, ListOptions, Row, RowBatch, Selection, TableName};

use super::backend::RowBackend;
use super::error::{StoreError, StoreResult};
use super::lock::LockRegistry;

/// On-disk shape of one table file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TableDocument {
    #[serde(default)]
    rows: Vec<Row>,
}

// =============================================================================
// FileBackend
// =============================================================================

/// Row backend storing each table as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    data_dir: PathBuf,
    locks: Arc<LockRegistry>,
}

impl FileBackend {
    /// Create a backend rooted at `data_dir` with its own lock registry.
    ///
    /// The directory is created on first write.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_locks(data_dir, Arc::new(LockRegistry::new()))
    }

    /// Create a backend that shares `locks` with other instances.
    ///
    /// Backends pointed at the same directory must share one registry to
    /// serialize their writes.
    #[must_use]
    pub fn with_locks(data_dir: impl Into<PathBuf>, locks: Arc<LockRegistry>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks,
        }
    }

    /// Directory holding the table files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Lock registry serializing this backend's writers.
    #[must_use]
    pub fn locks(&self) -> &Arc<LockRegistry> {
        &self.locks
    }

    /// File path for `table`, validating the name first.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidTableName` for names outside `[a-z0-9_-]`.
    pub fn table_path(&self, table: &str) -> StoreResult<PathBuf> {
        let name = TableName::for_file(table)?;
        Ok(self.path_for(&name))
    }

    fn path_for(&self, name: &TableName) -> PathBuf {
        self.data_dir
            .join(format!("{FILE_TABLE_PREFIX}{name}.{FILE_TABLE_EXTENSION}"))
    }

    /// Load a table's rows.
    ///
    /// A missing file is an empty table. An unreadable or malformed file is
    /// also treated as empty (degraded read), with a warning.
    async fn read_rows(path: &Path) -> Vec<Row> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable table file, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<TableDocument>(&bytes) {
            Ok(document) => document.rows,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed table file, treating as empty");
                Vec::new()
            }
        }
    }

    /// Persist a table's rows, replacing the file.
    async fn write_rows(&self, path: &Path, rows: Vec<Row>) -> StoreResult<()> {
        let document = TableDocument { rows };
        let bytes = serde_json::to_vec_pretty(&document)?;

        tokio::fs::create_dir_all(&self.data_dir).await.map_err(|e| {
            StoreError::write(format!(
                "failed to create data dir {}: {e}",
                self.data_dir.display()
            ))
        })?;

        // Write beside the target and rename over it so readers never see
        // a half-written document.
        let tmp = path.with_extension(format!("{FILE_TABLE_EXTENSION}.tmp"));
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::write(format!("failed to write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            StoreError::write(format!("failed to replace {}: {e}", path.display()))
        })?;

        Ok(())
    }

    /// Run one read-modify-write cycle under the table lock.
    async fn mutate<T>(
        &self,
        table: &str,
        change: impl FnOnce(&mut Vec<Row>) -> T + Send,
    ) -> StoreResult<T>
    where
        T: Send,
    {
        let name = TableName::for_file(table)?;
        let path = self.path_for(&name);

        let _lock = self.locks.acquire(name.as_str()).await;
        let mut rows = Self::read_rows(&path).await;
        let outcome = change(&mut rows);
        self.write_rows(&path, rows).await?;
        Ok(outcome)
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new(FILE_DATA_DIR_DEFAULT)
    }
}

// =============================================================================
// RowBackend Implementation
// =============================================================================

#[async_trait]
impl RowBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    #[tracing::instrument(skip(self, options), fields(filters = options.filters.len(), single = options.single))]
    async fn list_rows(&self, table: &str, options: &ListOptions) -> StoreResult<Selection> {
        let path = self.table_path(table)?;
        let rows = Self::read_rows(&path).await;
        Ok(evaluate(rows, options))
    }

    #[tracing::instrument(skip(self, values), fields(count = values.len()))]
    async fn insert_rows(&self, table: &str, values: RowBatch) -> StoreResult<Vec<Row>> {
        let inserted = values.into_rows();
        if inserted.is_empty() {
            // Still validate the name so bad input fails the same way.
            self.table_path(table)?;
            return Ok(Vec::new());
        }

        self.mutate(table, |rows| {
            rows.extend(inserted.iter().cloned());
        })
        .await?;

        Ok(inserted)
    }

    #[tracing::instrument(skip(self, values, on_conflict), fields(count = values.len()))]
    async fn upsert_rows(
        &self,
        table: &str,
        values: RowBatch,
        on_conflict: &ConflictColumns,
    ) -> StoreResult<Vec<Row>> {
        self.mutate(table, |rows| {
            let outcome = apply_upsert(rows, values, on_conflict);
            outcome.changed_rows(rows)
        })
        .await
    }

    #[tracing::instrument(skip(self, patch, filters), fields(filters = filters.len()))]
    async fn update_rows(
        &self,
        table: &str,
        patch: &Row,
        filters: &[Filter],
    ) -> StoreResult<Vec<Row>> {
        self.mutate(table, |rows| {
            let updated = apply_update(rows, patch, filters);
            updated.iter().map(|&index| rows[index].clone()).collect()
        })
        .await
    }

    #[tracing::instrument(skip(self, filters), fields(filters = filters.len()))]
    async fn delete_rows(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Row>> {
        self.mutate(table, |rows| apply_delete(rows, filters)).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
