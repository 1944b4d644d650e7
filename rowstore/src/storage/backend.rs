//! Row Backend Trait
//!
//! `TigerStyle`: Abstract interface for table storage.
//!
//! # Contract
//!
//! Every implementation must produce identical observable results for the
//! same sequence of calls: reads go through `rowstore_core::query::evaluate`
//! and writes through `rowstore_core::mutation`. Backends differ only in
//! where rows live and how concurrent writers are serialized.

use async_trait::async_trait;
use rowstore_core::{ConflictColumns, Filter, ListOptions, Row, RowBatch, Selection};

use super::error::StoreResult;

/// Abstract storage backend for schema-less tables.
///
/// All operations are async and return explicit errors. Tables are created
/// implicitly on first write; reading a table that was never written yields
/// no rows.
#[async_trait]
pub trait RowBackend: Send + Sync {
    /// Short name for logs and diagnostics (`"file"`, `"mysql"`, ...).
    fn name(&self) -> &'static str;

    /// List rows matching `options`.
    ///
    /// Returns `Selection::One` when `options.single` is set.
    async fn list_rows(&self, table: &str, options: &ListOptions) -> StoreResult<Selection>;

    /// Append rows. No conflict matching.
    ///
    /// Returns the rows actually inserted.
    async fn insert_rows(&self, table: &str, values: RowBatch) -> StoreResult<Vec<Row>>;

    /// Merge each row into the existing row it conflicts with, or append it.
    ///
    /// Returns the changed rows in input order.
    async fn upsert_rows(
        &self,
        table: &str,
        values: RowBatch,
        on_conflict: &ConflictColumns,
    ) -> StoreResult<Vec<Row>>;

    /// Shallow-merge `patch` into every row matching `filters`.
    ///
    /// Returns the rows just updated, after the merge.
    async fn update_rows(&self, table: &str, patch: &Row, filters: &[Filter])
        -> StoreResult<Vec<Row>>;

    /// Remove every row matching `filters`.
    ///
    /// Returns the removed rows.
    async fn delete_rows(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Row>>;
}
