//! `SimBackend` - In-Memory Tables for Testing
//!
//! `TigerStyle`: Deterministic testing with fault injection.
//!
//! Shares every query and mutation rule with the durable backends, so a
//! workload run against `SimBackend` must observe the same rows as the same
//! workload run against `FileBackend`. Faults registered on the injector
//! fire on operations named `sim_read` (listing) and `sim_write` (every
//! mutation), before any state is touched.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use rowstore_core::dst::{DeterministicRng, FaultInjector, SimConfig};
use rowstore_core::mutation::{apply_delete, apply_update, apply_upsert};
use rowstore_core::query::evaluate;
use rowstore_core::{ConflictColumns, Filter, ListOptions, Row, RowBatch, Selection, TableName};

use super::backend::RowBackend;
use super::error::{StoreError, StoreResult};

const OP_READ: &str = "sim_read";
const OP_WRITE: &str = "sim_write";

// =============================================================================
// SimBackend
// =============================================================================

/// In-memory row backend for tests and local development.
///
/// `TigerStyle`:
/// - Deterministic via `DeterministicRng`
/// - Fault injection via `FaultInjector`
/// - Thread-safe with `RwLock`; each mutation runs under one write guard
#[derive(Debug, Clone)]
pub struct SimBackend {
    /// Rows per table, in insertion order
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
    /// Fault injector for simulating failures
    fault_injector: Arc<FaultInjector>,
}

impl SimBackend {
    /// Create a backend with no faults registered, seeded from `config`.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let injector = FaultInjector::new(DeterministicRng::new(config.seed()));
        Self::with_fault_injector(Arc::new(injector))
    }

    /// Create a backend sharing an externally configured fault injector.
    #[must_use]
    pub fn with_fault_injector(fault_injector: Arc<FaultInjector>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            fault_injector,
        }
    }

    /// Get fault injector for inspection.
    #[must_use]
    pub fn fault_injector(&self) -> &Arc<FaultInjector> {
        &self.fault_injector
    }

    /// Number of rows currently stored in `table` (for testing).
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .map_or(0, Vec::len)
    }

    fn maybe_inject_fault(&self, operation: &str) -> StoreResult<()> {
        match self.fault_injector.should_inject(operation) {
            Some(fault_type) => Err(StoreError::simulated_fault(format!(
                "{} during {operation}",
                fault_type.as_str()
            ))),
            None => Ok(()),
        }
    }

    fn mutate<T>(&self, table: &str, change: impl FnOnce(&mut Vec<Row>) -> T) -> StoreResult<T> {
        let name = TableName::for_file(table)?;
        self.maybe_inject_fault(OP_WRITE)?;

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let rows = tables.entry(name.as_str().to_string()).or_default();
        Ok(change(rows))
    }
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new(SimConfig::with_seed(0))
    }
}

// =============================================================================
// RowBackend Implementation
// =============================================================================

#[async_trait]
impl RowBackend for SimBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    #[tracing::instrument(skip(self, options))]
    async fn list_rows(&self, table: &str, options: &ListOptions) -> StoreResult<Selection> {
        let name = TableName::for_file(table)?;
        self.maybe_inject_fault(OP_READ)?;

        let rows = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(evaluate(rows, options))
    }

    #[tracing::instrument(skip(self, values), fields(count = values.len()))]
    async fn insert_rows(&self, table: &str, values: RowBatch) -> StoreResult<Vec<Row>> {
        let inserted = values.into_rows();
        self.mutate(table, |rows| rows.extend(inserted.iter().cloned()))?;
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
    }

    #[tracing::instrument(skip(self, patch, filters))]
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
    }

    #[tracing::instrument(skip(self, filters))]
    async fn delete_rows(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Row>> {
        self.mutate(table, |rows| apply_delete(rows, filters))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rowstore_core::dst::{FaultConfig, FaultInjectorBuilder, FaultType};
    use rowstore_core::row_from_value;
    use serde_json::json;

    fn create_test_backend() -> SimBackend {
        SimBackend::new(SimConfig::with_seed(42))
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let backend = create_test_backend();

        backend
            .insert_rows("posts", RowBatch::from_value(json!([{"id": "1"}, {"id": "2"}])))
            .await
            .unwrap();

        let rows = backend
            .list_rows("posts", &ListOptions::new())
            .await
            .unwrap()
            .into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(backend.row_count("posts"), 2);
        assert_eq!(backend.row_count("pages"), 0);
    }

    #[tokio::test]
    async fn test_single_on_empty_table() {
        let backend = create_test_backend();

        let selection = backend
            .list_rows("posts", &ListOptions::new().single())
            .await
            .unwrap();
        assert_eq!(selection, Selection::One(None));
    }

    #[tokio::test]
    async fn test_upsert_then_update_then_delete() {
        let backend = create_test_backend();

        backend
            .upsert_rows(
                "posts",
                row_from_value(json!({"id": "1", "title": "A"})).into(),
                &ConflictColumns::default(),
            )
            .await
            .unwrap();
        backend
            .upsert_rows(
                "posts",
                row_from_value(json!({"id": "1", "views": 3})).into(),
                &ConflictColumns::default(),
            )
            .await
            .unwrap();
        assert_eq!(backend.row_count("posts"), 1);

        let updated = backend
            .update_rows(
                "posts",
                &row_from_value(json!({"title": "B"})),
                &[Filter::eq("id", "1")],
            )
            .await
            .unwrap();
        assert_eq!(
            updated,
            vec![row_from_value(json!({"id": "1", "title": "B", "views": 3}))]
        );

        let removed = backend.delete_rows("posts", &[]).await.unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(backend.row_count("posts"), 0);
    }

    #[tokio::test]
    async fn test_new_never_injects() {
        let backend = SimBackend::new(SimConfig::with_seed(3).with_operations_count(5));

        for i in 0..50 {
            backend
                .insert_rows("posts", row_from_value(json!({ "id": i })).into())
                .await
                .unwrap();
        }
        backend.list_rows("posts", &ListOptions::new()).await.unwrap();
        assert_eq!(backend.fault_injector().total_injections(), 0);
        assert_eq!(backend.row_count("posts"), 50);
    }

    #[tokio::test]
    async fn test_invalid_table_name() {
        let backend = create_test_backend();
        let err = backend
            .list_rows("Bad Name!", &ListOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTableName(_)));
    }

    // =========================================================================
    // Fault Injection Tests
    // =========================================================================

    #[tokio::test]
    async fn test_write_fault_leaves_table_unchanged() {
        let injector = FaultInjectorBuilder::new(DeterministicRng::new(42))
            .with_fault(FaultConfig::new(FaultType::StorageWriteFail, 1.0).with_max_injections(1))
            .build();
        let backend = SimBackend::with_fault_injector(Arc::new(injector));

        let err = backend
            .insert_rows("posts", row_from_value(json!({"id": "1"})).into())
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(backend.row_count("posts"), 0);

        // Budget of one injection is spent.
        backend
            .insert_rows("posts", row_from_value(json!({"id": "1"})).into())
            .await
            .unwrap();
        assert_eq!(backend.row_count("posts"), 1);
        assert_eq!(backend.fault_injector().total_injections(), 1);
    }

    #[tokio::test]
    async fn test_read_faults_only_hit_reads() {
        let injector = FaultInjectorBuilder::new(DeterministicRng::new(7))
            .with_fault(FaultConfig::new(FaultType::StorageReadFail, 1.0).with_filter("read"))
            .build();
        let backend = SimBackend::with_fault_injector(Arc::new(injector));

        backend
            .insert_rows("posts", row_from_value(json!({"id": "1"})).into())
            .await
            .unwrap();

        let err = backend
            .list_rows("posts", &ListOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SimulatedFault { .. }));
    }

    #[tokio::test]
    async fn test_same_seed_same_faults() {
        async fn run(seed: u64) -> Vec<bool> {
            let injector = FaultInjectorBuilder::new(DeterministicRng::new(seed))
                .with_storage_faults(0.5)
                .build();
            let backend = SimBackend::with_fault_injector(Arc::new(injector));
            let mut outcomes = Vec::new();
            for i in 0..20 {
                let result = backend
                    .insert_rows("posts", row_from_value(json!({ "id": i })).into())
                    .await;
                outcomes.push(result.is_ok());
            }
            outcomes
        }

        assert_eq!(run(99).await, run(99).await);
    }
}
