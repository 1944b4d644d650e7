//! `TableInitCache` - Single-Flight Table Creation
//!
//! The first access to a table runs its setup (e.g. `CREATE TABLE IF NOT
//! EXISTS`) exactly once per process. Concurrent callers for the same table
//! wait on the one in-flight attempt. A failed attempt is forgotten, so the
//! next caller retries instead of inheriting the failure forever.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

/// Memo of tables whose setup has completed.
#[derive(Debug, Default)]
pub struct TableInitCache {
    cells: Mutex<HashMap<String, Arc<OnceCell<()>>>>,
}

impl TableInitCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `init` for `table` unless it already succeeded.
    ///
    /// # Errors
    /// Returns the error from this caller's own `init` attempt. Callers that
    /// were waiting on a failed attempt run `init` themselves.
    pub async fn ensure<F, Fut, E>(&self, table: &str, init: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(table.to_string()).or_default())
        };

        let result = cell.get_or_try_init(init).await.map(|_| ());
        if result.is_err() {
            self.forget_failed(table, &cell);
        }
        result
    }

    /// Whether setup for `table` has completed in this process.
    #[must_use]
    pub fn is_ready(&self, table: &str) -> bool {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .is_some_and(|cell| cell.initialized())
    }

    fn forget_failed(&self, table: &str, cell: &Arc<OnceCell<()>>) {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        // Only drop the entry we used; a concurrent caller may have
        // succeeded with it in the meantime.
        if let Some(current) = cells.get(table) {
            if Arc::ptr_eq(current, cell) && !current.initialized() {
                cells.remove(table);
                tracing::debug!(table, "table setup failed; cleared for retry");
            }
        }
    }
}
