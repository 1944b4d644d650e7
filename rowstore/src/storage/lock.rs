//! `LockRegistry` - Per-Table Async Write Locks
//!
//! Serializes writers to the same table within one process. Each table maps
//! to a fair (FIFO) `tokio::sync::Mutex`; a writer holds a [`ScopedLock`]
//! for its whole read-modify-write and releases it on drop, whether the
//! guarded work succeeded, failed, or was cancelled.
//!
//! Every entry counts its users, holder and queued waiters alike. A user is
//! registered before it queues and deregistered when it releases or when its
//! acquisition is dropped while still queued, so the map only ever holds
//! tables with in-flight writers.
//!
//! This is process-local. Two processes sharing a data directory are not
//! coordinated.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type TableLock = Arc<AsyncMutex<()>>;

#[derive(Debug, Default)]
struct TableEntry {
    lock: TableLock,
    users: usize,
}

/// Registry of per-table write locks.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, TableEntry>>,
}

impl LockRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to `table`.
    ///
    /// Waiters are served in arrival order. Dropping the returned future
    /// before it completes leaves no trace in the registry.
    pub async fn acquire(self: &Arc<Self>, table: &str) -> ScopedLock {
        let (registration, lock) = Registration::enter(self, table);

        let guard = lock.lock_owned().await;
        tracing::trace!(table, "table lock acquired");

        ScopedLock {
            _guard: guard,
            registration,
        }
    }

    /// Run `work` while holding the lock for `table`.
    ///
    /// The lock is released when `work` finishes, including on error.
    pub async fn with_lock<F, Fut, T>(self: &Arc<Self>, table: &str, work: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _lock = self.acquire(table).await;
        work().await
    }

    /// Number of tables that currently have a holder or waiters.
    #[must_use]
    pub fn active_tables(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// One holder or waiter counted against a table entry.
#[derive(Debug)]
struct Registration {
    registry: Arc<LockRegistry>,
    table: String,
}

impl Registration {
    fn enter(registry: &Arc<LockRegistry>, table: &str) -> (Self, TableLock) {
        let mut locks = registry.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = locks.entry(table.to_string()).or_default();
        entry.users += 1;
        let lock = Arc::clone(&entry.lock);

        let registration = Self {
            registry: Arc::clone(registry),
            table: table.to_string(),
        };
        (registration, lock)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut locks = self.registry.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = locks.get_mut(&self.table) else {
            return;
        };

        entry.users = entry.users.saturating_sub(1);
        if entry.users == 0 {
            locks.remove(&self.table);
            tracing::trace!(table = %self.table, "table lock retired");
        }
    }
}

/// Exclusive write access to one table; released on drop.
#[derive(Debug)]
pub struct ScopedLock {
    // Field order matters: the mutex is unlocked before the entry is
    // deregistered.
    _guard: OwnedMutexGuard<()>,
    registration: Registration,
}

impl ScopedLock {
    /// Table this lock guards.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.registration.table
    }
}
