//! # Rowstore
//!
//! Schema-less JSON tables behind one contract, whether rows live in flat
//! files, in MySQL, or in memory.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowstore::{Filter, ListOptions, OrderBy, RowStore, SimBackend};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RowStore::new(SimBackend::default());
//!
//! store
//!     .insert_rows("posts", json!([
//!         {"id": "a", "views": 10, "date": "2024-03-01"},
//!         {"id": "b", "views": 900, "date": "2024-01-15"},
//!     ]))
//!     .await?;
//!
//! let quiet = store
//!     .list_rows(
//!         "posts",
//!         &ListOptions::new()
//!             .filter(Filter::lt("views", 100))
//!             .order_by(OrderBy::desc("date"))
//!             .columns("id"),
//!     )
//!     .await?;
//! assert_eq!(serde_json::to_value(&quiet)?, json!([{"id": "a"}]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  RowStore (façade)                       │
//! │  list_rows │ insert_rows │ upsert_rows │ update │ delete │
//! ├─────────────────────────────────────────────────────────┤
//! │  FileBackend      │ JSON per table, LockRegistry        │
//! │  MySqlBackend     │ row_json per pk, FOR UPDATE txns    │
//! │  SimBackend       │ memory, fault injection             │
//! ├─────────────────────────────────────────────────────────┤
//! │  rowstore-core    │ filter/order/project, merge, DST    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Components
//!
//! - [`RowStore`] - The five operations, delegated to the configured backend
//! - [`StoreConfig`] - Backend selection and settings, from code or env
//! - [`storage`] - The [`RowBackend`] trait and its implementations
//! - [`telemetry`] - `tracing` subscriber setup
//!
//! ## Feature Flags
//!
//! - `mysql` (default) - Enables [`MySqlBackend`] via `sqlx`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use config::{BackendKind, StoreConfig};
pub use storage::{
    FileBackend, LockRegistry, RowBackend, ScopedLock, SimBackend, StoreError, StoreResult,
    TableInitCache,
};
pub use store::RowStore;

#[cfg(feature = "mysql")]
pub use storage::MySqlBackend;

// Re-export the data model so callers need only this crate
pub use rowstore_core::{
    ConflictColumns, Filter, FilterOp, ListOptions, OrderBy, Row, RowBatch, Selection, TableName,
    TableNameError,
};
