//! Storage - Backend Trait and Implementations
//!
//! `TigerStyle`: One row contract, interchangeable engines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RowBackend Trait                        │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                    ↑                    ↑
//!          │                    │                    │
//! ┌────────┴────────┐  ┌────────┴────────┐  ┌───────┴────────┐
//! │   SimBackend    │  │   FileBackend   │  │  MySqlBackend  │
//! │ (memory, DST)   │  │ (JSON per table)│  │   (server)     │
//! └─────────────────┘  └────────┬────────┘  └───────┬────────┘
//!                               │                    │
//!                        LockRegistry        TableInitCache
//! ```
//!
//! Filtering, ordering, projection and the write semantics all come from
//! `rowstore_core`; the backends only load and persist rows.

mod backend;
mod error;
mod file;
mod lock;
mod sim;
mod single_flight;

#[cfg(feature = "mysql")]
mod mysql;

pub use backend::RowBackend;
pub use error::{StoreError, StoreResult};
pub use file::FileBackend;
pub use lock::{LockRegistry, ScopedLock};
pub use sim::SimBackend;
pub use single_flight::TableInitCache;

#[cfg(feature = "mysql")]
pub use mysql::MySqlBackend;
