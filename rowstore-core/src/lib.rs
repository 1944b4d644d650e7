//! Rowstore Core - Row Semantics with DST
//!
//! The backend-independent half of the row store: what a row is, which table
//! names are legal, how listings filter/order/project, and how upserts,
//! updates and deletes change a table. Storage engines live in the
//! `rowstore` crate and all defer to the functions here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Rowstore Core                  │
//! ├─────────────────────────────────────────────┤
//! │  row / table     │ Row, RowBatch, TableName  │
//! │  query           │ filter, order, project    │
//! │  mutation        │ merge, upsert, delete     │
//! ├─────────────────────────────────────────────┤
//! │  DST Framework   │ Seeded RNG, faults        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use rowstore_core::query::{evaluate, Filter, ListOptions};
//! use rowstore_core::row::row_from_value;
//! use serde_json::json;
//!
//! let rows = vec![
//!     row_from_value(json!({"id": "x", "views": 10})),
//!     row_from_value(json!({"id": "y", "views": 900})),
//! ];
//! let popular = evaluate(rows, &ListOptions::new().filter(Filter::lt("views", 100)));
//! assert_eq!(popular.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod dst;
pub mod mutation;
pub mod query;
pub mod row;
pub mod table;

// Re-export common types
pub use constants::*;
pub use dst::{DeterministicRng, FaultConfig, FaultInjector, FaultInjectorBuilder, FaultType, SimConfig};
pub use mutation::{
    apply_delete, apply_update, apply_upsert, matching_indices, merge_row, ConflictColumns,
    UpsertOutcome,
};
pub use query::{evaluate, Filter, FilterOp, ListOptions, OrderBy, Selection};
pub use row::{row_from_value, Row, RowBatch};
pub use table::{NameRules, TableName, TableNameError};
