//! DST - Deterministic Simulation Testing
//!
//! Seeded randomness and fault injection for exercising row-store backends.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rowstore_core::dst::{DeterministicRng, FaultConfig, FaultInjectorBuilder, FaultType, SimConfig};
//!
//! let config = SimConfig::with_seed(42);
//! let faults = Arc::new(
//!     FaultInjectorBuilder::new(DeterministicRng::new(config.seed()))
//!         .with_fault(FaultConfig::new(FaultType::StorageWriteFail, 0.1).with_filter("write"))
//!         .build(),
//! );
//! assert_eq!(faults.total_injections(), 0);
//! ```
//!
//! Run with explicit seed for reproducibility:
//! ```bash
//! DST_SEED=12345 cargo test
//! ```

mod config;
mod fault;
mod rng;

pub use config::{SimConfig, DST_SEED_ENV};
pub use fault::{FaultConfig, FaultInjector, FaultInjectorBuilder, FaultType};
pub use rng::DeterministicRng;
