//! `SimConfig` - Simulation Configuration
//!
//! `TigerStyle`: Seed management for deterministic testing.

use rand::Rng;
use std::env;

use crate::constants::DST_OPERATIONS_COUNT_DEFAULT;

/// Environment variable holding a replay seed.
pub const DST_SEED_ENV: &str = "DST_SEED";

/// Configuration for a simulation run.
///
/// Immutable after creation. The seed is logged so any run can be replayed
/// with `DST_SEED=<seed>`.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    seed: u64,
    operations_count: usize,
}

impl SimConfig {
    /// Create config with explicit seed.
    ///
    /// # Example
    /// ```
    /// use rowstore_core::dst::SimConfig;
    /// let config = SimConfig::with_seed(12345);
    /// assert_eq!(config.seed(), 12345);
    /// ```
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            operations_count: DST_OPERATIONS_COUNT_DEFAULT,
        }
    }

    /// Create config from `DST_SEED` or a fresh random seed.
    ///
    /// # Panics
    /// Panics if `DST_SEED` is set but is not a valid u64.
    #[must_use]
    pub fn from_env_or_random() -> Self {
        let seed = match env::var(DST_SEED_ENV) {
            Ok(raw) => raw
                .parse::<u64>()
                .unwrap_or_else(|_| panic!("{DST_SEED_ENV} must be a valid u64, got: {raw}")),
            Err(_) => {
                let seed = rand::thread_rng().gen::<u64>();
                tracing::info!(seed, "DST: generated random seed (replay with {DST_SEED_ENV}={seed})");
                seed
            }
        };

        Self::with_seed(seed)
    }

    /// Get the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of operations a generated workload should run.
    #[must_use]
    pub fn operations_count(&self) -> usize {
        self.operations_count
    }

    /// Override the number of generated operations.
    ///
    /// # Panics
    /// Panics if `count` is zero.
    #[must_use]
    pub fn with_operations_count(self, count: usize) -> Self {
        assert!(count > 0, "operations_count must be positive");
        Self {
            operations_count: count,
            ..self
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_env_or_random()
    }
}
