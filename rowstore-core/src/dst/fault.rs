//! `FaultInjector` - Probabilistic Fault Injection
//!
//! `TigerStyle`: Explicit fault injection for storage chaos testing.
//!
//! Backends call [`FaultInjector::should_inject`] with an operation name
//! (`"sim_read"`, `"sim_write"`). A registered fault fires when its
//! optional operation filter is a substring of that name and the seeded roll
//! comes up under its probability.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::rng::DeterministicRng;
use crate::constants::{DST_FAULT_PROBABILITY_MAX, DST_FAULT_PROBABILITY_MIN};

/// Types of faults that can be injected into a row-store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultType {
    // =========================================================================
    // Storage Faults
    // =========================================================================
    /// Reading a table fails
    StorageReadFail,
    /// Persisting a table fails
    StorageWriteFail,
}

impl FaultType {
    /// Get the fault type name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StorageReadFail => "storage_read_fail",
            Self::StorageWriteFail => "storage_write_fail",
        }
    }
}

/// Configuration for a specific fault.
#[derive(Debug, Clone)]
pub struct FaultConfig {
    /// The type of fault
    pub fault_type: FaultType,
    /// Probability of injection (0.0 to 1.0)
    pub probability: f64,
    /// Optional operation filter (substring match)
    pub operation_filter: Option<String>,
    /// Maximum number of injections (None = unlimited)
    pub max_injections: Option<u64>,
}

impl FaultConfig {
    /// Create a new fault configuration.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    #[must_use]
    pub fn new(fault_type: FaultType, probability: f64) -> Self {
        assert!(
            (DST_FAULT_PROBABILITY_MIN..=DST_FAULT_PROBABILITY_MAX).contains(&probability),
            "probability must be in [0, {DST_FAULT_PROBABILITY_MAX}], got {probability}"
        );

        Self {
            fault_type,
            probability,
            operation_filter: None,
            max_injections: None,
        }
    }

    /// Only fire for operations whose name contains `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.operation_filter = Some(filter.into());
        self
    }

    /// Stop firing after `max` injections.
    ///
    /// # Panics
    /// Panics if max is zero.
    #[must_use]
    pub fn with_max_injections(mut self, max: u64) -> Self {
        assert!(max > 0, "max_injections must be positive");
        self.max_injections = Some(max);
        self
    }

    fn applies_to(&self, operation: &str) -> bool {
        self.operation_filter
            .as_deref()
            .map_or(true, |filter| operation.contains(filter))
    }
}

/// Fault injector for simulation testing.
///
/// Shared via `Arc`; rolls and counters use interior mutability so
/// `should_inject` works on `&self`.
#[derive(Debug)]
pub struct FaultInjector {
    rng: Mutex<DeterministicRng>,
    configs: Vec<FaultConfig>,
    injection_counts: Mutex<HashMap<FaultType, u64>>,
}

impl FaultInjector {
    /// Create an injector with no faults registered.
    #[must_use]
    pub fn new(rng: DeterministicRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            configs: Vec::new(),
            injection_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Register a fault configuration.
    ///
    /// Registration must happen before the injector is shared.
    pub fn register(&mut self, config: FaultConfig) {
        self.injection_counts
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(config.fault_type)
            .or_insert(0);
        self.configs.push(config);
    }

    /// Whether any fault is registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Check if a fault should be injected for the given operation.
    ///
    /// Returns the first registered fault that fires, None otherwise.
    pub fn should_inject(&self, operation: &str) -> Option<FaultType> {
        for config in &self.configs {
            if !config.applies_to(operation) {
                continue;
            }

            let mut counts = self
                .injection_counts
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let count = counts.entry(config.fault_type).or_insert(0);
            if config.max_injections.is_some_and(|max| *count >= max) {
                continue;
            }

            let fires = self
                .rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .next_bool(config.probability);

            if fires {
                *count += 1;
                tracing::debug!(
                    operation,
                    fault = config.fault_type.as_str(),
                    "injecting fault"
                );
                return Some(config.fault_type);
            }
        }

        None
    }

    /// Injection counts keyed by fault name.
    #[must_use]
    pub fn injection_stats(&self) -> HashMap<String, u64> {
        self.injection_counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(fault_type, count)| (fault_type.as_str().to_string(), *count))
            .collect()
    }

    /// Total number of injections so far.
    #[must_use]
    pub fn total_injections(&self) -> u64 {
        self.injection_counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }
}

/// Builder for `FaultInjector`.
///
/// Collects configuration before the injector is wrapped in an `Arc`.
pub struct FaultInjectorBuilder {
    rng: DeterministicRng,
    configs: Vec<FaultConfig>,
}

impl FaultInjectorBuilder {
    /// Create a new builder with the given RNG.
    #[must_use]
    pub fn new(rng: DeterministicRng) -> Self {
        Self {
            rng,
            configs: Vec::new(),
        }
    }

    /// Add a fault configuration.
    #[must_use]
    pub fn with_fault(mut self, config: FaultConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Add read and write failures on table storage.
    #[must_use]
    pub fn with_storage_faults(self, probability: f64) -> Self {
        self.with_fault(FaultConfig::new(FaultType::StorageWriteFail, probability).with_filter("write"))
            .with_fault(FaultConfig::new(FaultType::StorageReadFail, probability).with_filter("read"))
    }

    /// Build the `FaultInjector`.
    #[must_use]
    pub fn build(self) -> FaultInjector {
        let mut injector = FaultInjector::new(self.rng);
        for config in self.configs {
            injector.register(config);
        }
        injector
    }
}
