//! Logging Setup
//!
//! `TigerStyle`: Explicit configuration, typed errors, never panics.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rowstore::telemetry::{init_telemetry, TelemetryConfig};
//!
//! // Defaults: filter from ROWSTORE_LOG, then RUST_LOG, then "info"
//! init_telemetry(&TelemetryConfig::default()).expect("telemetry init");
//!
//! // Or configure explicitly
//! let config = TelemetryConfig::builder()
//!     .filter("rowstore=debug")
//!     .with_target(false)
//!     .build();
//! init_telemetry(&config).expect("telemetry init");
//! ```
//!
//! ## Environment Variables
//!
//! - `ROWSTORE_LOG` - Filter directives (takes precedence)
//! - `RUST_LOG` - Filter directives (fallback)

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter directive variable checked first.
pub const ENV_LOG: &str = "ROWSTORE_LOG";
/// Filter directive variable checked second.
pub const ENV_RUST_LOG: &str = "RUST_LOG";
/// Filter used when neither variable is set.
pub const FILTER_DEFAULT: &str = "info";

/// Telemetry configuration errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Filter directives did not parse
    #[error("invalid log filter {filter:?}: {reason}")]
    InvalidFilter {
        /// The rejected directives
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("telemetry initialization failed: {reason}")]
    InitFailed {
        /// The reason for the failure
        reason: String,
    },
}

/// Result type for telemetry operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives, e.g. `"info,rowstore=debug"`
    pub filter: String,

    /// Include the event target (module path) in each line
    pub with_target: bool,

    /// Emit ANSI colors
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let filter = [ENV_LOG, ENV_RUST_LOG]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|value| !value.trim().is_empty()))
            .unwrap_or_else(|| FILTER_DEFAULT.to_string());

        Self {
            filter,
            with_target: true,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Create a new builder for `TelemetryConfig`
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    /// Parse the filter directives.
    ///
    /// # Errors
    /// Returns `TelemetryError::InvalidFilter` for empty or malformed
    /// directives.
    pub fn validate(&self) -> Result<EnvFilter> {
        if self.filter.trim().is_empty() {
            return Err(TelemetryError::InvalidFilter {
                filter: self.filter.clone(),
                reason: "filter cannot be empty".to_string(),
            });
        }

        EnvFilter::try_new(&self.filter).map_err(|e| TelemetryError::InvalidFilter {
            filter: self.filter.clone(),
            reason: e.to_string(),
        })
    }
}

/// Builder for `TelemetryConfig`
#[derive(Default)]
pub struct TelemetryConfigBuilder {
    filter: Option<String>,
    with_target: Option<bool>,
    ansi: Option<bool>,
}

impl TelemetryConfigBuilder {
    /// Set the filter directives
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Show or hide event targets
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = Some(enabled);
        self
    }

    /// Enable or disable ANSI colors
    #[must_use]
    pub fn ansi(mut self, enabled: bool) -> Self {
        self.ansi = Some(enabled);
        self
    }

    /// Build the `TelemetryConfig`
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        let default = TelemetryConfig::default();
        TelemetryConfig {
            filter: self.filter.unwrap_or(default.filter),
            with_target: self.with_target.unwrap_or(default.with_target),
            ansi: self.ansi.unwrap_or(default.ansi),
        }
    }
}

/// Install a global `fmt` subscriber for `config`.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directives do not parse.
/// Returns `TelemetryError::InitFailed` if a global subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    let filter = config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .try_init()
        .map_err(|e| TelemetryError::InitFailed {
            reason: e.to_string(),
        })?;

    tracing::debug!(filter = %config.filter, "telemetry initialized");
    Ok(())
}
