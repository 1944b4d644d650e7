//! Storage Errors
//!
//! `TigerStyle`: Explicit error types with context.

use rowstore_core::TableNameError;
use thiserror::Error;

/// Errors from row-store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Table name failed validation (raised before any I/O)
    #[error("invalid table name: {0}")]
    InvalidTableName(#[from] TableNameError),

    /// Store configuration is invalid
    #[error("configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// Persisting table data failed
    #[error("write failed: {message}")]
    Write {
        /// Write error message
        message: String,
    },

    /// Connection error
    #[error("connection error: {message}")]
    Connection {
        /// Connection error message
        message: String,
    },

    /// SQL statement failed
    #[error("query error: {message}")]
    Query {
        /// Query error message
        message: String,
    },

    /// Creating a table failed
    #[error("table setup failed for {table}: {message}")]
    TableSetup {
        /// Physical table name
        table: String,
        /// DDL error message
        message: String,
    },

    /// Row could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Simulated fault (for DST)
    #[error("simulated fault: {fault_type}")]
    SimulatedFault {
        /// Type of simulated fault
        fault_type: String,
    },
}

impl StoreError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a write error.
    #[must_use]
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a table setup error.
    #[must_use]
    pub fn table_setup(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TableSetup {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a simulated fault error.
    #[must_use]
    pub fn simulated_fault(fault_type: impl Into<String>) -> Self {
        Self::SimulatedFault {
            fault_type: fault_type.into(),
        }
    }

    /// Check if this is a transient error (can be retried).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::TableSetup { .. } | Self::SimulatedFault { .. }
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
