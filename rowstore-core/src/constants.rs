//! `TigerStyle` Constants
//!
//! All limits use big-endian naming: `CATEGORY_SPECIFICS_UNIT_LIMIT`
//! Example: `TABLE_NAME_BYTES_MAX` (not `MAX_TABLE_NAME_LEN`)
//!
//! Every constant includes units in the name:
//! - _`BYTES_MAX/MIN` for size limits
//! - _`COUNT_MAX` for quantity limits
//! - _`DEFAULT` for fallback values

// =============================================================================
// Table Limits
// =============================================================================

/// Maximum length of a logical table name
pub const TABLE_NAME_BYTES_MAX: usize = 64;

/// Maximum length of a physical SQL identifier (MySQL limit)
pub const SQL_IDENTIFIER_BYTES_MAX: usize = 64;

// =============================================================================
// Query Defaults
// =============================================================================

/// Projection that keeps every column
pub const COLUMNS_ALL: &str = "*";

/// Conflict columns used by upsert when none are given
pub const CONFLICT_COLUMNS_DEFAULT: &str = "id";

/// Separator for column lists (projection and conflict columns)
pub const COLUMN_LIST_SEPARATOR: char = ',';

// =============================================================================
// File Backend
// =============================================================================

/// Default data directory for table files
pub const FILE_DATA_DIR_DEFAULT: &str = "data";

/// Filename prefix for table files: `table-<name>.json`
pub const FILE_TABLE_PREFIX: &str = "table-";

/// Filename extension for table files
pub const FILE_TABLE_EXTENSION: &str = "json";

// =============================================================================
// SQL Backend
// =============================================================================

/// Default prefix for physical tables: `<prefix>_<name>`
pub const SQL_TABLE_PREFIX_DEFAULT: &str = "store";

/// Default number of pooled connections
pub const SQL_POOL_CONNECTIONS_COUNT_DEFAULT: u32 = 10;

/// Maximum number of pooled connections
pub const SQL_POOL_CONNECTIONS_COUNT_MAX: u32 = 100;

// =============================================================================
// DST (Deterministic Simulation Testing)
// =============================================================================

/// Maximum fault injection probability
pub const DST_FAULT_PROBABILITY_MAX: f64 = 1.0;

/// Minimum fault injection probability
pub const DST_FAULT_PROBABILITY_MIN: f64 = 0.0;

/// Default number of operations in a generated simulation run
pub const DST_OPERATIONS_COUNT_DEFAULT: usize = 200;
