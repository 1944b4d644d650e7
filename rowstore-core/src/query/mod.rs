//! Query Semantics
//!
//! Pure functions that decide which rows a listing returns and in what
//! shape. Every backend reads its full table and runs it through
//! [`evaluate`], so filter, order and projection behave identically no
//! matter where the rows were stored.
//!
//! # Pipeline
//!
//! ```text
//! rows ──► apply_filters ──► apply_order ──► pick_columns ──► single?
//! ```

mod compare;
mod filter;
mod order;
mod projection;

use serde::{Deserialize, Serialize};

pub use compare::{compare_values, parse_date_millis, values_equal};
pub use filter::{apply_filters, compare_value, row_matches, Filter, FilterOp, UnknownFilterOp};
pub use order::{apply_order, OrderBy};
pub use projection::{parse_columns, pick_columns};

use crate::row::Row;

// =============================================================================
// ListOptions
// =============================================================================

/// Options for a listing.
///
/// # Example
///
/// ```rust
/// use rowstore_core::query::{Filter, ListOptions, OrderBy};
///
/// let options = ListOptions::new()
///     .filter(Filter::eq("status", "published"))
///     .order_by(OrderBy::desc("updated_at"))
///     .columns("id,title");
/// assert!(!options.single);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    /// ANDed filters; empty matches everything
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Sort key; `None` keeps backend order
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    /// Comma-separated projection; `None` or `"*"` keeps every column
    #[serde(default)]
    pub columns: Option<String>,
    /// Return the first match (or nothing) instead of a list
    #[serde(default)]
    pub single: bool,
}

impl ListOptions {
    /// Options that list every row unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replace all filters.
    #[must_use]
    pub fn filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = filters;
        self
    }

    /// Set the sort key.
    #[must_use]
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Set the projection.
    #[must_use]
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    /// Ask for a single row.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Result of a listing: `Row[]`, or `Row | null` when `single` was set.
///
/// Serializes untagged, so the JSON is exactly an array, an object, or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Selection {
    /// Every matching row
    Many(Vec<Row>),
    /// The first matching row, if any
    One(Option<Row>),
}

impl Selection {
    /// Rows in the selection (zero or one for `One`).
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Self::Many(rows) => rows,
            Self::One(row) => row.into_iter().collect(),
        }
    }

    /// First row in the selection.
    #[must_use]
    pub fn into_single(self) -> Option<Row> {
        match self {
            Self::Many(rows) => rows.into_iter().next(),
            Self::One(row) => row,
        }
    }

    /// Number of rows in the selection.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Many(rows) => rows.len(),
            Self::One(row) => usize::from(row.is_some()),
        }
    }

    /// Whether the selection holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run the full read pipeline over a table's rows.
#[must_use]
pub fn evaluate(rows: Vec<Row>, options: &ListOptions) -> Selection {
    let rows = apply_filters(rows, &options.filters);
    let rows = apply_order(rows, options.order_by.as_ref());

    let columns = options.columns.as_deref().unwrap_or("");
    if options.single {
        return Selection::One(rows.into_iter().next().map(|row| pick_columns(row, columns)));
    }
    Selection::Many(rows.into_iter().map(|row| pick_columns(row, columns)).collect())
}
