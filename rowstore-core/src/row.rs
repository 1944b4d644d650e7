//! Rows and Write Batches
//!
//! A row is a schema-less, ordered JSON object. Nothing here validates the
//! shape of a row beyond "it is an object".

use serde_json::{Map, Value};

/// One record in a table: an ordered mapping of column name to JSON value.
pub type Row = Map<String, Value>;

/// Normalized input for insert and upsert.
///
/// Callers may hand over one row, many rows, or raw JSON. Raw JSON is
/// normalized the forgiving way: an object is one row, an array keeps its
/// object elements and silently drops everything else, any other value is an
/// empty batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBatch {
    rows: Vec<Row>,
}

impl RowBatch {
    /// An empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize arbitrary JSON into a batch.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let rows = match value {
            Value::Object(row) => vec![row],
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { rows }
    }

    /// Number of rows in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the batch has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Take the rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<Row> for RowBatch {
    fn from(row: Row) -> Self {
        Self { rows: vec![row] }
    }
}

impl From<Vec<Row>> for RowBatch {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl From<Value> for RowBatch {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl IntoIterator for RowBatch {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Build a row from a JSON object literal.
///
/// Returns an empty row if `value` is not an object.
#[must_use]
pub fn row_from_value(value: Value) -> Row {
    match value {
        Value::Object(row) => row,
        _ => Row::new(),
    }
}
