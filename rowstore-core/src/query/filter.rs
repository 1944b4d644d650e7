//! Filters
//!
//! A filter list is the logical AND of its entries; an empty list matches
//! every row. A filter with no operator or an empty column is ignored.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::compare::{compare_values, values_equal};
use crate::row::Row;

/// Comparison operator of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    /// Strict equality
    Eq,
    /// Strict inequality
    Neq,
    /// Less than, using the three-tier comparator
    Lt,
}

impl FilterOp {
    /// Wire name of the operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an operator string that is not `eq`, `neq` or `lt`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter operator {0:?} (expected eq, neq or lt)")]
pub struct UnknownFilterOp(pub String);

impl FromStr for FilterOp {
    type Err = UnknownFilterOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "lt" => Ok(Self::Lt),
            other => Err(UnknownFilterOp(other.to_string())),
        }
    }
}

/// A single column/operator/value predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Column the predicate reads
    #[serde(default)]
    pub column: String,
    /// Operator; `None` (absent or `""` on the wire) makes the filter inert
    #[serde(default, deserialize_with = "deserialize_op")]
    pub op: Option<FilterOp>,
    /// Right-hand side of the comparison
    #[serde(default)]
    pub value: Value,
}

impl Filter {
    /// Create a filter.
    #[must_use]
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: Some(op),
            value: value.into(),
        }
    }

    /// `column == value`
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    /// `column != value`
    #[must_use]
    pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Neq, value)
    }

    /// `column < value`
    #[must_use]
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Lt, value)
    }

    /// Whether this filter constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.op.is_some() && !self.column.is_empty()
    }

    /// Evaluate the filter against one row. Inert filters always match.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        match self.op {
            Some(op) if !self.column.is_empty() => {
                compare_value(row.get(&self.column), op, &self.value)
            }
            _ => true,
        }
    }
}

fn deserialize_op<'de, D>(deserializer: D) -> Result<Option<FilterOp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(op) => op.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Compare a row's value (`None` when the column is missing) to a filter value.
#[must_use]
pub fn compare_value(left: Option<&Value>, op: FilterOp, right: &Value) -> bool {
    match op {
        FilterOp::Eq => values_equal(left, Some(right)),
        FilterOp::Neq => !values_equal(left, Some(right)),
        FilterOp::Lt => compare_values(left, Some(right)) == Ordering::Less,
    }
}

/// Whether `row` satisfies every filter.
#[must_use]
pub fn row_matches(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| filter.matches(row))
}

/// Keep the rows that satisfy every filter, preserving order.
#[must_use]
pub fn apply_filters(rows: Vec<Row>, filters: &[Filter]) -> Vec<Row> {
    if filters.iter().all(|f| !f.is_active()) {
        return rows;
    }
    rows.into_iter()
        .filter(|row| row_matches(row, filters))
        .collect()
}
