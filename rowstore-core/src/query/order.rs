//! Ordering
//!
//! Rows are sorted with the same comparator `lt` uses. The sort is stable so
//! rows with equal keys keep their input order, which keeps pagination over
//! e.g. `updated_at` deterministic.
//!
//! The comparator is pairwise and is not a total order once a column mixes
//! numbers and numeric strings (`9 < 10`, `10 < "5"`, `"5" < 9`). The
//! standard library sorts may panic on such input, so ordering uses a merge
//! sort that only ever asks "is the right row strictly before the left one".

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::compare::compare_values;
use crate::row::Row;

fn ascending_default() -> bool {
    true
}

/// Sort key for a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Column to sort on
    pub column: String,
    /// Ascending (default) or descending
    #[serde(default = "ascending_default")]
    pub ascending: bool,
}

impl OrderBy {
    /// Ascending order on `column`.
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending order on `column`.
    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Return `rows` sorted by `order_by`. `None` keeps the input order.
#[must_use]
pub fn apply_order(rows: Vec<Row>, order_by: Option<&OrderBy>) -> Vec<Row> {
    let Some(order_by) = order_by else {
        return rows;
    };
    if order_by.column.is_empty() {
        return rows;
    }

    let column = order_by.column.as_str();
    merge_sort(rows, &|a: &Row, b: &Row| {
        let ordering = compare_values(a.get(column), b.get(column));
        if order_by.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    })
}

/// Stable top-down merge sort. Terminates for any comparator.
fn merge_sort<F>(mut rows: Vec<Row>, compare: &F) -> Vec<Row>
where
    F: Fn(&Row, &Row) -> Ordering,
{
    if rows.len() <= 1 {
        return rows;
    }

    let right = rows.split_off(rows.len() / 2);
    let left = merge_sort(rows, compare);
    let right = merge_sort(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Ties take the left row first.
        let next = if compare(r, l) == Ordering::Less {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
