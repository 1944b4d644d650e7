//! Value Comparison
//!
//! The one comparator every backend uses, for `lt` filters and for ordering:
//!
//! 1. both values are numbers: numeric comparison
//! 2. both values are strings that parse as dates: chronological comparison
//! 3. otherwise: lexicographic comparison of the stringified values
//!
//! Equality (`eq`/`neq`) is strict: no coercion between types. Numbers are
//! equal when their numeric values are (`1 == 1.0`).

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Naive datetime layouts accepted as dates (interpreted as UTC).
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Strict equality of two JSON values.
///
/// A missing value (`None`) is never equal to anything, including null.
#[must_use]
pub fn values_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Total order over JSON values using the three-tier fallback.
///
/// Missing values compare as null.
#[must_use]
pub fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let left = left.unwrap_or(&Value::Null);
    let right = right.unwrap_or(&Value::Null);

    if let (Value::Number(a), Value::Number(b)) = (left, right) {
        if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
            return a.total_cmp(&b);
        }
    }

    if let (Some(a), Some(b)) = (parse_date_millis(left), parse_date_millis(right)) {
        return a.cmp(&b);
    }

    stringify(left).cmp(&stringify(right))
}

/// Parse a JSON string as a date, returning milliseconds since the epoch.
///
/// Only strings are considered; numbers never count as dates.
#[must_use]
pub fn parse_date_millis(value: &Value) -> Option<i64> {
    let Value::String(raw) = value else {
        return None;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.timestamp_millis());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Stringify a value for the lexicographic fallback.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
