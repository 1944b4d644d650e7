//! Column Projection
//!
//! `"*"` (or an empty list) keeps rows as they are. Otherwise the output row
//! has exactly the named columns, in the order named; columns the row lacks
//! come out as null. Unknown names are never an error.

use serde_json::Value;

use crate::constants::{COLUMNS_ALL, COLUMN_LIST_SEPARATOR};
use crate::row::Row;

/// Split a column list like `"id, title,views"` into names.
///
/// Returns `None` when the list selects every column.
#[must_use]
pub fn parse_columns(columns: &str) -> Option<Vec<&str>> {
    let names: Vec<&str> = columns
        .split(COLUMN_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() || names.iter().any(|name| *name == COLUMNS_ALL) {
        None
    } else {
        Some(names)
    }
}

/// Project one row onto `columns`.
#[must_use]
pub fn pick_columns(row: Row, columns: &str) -> Row {
    let Some(names) = parse_columns(columns) else {
        return row;
    };

    let mut picked = Row::with_capacity(names.len());
    for name in names {
        let value = row.get(name).cloned().unwrap_or(Value::Null);
        picked.insert(name.to_string(), value);
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::row_from_value;
    use serde_json::json;

    fn post() -> Row {
        row_from_value(json!({"id": "1", "title": "Hello", "body": "long text", "views": 4}))
    }

    #[test]
    fn test_star_returns_row_unchanged() {
        assert_eq!(pick_columns(post(), "*"), post());
        assert_eq!(pick_columns(post(), ""), post());
        assert_eq!(pick_columns(post(), " , "), post());
    }

    #[test]
    fn test_projection_keeps_named_columns_in_order() {
        let picked = pick_columns(post(), "views, id");
        assert_eq!(serde_json::Value::Object(picked.clone()), json!({"views": 4, "id": "1"}));
        let keys: Vec<_> = picked.keys().cloned().collect();
        assert_eq!(keys, vec!["views", "id"]);
    }

    #[test]
    fn test_unknown_column_becomes_null() {
        let picked = pick_columns(post(), "id,missing");
        assert_eq!(serde_json::Value::Object(picked), json!({"id": "1", "missing": null}));
    }

    #[test]
    fn test_repeated_column() {
        let picked = pick_columns(post(), "id,id");
        assert_eq!(serde_json::Value::Object(picked), json!({"id": "1"}));
    }

    #[test]
    fn test_parse_columns() {
        assert_eq!(parse_columns("id,title"), Some(vec!["id", "title"]));
        assert_eq!(parse_columns(" id ,, title "), Some(vec!["id", "title"]));
        assert_eq!(parse_columns("*"), None);
    }
}
