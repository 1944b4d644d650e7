//! Mutation Semantics
//!
//! How insert, upsert, update and delete change a table's row list. Backends
//! load their rows (under whatever lock they use), call these functions, and
//! persist the outcome. Functions report positions rather than copies so the
//! SQL backend can map each touched row back to its primary key.

use std::collections::BTreeSet;

use crate::constants::{COLUMN_LIST_SEPARATOR, CONFLICT_COLUMNS_DEFAULT};
use crate::query::{row_matches, values_equal, Filter};
use crate::row::Row;

// =============================================================================
// ConflictColumns
// =============================================================================

/// Columns that decide whether an upserted row matches an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictColumns(Vec<String>);

impl ConflictColumns {
    /// Parse a comma-separated list. Blank entries are dropped; a list with
    /// no names falls back to `"id"`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let columns: Vec<String> = raw
            .split(COLUMN_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if columns.is_empty() {
            Self::default()
        } else {
            Self(columns)
        }
    }

    /// Column names, in the order given.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Whether `existing` and `incoming` are the same logical row: every
    /// conflict column is present on both and strictly equal.
    #[must_use]
    pub fn matches(&self, existing: &Row, incoming: &Row) -> bool {
        self.0.iter().all(|column| match (existing.get(column), incoming.get(column)) {
            (Some(a), Some(b)) => values_equal(Some(a), Some(b)),
            _ => false,
        })
    }
}

impl Default for ConflictColumns {
    fn default() -> Self {
        Self(vec![CONFLICT_COLUMNS_DEFAULT.to_string()])
    }
}

impl From<&str> for ConflictColumns {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Option<&str>> for ConflictColumns {
    fn from(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::default, Self::parse)
    }
}

// =============================================================================
// Row Operations
// =============================================================================

/// Shallow-merge `patch` over `target`: patch values win, keys only in
/// `target` are kept, new keys are appended.
pub fn merge_row(target: &mut Row, patch: &Row) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

/// Positions of the rows that satisfy every filter.
#[must_use]
pub fn matching_indices(rows: &[Row], filters: &[Filter]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, filters))
        .map(|(index, _)| index)
        .collect()
}

/// Outcome of [`apply_upsert`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Position of the changed row for each incoming row, in input order
    pub changed: Vec<usize>,
    /// Pre-existing rows that were merged into (deduplicated, ascending)
    pub merged: BTreeSet<usize>,
    /// Number of rows present before the upsert; positions at or past this
    /// were appended
    pub original_len: usize,
}

impl UpsertOutcome {
    /// Positions of appended rows, ascending.
    pub fn appended(&self, rows_len: usize) -> std::ops::Range<usize> {
        self.original_len..rows_len
    }

    /// The changed rows, in input order, as they look after the whole batch.
    #[must_use]
    pub fn changed_rows(&self, rows: &[Row]) -> Vec<Row> {
        self.changed.iter().map(|&index| rows[index].clone()).collect()
    }
}

/// Upsert `incoming` into `rows`.
///
/// Each incoming row is compared, by linear scan, to the current rows (which
/// includes rows appended earlier in the same batch). The first match is
/// shallow-merged in place; with no match the row is appended.
pub fn apply_upsert(
    rows: &mut Vec<Row>,
    incoming: impl IntoIterator<Item = Row>,
    conflict: &ConflictColumns,
) -> UpsertOutcome {
    let mut outcome = UpsertOutcome {
        original_len: rows.len(),
        ..UpsertOutcome::default()
    };

    for row in incoming {
        match rows.iter().position(|existing| conflict.matches(existing, &row)) {
            Some(index) => {
                merge_row(&mut rows[index], &row);
                if index < outcome.original_len {
                    outcome.merged.insert(index);
                }
                outcome.changed.push(index);
            }
            None => {
                rows.push(row);
                outcome.changed.push(rows.len() - 1);
            }
        }
    }

    outcome
}

/// Merge `patch` into every row matching `filters`.
///
/// Returns the positions updated; those rows are what an update reports,
/// even if the patch changed the columns the filters looked at.
pub fn apply_update(rows: &mut [Row], patch: &Row, filters: &[Filter]) -> Vec<usize> {
    let updated = matching_indices(rows, filters);
    for &index in &updated {
        merge_row(&mut rows[index], patch);
    }
    updated
}

/// Remove every row matching `filters`, returning the removed rows in order.
pub fn apply_delete(rows: &mut Vec<Row>, filters: &[Filter]) -> Vec<Row> {
    let (removed, kept): (Vec<Row>, Vec<Row>) = std::mem::take(rows)
        .into_iter()
        .partition(|row| row_matches(row, filters));
    *rows = kept;
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::row_from_value;
    use serde_json::{json, Value};

    fn row(value: Value) -> Row {
        row_from_value(value)
    }

    #[test]
    fn test_conflict_columns_parse() {
        assert_eq!(ConflictColumns::parse("id").names(), ["id"]);
        assert_eq!(ConflictColumns::parse(" site , slug ").names(), ["site", "slug"]);
        assert_eq!(ConflictColumns::parse(" , "), ConflictColumns::default());
        assert_eq!(ConflictColumns::from(None), ConflictColumns::default());
    }

    #[test]
    fn test_conflict_requires_column_on_both_rows() {
        let conflict = ConflictColumns::default();
        assert!(!conflict.matches(&row(json!({"title": "a"})), &row(json!({"title": "a"}))));
        assert!(!conflict.matches(&row(json!({"id": null})), &row(json!({"title": "a"}))));
        assert!(conflict.matches(&row(json!({"id": null})), &row(json!({"id": null}))));
    }

    #[test]
    fn test_upsert_merges_not_replaces() {
        let mut rows = vec![row(json!({"id": "1", "title": "A", "views": 5}))];
        let outcome = apply_upsert(
            &mut rows,
            vec![row(json!({"id": "1", "title": "B"}))],
            &ConflictColumns::default(),
        );

        assert_eq!(Value::Object(rows[0].clone()), json!({"id": "1", "title": "B", "views": 5}));
        assert_eq!(outcome.changed, vec![0]);
        assert!(outcome.merged.contains(&0));
        assert!(outcome.appended(rows.len()).is_empty());
    }

    #[test]
    fn test_upsert_appends_when_no_match() {
        let mut rows = vec![row(json!({"id": "1", "title": "A"}))];
        let outcome = apply_upsert(
            &mut rows,
            vec![row(json!({"id": "2", "title": "C"}))],
            &ConflictColumns::default(),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(Value::Object(rows[1].clone()), json!({"id": "2", "title": "C"}));
        assert_eq!(outcome.changed_rows(&rows), vec![row(json!({"id": "2", "title": "C"}))]);
        assert_eq!(outcome.appended(rows.len()), 1..2);
    }

    #[test]
    fn test_upsert_batch_can_match_its_own_appends() {
        let mut rows = Vec::new();
        let outcome = apply_upsert(
            &mut rows,
            vec![
                row(json!({"id": "n", "title": "first"})),
                row(json!({"id": "n", "views": 1})),
            ],
            &ConflictColumns::default(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(outcome.changed, vec![0, 0]);
        assert!(outcome.merged.is_empty());
        // Both entries report the final state of the row.
        let expected = row(json!({"id": "n", "title": "first", "views": 1}));
        assert_eq!(outcome.changed_rows(&rows), vec![expected.clone(), expected]);
    }

    #[test]
    fn test_upsert_composite_conflict() {
        let mut rows = vec![
            row(json!({"site": "a", "slug": "home", "v": 1})),
            row(json!({"site": "b", "slug": "home", "v": 1})),
        ];
        apply_upsert(
            &mut rows,
            vec![row(json!({"site": "b", "slug": "home", "v": 2}))],
            &ConflictColumns::parse("site,slug"),
        );
        assert_eq!(rows[0]["v"], 1);
        assert_eq!(rows[1]["v"], 2);
    }

    #[test]
    fn test_update_returns_updated_rows() {
        let mut rows = vec![
            row(json!({"id": "1", "status": "draft"})),
            row(json!({"id": "2", "status": "published"})),
            row(json!({"id": "3", "status": "draft"})),
        ];
        let updated = apply_update(
            &mut rows,
            &row(json!({"status": "published"})),
            &[Filter::eq("status", "draft")],
        );

        assert_eq!(updated, vec![0, 2]);
        assert!(rows.iter().all(|r| r["status"] == "published"));
    }

    #[test]
    fn test_update_without_filters_touches_everything() {
        let mut rows = vec![row(json!({"id": "1"})), row(json!({"id": "2"}))];
        let updated = apply_update(&mut rows, &row(json!({"flag": true})), &[]);
        assert_eq!(updated, vec![0, 1]);
        assert!(rows.iter().all(|r| r["flag"] == true));
    }

    #[test]
    fn test_delete_partitions() {
        let mut rows = vec![
            row(json!({"id": "1"})),
            row(json!({"id": "2"})),
            row(json!({"id": "3"})),
        ];
        let removed = apply_delete(&mut rows, &[Filter::neq("id", "2")]);

        assert_eq!(removed, vec![row(json!({"id": "1"})), row(json!({"id": "3"}))]);
        assert_eq!(rows, vec![row(json!({"id": "2"}))]);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut rows = vec![row(json!({"id": "1"}))];
        let removed = apply_delete(&mut rows, &[Filter::eq("id", "missing")]);
        assert!(removed.is_empty());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_merge_keeps_key_order() {
        let mut target = row(json!({"id": "1", "title": "A", "views": 5}));
        merge_row(&mut target, &row(json!({"extra": 1, "title": "B"})));
        let keys: Vec<_> = target.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "title", "views", "extra"]);
    }
}
