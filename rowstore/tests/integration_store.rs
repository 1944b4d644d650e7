//! Integration Tests for the `RowStore` Façade

use anyhow::Result;
use rowstore::config::{ENV_BACKEND, ENV_DATABASE_URL, ENV_DATA_DIR};
use rowstore::{BackendKind, Filter, ListOptions, OrderBy, RowStore, StoreConfig, StoreError};
use rowstore_core::row_from_value;
use serde_json::json;
use tempfile::TempDir;

fn config_from(vars: &[(&str, String)]) -> StoreConfig {
    let vars = vars.to_vec();
    StoreConfig::from_lookup(move |key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
    })
    .expect("valid config")
}

// =============================================================================
// Backend Selection
// =============================================================================

#[tokio::test]
async fn test_json_backend_selected_from_variables() -> Result<()> {
    let dir = TempDir::new()?;
    let config = config_from(&[
        (ENV_BACKEND, "json".to_string()),
        (ENV_DATA_DIR, dir.path().display().to_string()),
    ]);
    let store = RowStore::from_config(&config);
    assert_eq!(store.backend_name(), Some("file"));

    store.insert_rows("posts", json!({"id": "1"})).await?;
    assert!(dir.path().join("table-posts.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_sql_without_url_fails_fast() {
    let config = config_from(&[(ENV_BACKEND, "mysql".to_string())]);
    let store = RowStore::from_config(&config);

    let err = store
        .list_rows("posts", &ListOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Config { .. }));
    if cfg!(feature = "mysql") {
        assert!(err.to_string().contains(ENV_DATABASE_URL));
    }

    // Same error again; nothing silently falls back to another backend.
    let again = store.insert_rows("posts", json!({"id": "1"})).await.unwrap_err();
    assert_eq!(err.to_string(), again.to_string());
}

#[cfg(feature = "mysql")]
#[tokio::test]
async fn test_sql_store_builds_without_connecting() {
    let config = StoreConfig::new()
        .with_backend(BackendKind::Sql)
        .with_database_url("mysql://nobody@127.0.0.1:1/none");
    let store = RowStore::from_config(&config);
    assert_eq!(store.backend_name(), Some("mysql"));

    // Table names are still checked before any connection attempt.
    let err = store
        .delete_rows("Bad Name!", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTableName(_)));
}

// =============================================================================
// Operations Through the Façade
// =============================================================================

#[tokio::test]
async fn test_content_workflow() -> Result<()> {
    let store = RowStore::from_config(&StoreConfig::new().with_backend(BackendKind::Memory));

    store
        .insert_rows(
            "posts",
            json!([
                {"id": "p1", "title": "Hello", "status": "draft", "date": "2024-01-05"},
                {"id": "p2", "title": "World", "status": "draft", "date": "2024-03-01"}
            ]),
        )
        .await?;

    let published = store
        .update_rows(
            "posts",
            &row_from_value(json!({"status": "published"})),
            &[Filter::eq("id", "p2")],
        )
        .await?;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0]["status"], json!("published"));

    store
        .upsert_rows("posts", json!({"id": "p1", "title": "Hello again"}), Some("id"))
        .await?;

    let latest = store
        .list_rows(
            "posts",
            &ListOptions::new()
                .order_by(OrderBy::desc("date"))
                .columns("id,title")
                .single(),
        )
        .await?
        .into_single();
    assert_eq!(latest, Some(row_from_value(json!({"id": "p2", "title": "World"}))));

    let removed = store
        .delete_rows("posts", &[Filter::neq("status", "published")])
        .await?;
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0]["title"], json!("Hello again"));

    let remaining = store.list_rows("posts", &ListOptions::new()).await?;
    assert_eq!(remaining.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_non_object_values_are_dropped() -> Result<()> {
    let store = RowStore::from_config(&StoreConfig::new().with_backend(BackendKind::Memory));

    let inserted = store.insert_rows("posts", json!("not a row")).await?;
    assert!(inserted.is_empty());

    let inserted = store.insert_rows("posts", json!([1, {"id": "ok"}, null])).await?;
    assert_eq!(inserted, vec![row_from_value(json!({"id": "ok"}))]);
    Ok(())
}
