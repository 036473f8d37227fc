//! Overlapping edits against a file-backed store with several connections.

use std::collections::HashSet;

use quire_db::{
    AddColumnRequest, AddWidgetRequest, CreateDashboardRequest, CreateDatabaseRequest,
    CreatePageRequest, DashboardRepository, DatabaseRepository, DeleteStrategy, PageRepository,
    Store, UpdatePageRequest,
};
use serde_json::json;
use tempfile::TempDir;

async fn file_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("quire.sqlite").display());
    let store = Store::connect(&url).await.expect("file store");
    store.migrate().await.expect("migrations");
    (dir, store)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_page_updates_all_apply() {
    let (_dir, store) = file_store().await;
    let page = store
        .pages
        .create(CreatePageRequest::default())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = store.clone();
        let id = page.id.clone();
        handles.push(tokio::spawn(async move {
            let req: UpdatePageRequest =
                serde_json::from_value(json!({"title": format!("Draft {}", i)})).unwrap();
            store.pages.update(&id, req).await
        }));
    }

    let mut titles = HashSet::new();
    for handle in handles {
        let updated = handle.await.unwrap().expect("update succeeds");
        titles.insert(updated.title);
    }
    assert_eq!(titles.len(), 40);

    let last = store.pages.get(&page.id).await.unwrap().unwrap();
    assert!(titles.contains(&last.title));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_column_adds_are_not_lost() {
    let (_dir, store) = file_store().await;
    let db = store
        .databases
        .create(CreateDatabaseRequest::default())
        .await
        .unwrap();
    let before = db.columns.len();

    let mut handles = Vec::new();
    for i in 0..12 {
        let store = store.clone();
        let id = db.id.clone();
        handles.push(tokio::spawn(async move {
            store
                .databases
                .add_column(
                    &id,
                    AddColumnRequest {
                        name: format!("Field {}", i),
                        column_type: None,
                        options: None,
                    },
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("add column succeeds");
    }

    let db = store.databases.get(&db.id).await.unwrap().unwrap();
    assert_eq!(db.columns.len(), before + 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_widget_adds_and_deletes() {
    let (_dir, store) = file_store().await;
    let dash = store
        .dashboards
        .create(CreateDashboardRequest::default())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = store.clone();
        let id = dash.id.clone();
        handles.push(tokio::spawn(async move {
            store
                .dashboards
                .add_widget(
                    &id,
                    AddWidgetRequest {
                        widget_type: "notes".into(),
                        database_id: None,
                        view_mode: None,
                    },
                )
                .await
                .map(|_| ())
        }));
    }
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let page = store
                .pages
                .create(CreatePageRequest {
                    title: Some(format!("Scratch {}", i)),
                    ..Default::default()
                })
                .await?;
            store
                .pages
                .delete(&page.id, DeleteStrategy::Recursive)
                .await
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("edit succeeds");
    }

    let dash = store.dashboards.get(&dash.id).await.unwrap().unwrap();
    assert_eq!(dash.widgets.len(), 10);
    assert!(store.pages.list(None).await.unwrap().is_empty());
}
