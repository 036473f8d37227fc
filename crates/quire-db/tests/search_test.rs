//! Substring search across record kinds.

use quire_db::test_fixtures::{TestDataBuilder, TestStore};
use quire_db::{
    CreateDashboardRequest, CreatePageRequest, DashboardRepository, PageRepository,
    SearchProvider,
};

#[tokio::test]
async fn test_blank_query_returns_empty_groups() {
    let test = TestStore::seeded().await;
    for q in ["", "   "] {
        let results = test.store.search.search(q).await.unwrap();
        assert!(results.is_empty());
    }
    let json = serde_json::to_value(test.store.search.search("").await.unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"databases": [], "pages": [], "dashboards": []})
    );
}

#[tokio::test]
async fn test_no_match_returns_empty_groups() {
    let test = TestStore::seeded().await;
    let results = test.store.search.search("zebra crossing").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let test = TestStore::seeded().await;
    let results = test.store.search.search("DESIGN").await.unwrap();

    let db_names: Vec<_> = results.databases.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(db_names, vec!["Design Project"]);
    // Title match and content match, in storage order.
    let page_ids: Vec<_> = results.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(page_ids, vec!["tpl-2", "2"]);
    assert!(results.dashboards.is_empty());
}

#[tokio::test]
async fn test_search_matches_dashboard_names() {
    let test = TestStore::seeded().await;
    let results = test.store.search.search("home").await.unwrap();
    assert_eq!(results.dashboards.len(), 1);
    assert_eq!(results.dashboards[0].id, "dash-1");
}

#[tokio::test]
async fn test_wildcards_match_literally() {
    let test = TestStore::new().await;
    TestDataBuilder::new(&test.store)
        .with_database("Metrics")
        .await
        .with_page("Growth 50% up", None, None)
        .await
        .with_page("Growth 500 up", None, None)
        .await;
    test.store
        .pages
        .create(CreatePageRequest {
            content: Some("snake_case naming".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    test.store
        .dashboards
        .create(CreateDashboardRequest {
            name: Some("snakeXcase".into()),
            widgets: None,
        })
        .await
        .unwrap();

    let results = test.store.search.search("50%").await.unwrap();
    assert_eq!(results.pages.len(), 1);
    assert_eq!(results.pages[0].title, "Growth 50% up");

    let results = test.store.search.search("snake_case").await.unwrap();
    assert_eq!(results.pages.len(), 1);
    assert!(results.dashboards.is_empty());
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let test = TestStore::new().await;
    TestDataBuilder::new(&test.store)
        .with_page("Über Notes", None, None)
        .await
        .with_page("Ångström units", None, None)
        .await;
    test.store
        .dashboards
        .create(CreateDashboardRequest {
            name: Some("ÉQUIPE".into()),
            widgets: None,
        })
        .await
        .unwrap();

    let results = test.store.search.search("über").await.unwrap();
    let titles: Vec<_> = results.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Über Notes"]);

    let results = test.store.search.search("ÅNGSTRÖM").await.unwrap();
    assert_eq!(results.pages.len(), 1);

    let results = test.store.search.search("équipe").await.unwrap();
    assert_eq!(results.dashboards.len(), 1);
}
