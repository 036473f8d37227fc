//! Test fixtures for store integration tests.
//!
//! Every [`TestStore`] is a private in-memory SQLite database with the
//! migrations applied, so tests never share state and need no server.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quire_db::test_fixtures::{TestDataBuilder, TestStore};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let test = TestStore::new().await;
//!     let data = TestDataBuilder::new(&test.store)
//!         .with_database("Tasks")
//!         .await
//!         .with_page("Write docs", Some("Todo"), None)
//!         .await;
//!
//!     // Run your tests...
//! }
//! ```

use serde_json::json;

use crate::pool::create_pool_with_config;
use crate::{
    CreateDatabaseRequest, CreatePageRequest, DatabaseRepository, PageRepository, PoolConfig,
    Store,
};

/// URL of a private in-memory database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Migrated in-memory store.
pub struct TestStore {
    pub store: Store,
}

impl TestStore {
    /// Create an empty, migrated store.
    pub async fn new() -> Self {
        let pool = create_pool_with_config(IN_MEMORY_URL, PoolConfig::in_memory())
            .await
            .expect("Failed to create in-memory pool");
        let store = Store::new(pool);
        store.migrate().await.expect("Failed to run migrations");
        Self { store }
    }

    /// Create a migrated store holding the demo data.
    pub async fn seeded() -> Self {
        let test = Self::new().await;
        crate::seed_demo_data(&test.store)
            .await
            .expect("Failed to seed demo data");
        test
    }
}

/// Builder for test data with fluent API.
///
/// Pages are added to the most recently created database.
pub struct TestDataBuilder<'a> {
    store: &'a Store,
    pub database_ids: Vec<String>,
    pub page_ids: Vec<String>,
}

impl<'a> TestDataBuilder<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            database_ids: Vec::new(),
            page_ids: Vec::new(),
        }
    }

    /// Create a database with the default column schema.
    pub async fn with_database(mut self, name: &str) -> Self {
        let db = self
            .store
            .databases
            .create(CreateDatabaseRequest {
                name: Some(name.to_string()),
                icon: None,
            })
            .await
            .expect("Failed to create test database");
        self.database_ids.push(db.id);
        self
    }

    /// Create a page in the current database, optionally with a status and a
    /// parent.
    pub async fn with_page(
        mut self,
        title: &str,
        status: Option<&str>,
        parent_id: Option<&str>,
    ) -> Self {
        let properties = status.map(|s| json!({ "status": s }).into());
        let page = self
            .store
            .pages
            .create(CreatePageRequest {
                title: Some(title.to_string()),
                properties,
                parent_id: parent_id.map(str::to_string),
                database_id: self.database_ids.last().cloned(),
                ..Default::default()
            })
            .await
            .expect("Failed to create test page");
        self.page_ids.push(page.id);
        self
    }

    /// Create a template page in the current database.
    pub async fn with_template(mut self, title: &str, content: &str) -> Self {
        let page = self
            .store
            .pages
            .create(CreatePageRequest {
                title: Some(title.to_string()),
                content: Some(content.to_string()),
                properties: Some(json!({ "status": "Todo" }).into()),
                database_id: self.database_ids.last().cloned(),
                is_template: Some(true),
                ..Default::default()
            })
            .await
            .expect("Failed to create test template");
        self.page_ids.push(page.id);
        self
    }

    /// Id of the most recently created database.
    pub fn database_id(&self) -> &str {
        self.database_ids
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }
}
