//! Substring search across databases, pages, and dashboards.
//!
//! Matching is Unicode case-insensitive containment, done on the decoded
//! rows in storage order. The query has no wildcard syntax.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use quire_core::logging::SUBSYSTEM_DB;
use quire_core::{Error, Result, SearchProvider, SearchResults};

use crate::dashboards::{dashboard_from_row, DASHBOARD_COLUMNS};
use crate::databases::{database_from_row, DATABASE_COLUMNS};
use crate::pages::{PageRow, PAGE_COLUMNS};

/// SQLite implementation of SearchProvider.
#[derive(Clone)]
pub struct SqliteSearch {
    pool: Pool<Sqlite>,
}

impl SqliteSearch {
    /// Create a new SqliteSearch with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchProvider for SqliteSearch {
    async fn search(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }

        let start = Instant::now();
        let needle = query.to_lowercase();

        let databases = sqlx::query(&format!(
            "SELECT {} FROM databases ORDER BY rowid",
            DATABASE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let pages = sqlx::query(&format!("SELECT {} FROM pages ORDER BY rowid", PAGE_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let dashboards = sqlx::query(&format!(
            "SELECT {} FROM dashboards ORDER BY rowid",
            DASHBOARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let results = SearchResults {
            databases: databases
                .iter()
                .filter(|r| contains_folded(&r.get::<String, _>("name"), &needle))
                .map(database_from_row)
                .collect(),
            pages: pages
                .iter()
                .filter(|r| {
                    contains_folded(&r.get::<String, _>("title"), &needle)
                        || contains_folded(&r.get::<String, _>("content"), &needle)
                })
                .map(|r| PageRow::from_row(r).into_page())
                .collect(),
            dashboards: dashboards
                .iter()
                .filter(|r| contains_folded(&r.get::<String, _>("name"), &needle))
                .map(dashboard_from_row)
                .collect(),
        };

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "search",
            op = "search",
            query = %query,
            result_count = results.databases.len() + results.pages.len() + results.dashboards.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(results)
    }
}

/// `needle` must already be lowercased.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
