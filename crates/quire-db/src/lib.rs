//! # quire-db
//!
//! SQLite record store for quire.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for databases, pages, and dashboards
//! - Case-insensitive substring search across all three record kinds
//! - Transactional import/export and demo seed data
//!
//! ## Example
//!
//! ```rust,ignore
//! use quire_db::{CreateDatabaseRequest, DatabaseRepository, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::connect("sqlite://quire.sqlite").await?;
//!     store.migrate().await?;
//!
//!     let db = store.databases.create(CreateDatabaseRequest {
//!         name: Some("Tasks".to_string()),
//!         icon: None,
//!     }).await?;
//!
//!     println!("Created database: {}", db.id);
//!     Ok(())
//! }
//! ```
pub mod dashboards;
pub mod databases;
pub mod pages;
pub mod pool;
pub mod search;
pub mod seed;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use them
pub mod test_fixtures;

// Re-export core types
pub use quire_core::*;

use sqlx::{Sqlite, SqlitePool, Transaction};

/// Begin a transaction that takes the write lock up front.
///
/// Read-then-write edits must start here; overlapping edits then wait on the
/// busy timeout and apply in turn.
pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(Error::Database)
}

// Re-export repository implementations
pub use dashboards::SqliteDashboardRepository;
pub use databases::SqliteDatabaseRepository;
pub use pages::SqlitePageRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use search::SqliteSearch;
pub use seed::seed_demo_data;

/// Combined store context with all repositories.
#[derive(Clone)]
pub struct Store {
    /// The underlying connection pool.
    pub pool: SqlitePool,
    /// Database (collection) repository, including column schema edits.
    pub databases: SqliteDatabaseRepository,
    /// Page repository.
    pub pages: SqlitePageRepository,
    /// Dashboard repository, including widget layout edits.
    pub dashboards: SqliteDashboardRepository,
    /// Substring search provider.
    pub search: SqliteSearch,
}

impl Store {
    /// Create a new Store from a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            databases: SqliteDatabaseRepository::new(pool.clone()),
            pages: SqlitePageRepository::new(pool.clone()),
            dashboards: SqliteDashboardRepository::new(pool.clone()),
            search: SqliteSearch::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Store by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
