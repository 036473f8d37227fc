//! Core traits for quire abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// RECORD REPOSITORY TRAITS
// =============================================================================

/// Repository for databases and their embedded column schema.
#[async_trait]
pub trait DatabaseRepository: Send + Sync {
    /// Create a database with the default column schema.
    async fn create(&self, req: CreateDatabaseRequest) -> Result<Database>;

    /// Fetch a database by id.
    async fn get(&self, id: &str) -> Result<Option<Database>>;

    /// List all databases in storage order.
    async fn list(&self) -> Result<Vec<Database>>;

    /// Coalesce-merge update.
    async fn update(&self, id: &str, req: UpdateDatabaseRequest) -> Result<Database>;

    /// Delete a database and every page it owns.
    async fn delete(&self, id: &str) -> Result<DeleteResult>;

    /// Append a column. Its id is a slug of the name, made unique.
    async fn add_column(&self, id: &str, req: AddColumnRequest) -> Result<Database>;

    /// Rename a column, keeping its id.
    async fn rename_column(&self, id: &str, column_id: &str, name: &str) -> Result<Database>;

    /// Remove a column. Page property values under its id are left in place.
    async fn remove_column(&self, id: &str, column_id: &str) -> Result<Database>;

    /// Import a database and its pages under fresh ids.
    async fn import(&self, payload: ImportPayload) -> Result<Database>;

    /// Export a database and all of its pages.
    async fn export(&self, id: &str) -> Result<ExportBundle>;
}

/// Repository for pages.
#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn create(&self, req: CreatePageRequest) -> Result<Page>;

    async fn get(&self, id: &str) -> Result<Option<Page>>;

    /// List pages, optionally only those of one database. Templates included.
    async fn list(&self, database_id: Option<&str>) -> Result<Vec<Page>>;

    /// Coalesce-merge update. An empty request returns the page unchanged.
    async fn update(&self, id: &str, req: UpdatePageRequest) -> Result<Page>;

    async fn delete(&self, id: &str, strategy: DeleteStrategy) -> Result<DeleteResult>;

    /// Template pages of a database.
    async fn list_templates(&self, database_id: &str) -> Result<Vec<Page>>;

    /// Create a live page from a template.
    async fn instantiate_template(
        &self,
        template_id: &str,
        req: InstantiateTemplateRequest,
    ) -> Result<Page>;
}

/// Repository for dashboards and their widget layout.
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn create(&self, req: CreateDashboardRequest) -> Result<Dashboard>;

    async fn get(&self, id: &str) -> Result<Option<Dashboard>>;

    async fn list(&self) -> Result<Vec<Dashboard>>;

    async fn update(&self, id: &str, req: UpdateDashboardRequest) -> Result<Dashboard>;

    async fn delete(&self, id: &str) -> Result<DeleteResult>;

    /// Append a widget at the bottom of the layout.
    async fn add_widget(&self, id: &str, req: AddWidgetRequest) -> Result<Dashboard>;

    async fn remove_widget(&self, id: &str, widget_id: &str) -> Result<Dashboard>;

    /// Apply new geometry to existing widgets; unknown ids are ignored.
    async fn apply_layout(&self, id: &str, items: Vec<LayoutItem>) -> Result<Dashboard>;
}

// =============================================================================
// SEARCH TRAITS
// =============================================================================

/// Provider for substring search across all record kinds.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search names, titles, and page content. A blank query returns
    /// empty groups.
    async fn search(&self, query: &str) -> Result<SearchResults>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
