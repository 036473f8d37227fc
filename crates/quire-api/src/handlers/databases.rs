//! Database HTTP handlers.
//!
//! CRUD, column schema edits, import/export, and the database-scoped view
//! projections (board, tree, calendar, templates).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use quire_core::{
    board, calendar, project_csv, project_markdown, AddColumnRequest, CreateDatabaseRequest,
    Database, DatabaseRepository, DeleteResult, Error, ExportBundle, ImportPayload, Page,
    PageRepository, PageTree, RenameColumnRequest, UpdateDatabaseRequest,
};

use crate::{ApiError, AppState};

/// Body of a file import.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImportRequest {
    pub file_name: String,
    pub text: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Query parameters for the board view.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    /// List the children of this page instead of the root level.
    pub parent_id: Option<String>,
}

async fn load(state: &AppState, id: &str) -> Result<Database, ApiError> {
    Ok(state
        .store
        .databases
        .get(id)
        .await?
        .ok_or_else(|| Error::database_not_found(id))?)
}

async fn load_with_pages(state: &AppState, id: &str) -> Result<(Database, Vec<Page>), ApiError> {
    let database = load(state, id).await?;
    let pages = state.store.pages.list(Some(id)).await?;
    Ok((database, pages))
}

/// List all databases.
#[utoipa::path(get, path = "/api/databases", tag = "Databases",
    responses((status = 200, description = "All databases", body = [Database])))]
pub async fn list_databases(State(state): State<AppState>) -> Result<Json<Vec<Database>>, ApiError> {
    Ok(Json(state.store.databases.list().await?))
}

/// Create a database with the default columns.
#[utoipa::path(post, path = "/api/databases", tag = "Databases",
    request_body = CreateDatabaseRequest,
    responses((status = 201, description = "Created", body = Database)))]
pub async fn create_database(
    State(state): State<AppState>,
    Json(req): Json<CreateDatabaseRequest>,
) -> Result<(StatusCode, Json<Database>), ApiError> {
    let database = state.store.databases.create(req).await?;
    Ok((StatusCode::CREATED, Json(database)))
}

#[utoipa::path(get, path = "/api/databases/{id}", tag = "Databases",
    params(("id" = String, Path, description = "Database id")),
    responses(
        (status = 200, description = "The database", body = Database),
        (status = 404, description = "Not found")))]
pub async fn get_database(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Database>, ApiError> {
    Ok(Json(load(&state, &id).await?))
}

pub async fn update_database(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDatabaseRequest>,
) -> Result<Json<Database>, ApiError> {
    Ok(Json(state.store.databases.update(&id, req).await?))
}

/// Delete a database and all of its pages.
#[utoipa::path(delete, path = "/api/databases/{id}", tag = "Databases",
    params(("id" = String, Path, description = "Database id")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResult),
        (status = 404, description = "Not found")))]
pub async fn delete_database(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.store.databases.delete(&id).await?))
}

// =============================================================================
// COLUMNS
// =============================================================================

#[utoipa::path(post, path = "/api/databases/{id}/columns", tag = "Databases",
    params(("id" = String, Path, description = "Database id")),
    request_body = AddColumnRequest,
    responses(
        (status = 200, description = "Updated database", body = Database),
        (status = 400, description = "Unknown column type")))]
pub async fn add_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddColumnRequest>,
) -> Result<Json<Database>, ApiError> {
    Ok(Json(state.store.databases.add_column(&id, req).await?))
}

pub async fn rename_column(
    State(state): State<AppState>,
    Path((id, column_id)): Path<(String, String)>,
    Json(req): Json<RenameColumnRequest>,
) -> Result<Json<Database>, ApiError> {
    Ok(Json(
        state
            .store
            .databases
            .rename_column(&id, &column_id, &req.name)
            .await?,
    ))
}

pub async fn remove_column(
    State(state): State<AppState>,
    Path((id, column_id)): Path<(String, String)>,
) -> Result<Json<Database>, ApiError> {
    Ok(Json(
        state.store.databases.remove_column(&id, &column_id).await?,
    ))
}

// =============================================================================
// IMPORT / EXPORT
// =============================================================================

/// Import a database and its pages under fresh ids.
#[utoipa::path(post, path = "/api/databases/import", tag = "Import",
    responses(
        (status = 201, description = "Imported database", body = Database),
        (status = 400, description = "Payload lacks database or pages")))]
pub async fn import_database(
    State(state): State<AppState>,
    Json(payload): Json<ImportPayload>,
) -> Result<(StatusCode, Json<Database>), ApiError> {
    let database = state.store.databases.import(payload).await?;
    Ok((StatusCode::CREATED, Json(database)))
}

/// Import a CSV file as a new database.
pub async fn import_csv(
    State(state): State<AppState>,
    Json(req): Json<FileImportRequest>,
) -> Result<(StatusCode, Json<Database>), ApiError> {
    let payload = project_csv(&req.file_name, &req.text)?;
    let database = state.store.databases.import(payload).await?;
    Ok((StatusCode::CREATED, Json(database)))
}

/// Import a Markdown file as one page of an existing database.
pub async fn import_markdown(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FileImportRequest>,
) -> Result<(StatusCode, Json<Page>), ApiError> {
    load(&state, &id).await?;
    let page = state
        .store
        .pages
        .create(project_markdown(&req.file_name, &req.text, &id, req.parent_id))
        .await?;
    Ok((StatusCode::CREATED, Json(page)))
}

#[utoipa::path(get, path = "/api/databases/{id}/export", tag = "Import",
    params(("id" = String, Path, description = "Database id")),
    responses(
        (status = 200, description = "Database and pages", body = ExportBundle),
        (status = 404, description = "Not found")))]
pub async fn export_database(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExportBundle>, ApiError> {
    Ok(Json(state.store.databases.export(&id).await?))
}

// =============================================================================
// PROJECTIONS
// =============================================================================

pub async fn list_templates(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Page>>, ApiError> {
    load(&state, &id).await?;
    Ok(Json(state.store.pages.list_templates(&id).await?))
}

/// Status lanes for the root level, or for the children of `parentId`.
pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<JsonValue>, ApiError> {
    let (database, pages) = load_with_pages(&state, &id).await?;
    let view = board(&database.columns, &pages, query.parent_id.as_deref());
    Ok(Json(serde_json::to_value(&view)?))
}

pub async fn get_tree(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    let (_, pages) = load_with_pages(&state, &id).await?;
    Ok(Json(serde_json::to_value(PageTree::build(&pages))?))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    let (database, pages) = load_with_pages(&state, &id).await?;
    Ok(Json(serde_json::to_value(calendar(
        &database.columns,
        &pages,
    ))?))
}
