//! Page HTTP handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use quire_core::{
    breadcrumbs, children, progress, CreatePageRequest, Crumb, DatabaseRepository,
    DeleteResult, DeleteStrategy, Error, InstantiateTemplateRequest, Page, PageRepository,
    Progress, UpdatePageRequest,
};

use crate::{ApiError, AppState};

/// Query parameters for listing pages.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPagesQuery {
    /// Only pages of this database.
    pub database_id: Option<String>,
}

/// Query parameters for deleting a page.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeletePageQuery {
    /// `recursive` removes every descendant; the default removes one level.
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub cascade: DeleteStrategy,
}

async fn load(state: &AppState, id: &str) -> Result<Page, ApiError> {
    Ok(state
        .store
        .pages
        .get(id)
        .await?
        .ok_or_else(|| Error::page_not_found(id))?)
}

/// Pages sharing `page`'s database, or every page when it has none.
async fn siblings_scope(state: &AppState, page: &Page) -> Result<Vec<Page>, ApiError> {
    Ok(state.store.pages.list(page.database_id.as_deref()).await?)
}

/// List pages, optionally those of one database. Templates are included.
#[utoipa::path(get, path = "/api/pages", tag = "Pages",
    responses((status = 200, description = "Pages in storage order", body = [Page])))]
pub async fn list_pages(
    State(state): State<AppState>,
    Query(query): Query<ListPagesQuery>,
) -> Result<Json<Vec<Page>>, ApiError> {
    Ok(Json(
        state.store.pages.list(query.database_id.as_deref()).await?,
    ))
}

pub async fn create_page(
    State(state): State<AppState>,
    Json(req): Json<CreatePageRequest>,
) -> Result<(StatusCode, Json<Page>), ApiError> {
    let page = state.store.pages.create(req).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

#[utoipa::path(get, path = "/api/pages/{id}", tag = "Pages",
    params(("id" = String, Path, description = "Page id")),
    responses(
        (status = 200, description = "The page", body = Page),
        (status = 404, description = "Not found")))]
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Page>, ApiError> {
    Ok(Json(load(&state, &id).await?))
}

/// Partial update. `parentId: null` detaches the page.
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePageRequest>,
) -> Result<Json<Page>, ApiError> {
    Ok(Json(state.store.pages.update(&id, req).await?))
}

#[utoipa::path(delete, path = "/api/pages/{id}", tag = "Pages",
    params(("id" = String, Path, description = "Page id")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResult),
        (status = 404, description = "Not found")))]
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeletePageQuery>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.store.pages.delete(&id, query.cascade).await?))
}

/// Create a live page from a template. The body is optional.
#[utoipa::path(post, path = "/api/pages/{id}/instantiate", tag = "Pages",
    params(("id" = String, Path, description = "Template page id")),
    request_body = InstantiateTemplateRequest,
    responses(
        (status = 201, description = "New page", body = Page),
        (status = 400, description = "Page is not a template")))]
pub async fn instantiate_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<InstantiateTemplateRequest>>,
) -> Result<(StatusCode, Json<Page>), ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let page = state.store.pages.instantiate_template(&id, req).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn get_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Page>>, ApiError> {
    let page = load(&state, &id).await?;
    let pages = siblings_scope(&state, &page).await?;
    Ok(Json(
        children(&pages, Some(page.id.as_str())).into_iter().cloned().collect(),
    ))
}

/// Root-first path ending at this page.
pub async fn get_breadcrumbs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Crumb>>, ApiError> {
    let page = load(&state, &id).await?;
    let pages = siblings_scope(&state, &page).await?;
    let crumbs = breadcrumbs(&pages, Some(page.id.as_str()))
        .into_iter()
        .map(|p| Crumb {
            id: p.id.clone(),
            title: p.title.clone(),
        })
        .collect();
    Ok(Json(crumbs))
}

/// Sub-task completion; `null` when the page has no sub-tasks.
#[utoipa::path(get, path = "/api/pages/{id}/progress", tag = "Pages",
    params(("id" = String, Path, description = "Page id")),
    responses(
        (status = 200, description = "Completion, or null without sub-tasks", body = Progress),
        (status = 404, description = "Not found")))]
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Progress>>, ApiError> {
    let page = load(&state, &id).await?;
    let columns = match page.database_id.as_deref() {
        Some(db) => state
            .store
            .databases
            .get(db)
            .await?
            .map(|d| d.columns)
            .unwrap_or_default(),
        None => Vec::new(),
    };
    let pages = siblings_scope(&state, &page).await?;
    Ok(Json(progress(&columns, &pages, &page.id)))
}
