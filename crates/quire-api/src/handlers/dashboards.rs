//! Dashboard HTTP handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value as JsonValue;

use quire_core::{
    render_dashboard, AddWidgetRequest, CreateDashboardRequest, Dashboard, DashboardRepository,
    DatabaseRepository, DeleteResult, Error, LayoutItem, PageRepository, UpdateDashboardRequest,
};

use crate::{ApiError, AppState};

#[utoipa::path(get, path = "/api/dashboards", tag = "Dashboards",
    responses((status = 200, description = "All dashboards", body = [Dashboard])))]
pub async fn list_dashboards(
    State(state): State<AppState>,
) -> Result<Json<Vec<Dashboard>>, ApiError> {
    Ok(Json(state.store.dashboards.list().await?))
}

pub async fn create_dashboard(
    State(state): State<AppState>,
    Json(req): Json<CreateDashboardRequest>,
) -> Result<(StatusCode, Json<Dashboard>), ApiError> {
    let dashboard = state.store.dashboards.create(req).await?;
    Ok((StatusCode::CREATED, Json(dashboard)))
}

#[utoipa::path(get, path = "/api/dashboards/{id}", tag = "Dashboards",
    params(("id" = String, Path, description = "Dashboard id")),
    responses(
        (status = 200, description = "The dashboard", body = Dashboard),
        (status = 404, description = "Not found")))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = state
        .store
        .dashboards
        .get(&id)
        .await?
        .ok_or_else(|| Error::dashboard_not_found(&id))?;
    Ok(Json(dashboard))
}

pub async fn update_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDashboardRequest>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(state.store.dashboards.update(&id, req).await?))
}

pub async fn delete_dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(state.store.dashboards.delete(&id).await?))
}

/// Append a widget below the current layout.
#[utoipa::path(post, path = "/api/dashboards/{id}/widgets", tag = "Dashboards",
    params(("id" = String, Path, description = "Dashboard id")),
    request_body = AddWidgetRequest,
    responses(
        (status = 200, description = "Updated dashboard", body = Dashboard),
        (status = 400, description = "Unknown widget type")))]
pub async fn add_widget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddWidgetRequest>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(state.store.dashboards.add_widget(&id, req).await?))
}

pub async fn remove_widget(
    State(state): State<AppState>,
    Path((id, widget_id)): Path<(String, String)>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(
        state.store.dashboards.remove_widget(&id, &widget_id).await?,
    ))
}

#[utoipa::path(put, path = "/api/dashboards/{id}/layout", tag = "Dashboards",
    params(("id" = String, Path, description = "Dashboard id")),
    request_body = [LayoutItem],
    responses((status = 200, description = "Updated dashboard", body = Dashboard)))]
pub async fn apply_layout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(items): Json<Vec<LayoutItem>>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(state.store.dashboards.apply_layout(&id, items).await?))
}

/// Every widget with its rendered preview, in layout order.
pub async fn render(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    let dashboard = state
        .store
        .dashboards
        .get(&id)
        .await?
        .ok_or_else(|| Error::dashboard_not_found(&id))?;
    let databases = state.store.databases.list().await?;
    let pages = state.store.pages.list(None).await?;
    let rendered = render_dashboard(&dashboard, &databases, &pages);
    Ok(Json(serde_json::to_value(&rendered)?))
}
