//! Search and navigation handlers.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use quire_core::logging::SUBSYSTEM_API;
use quire_core::{
    DashboardRepository, DatabaseRepository, NavigationRequest, Navigator, PageRepository, Route,
    SearchProvider, SearchResults,
};

use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring.
    #[serde(default)]
    pub q: String,
}

/// Substring search across databases, pages, and dashboards.
#[utoipa::path(get, path = "/api/search", tag = "Search",
    responses((status = 200, description = "Grouped matches", body = SearchResults)))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>, ApiError> {
    Ok(Json(state.store.search.search(&query.q).await?))
}

/// Resolve a navigation request into the route to show.
#[utoipa::path(post, path = "/api/navigate", tag = "Search",
    request_body = NavigationRequest,
    responses(
        (status = 200, description = "Route", body = Route),
        (status = 404, description = "Target does not exist")))]
pub async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigationRequest>,
) -> Result<Json<Route>, ApiError> {
    let start = Instant::now();
    let databases = state.store.databases.list().await?;
    let pages = state.store.pages.list(None).await?;
    let dashboards = state.store.dashboards.list().await?;

    let route = Navigator::new(&databases, &pages, &dashboards).resolve(&req)?;
    debug!(
        subsystem = SUBSYSTEM_API,
        component = "navigate",
        target = ?req.target,
        id = %req.id,
        view = ?route.view,
        duration_ms = start.elapsed().as_millis() as u64,
        "Resolved navigation"
    );
    Ok(Json(route))
}
