//! Health, OpenAPI document, and AI assist handlers.

use axum::{extract::State, response::IntoResponse, Json};
use utoipa::OpenApi;

use quire_inference::{AssistOutcome, AssistRequest};

use crate::{ApiDoc, ApiError, AppState};

/// Liveness plus a store round trip.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").execute(&state.store.pool).await {
        Ok(_) => "connected",
        Err(_) => "unavailable",
    };
    quire_db::log_pool_metrics(&state.store.pool);
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "model": state.assist.model_name(),
    }))
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Run a writing assist action. Backend failures come back as a fallback
/// outcome; only an empty request is an error.
pub async fn assist(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Result<Json<AssistOutcome>, ApiError> {
    Ok(Json(state.assist.run(&req).await?))
}
