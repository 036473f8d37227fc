//! # quire-api
//!
//! HTTP surface for the quire record store: CRUD over databases, pages, and
//! dashboards, the derived views (board, tree, calendar, progress, rendered
//! dashboards), search, navigation, and AI writing assist.
//!
//! The binary in `main.rs` wires configuration and logging; everything
//! routable lives here so tests can drive the router in-process.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use uuid::Uuid;

use quire_db::Store;
use quire_inference::AssistCoordinator;

pub use config::ServerConfig;
pub use error::ApiError;

use handlers::{dashboards, databases, pages, search, system};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub assist: Arc<AssistCoordinator>,
}

impl AppState {
    pub fn new(store: Store, assist: AssistCoordinator) -> Self {
        Self {
            store,
            assist: Arc::new(assist),
        }
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quire API",
        version = "2026.10.0",
        description = "Notes, structured databases, and dashboards with AI writing assist"
    ),
    paths(
        databases::list_databases,
        databases::create_database,
        databases::get_database,
        databases::delete_database,
        databases::add_column,
        databases::import_database,
        databases::export_database,
        pages::list_pages,
        pages::get_page,
        pages::delete_page,
        pages::instantiate_template,
        pages::get_progress,
        dashboards::list_dashboards,
        dashboards::get_dashboard,
        dashboards::add_widget,
        dashboards::apply_layout,
        search::search,
        search::navigate,
    ),
    components(schemas(
        quire_core::Database,
        quire_core::Column,
        quire_core::ColumnType,
        quire_core::Page,
        quire_core::Dashboard,
        quire_core::Widget,
        quire_core::WidgetType,
        quire_core::ViewMode,
        quire_core::LayoutItem,
        quire_core::DeleteResult,
        quire_core::ExportBundle,
        quire_core::SearchResults,
        quire_core::Progress,
        quire_core::CreateDatabaseRequest,
        quire_core::AddColumnRequest,
        quire_core::RenameColumnRequest,
        quire_core::AddWidgetRequest,
        quire_core::InstantiateTemplateRequest,
        quire_core::NavigationRequest,
        quire_core::NavigationTarget,
        quire_core::Route,
        quire_core::View,
        quire_core::Crumb,
    )),
    tags(
        (name = "Databases", description = "Databases and their column schema"),
        (name = "Pages", description = "Pages, templates, and sub-tasks"),
        (name = "Dashboards", description = "Dashboards and widget layout"),
        (name = "Import", description = "Import and export"),
        (name = "Search", description = "Search and navigation")
    )
)]
pub struct ApiDoc;

// =============================================================================
// ROUTER
// =============================================================================

/// Routes only, without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(system::health_check))
        .route("/api-docs/openapi.json", get(system::openapi_json))
        // Databases
        .route(
            "/api/databases",
            get(databases::list_databases).post(databases::create_database),
        )
        .route("/api/databases/import", post(databases::import_database))
        .route("/api/databases/import/csv", post(databases::import_csv))
        .route(
            "/api/databases/:id",
            get(databases::get_database)
                .put(databases::update_database)
                .delete(databases::delete_database),
        )
        .route("/api/databases/:id/export", get(databases::export_database))
        .route(
            "/api/databases/:id/import/markdown",
            post(databases::import_markdown),
        )
        .route("/api/databases/:id/templates", get(databases::list_templates))
        .route("/api/databases/:id/columns", post(databases::add_column))
        .route(
            "/api/databases/:id/columns/:column_id",
            put(databases::rename_column).delete(databases::remove_column),
        )
        .route("/api/databases/:id/board", get(databases::get_board))
        .route("/api/databases/:id/tree", get(databases::get_tree))
        .route("/api/databases/:id/calendar", get(databases::get_calendar))
        // Pages
        .route("/api/pages", get(pages::list_pages).post(pages::create_page))
        .route(
            "/api/pages/:id",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route("/api/pages/:id/instantiate", post(pages::instantiate_template))
        .route("/api/pages/:id/children", get(pages::get_children))
        .route("/api/pages/:id/breadcrumbs", get(pages::get_breadcrumbs))
        .route("/api/pages/:id/progress", get(pages::get_progress))
        // Dashboards
        .route(
            "/api/dashboards",
            get(dashboards::list_dashboards).post(dashboards::create_dashboard),
        )
        .route(
            "/api/dashboards/:id",
            get(dashboards::get_dashboard)
                .put(dashboards::update_dashboard)
                .delete(dashboards::delete_dashboard),
        )
        .route("/api/dashboards/:id/widgets", post(dashboards::add_widget))
        .route(
            "/api/dashboards/:id/widgets/:widget_id",
            delete(dashboards::remove_widget),
        )
        .route("/api/dashboards/:id/layout", put(dashboards::apply_layout))
        .route("/api/dashboards/:id/render", get(dashboards::render))
        // Search, navigation, assist
        .route("/api/search", get(search::search))
        .route("/api/navigate", post(search::navigate))
        .route("/api/ai/assist", post(system::assist))
        .with_state(state)
}

/// Routes with the middleware stack: tracing, request ids, CORS, and the
/// body size limit.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    router(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
}
