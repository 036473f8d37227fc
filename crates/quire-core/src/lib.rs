//! # quire-core
//!
//! Core types, traits, and view projections for the quire workspace.
//!
//! This crate provides the domain model (databases, pages, dashboards), the
//! error taxonomy, the repository and generation backend traits, and the pure
//! functions that derive UI-ready structures from stored records. Nothing in
//! here touches the store or the network.

pub mod blob;
pub mod defaults;
pub mod error;
pub mod import;
pub mod layout;
pub mod local_state;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod projection;
pub mod schema;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use import::{plan_import, project_csv, project_markdown, ImportPlan, PlannedPage};
pub use local_state::{Keyed, LocalState, Ticket};
pub use models::*;
pub use navigation::{Crumb, NavigationRequest, NavigationTarget, Navigator, Route, View};
pub use projection::{
    board::{board, status_field, Board, BoardColumn, StatusField},
    calendar::{calendar, CalendarDay},
    hierarchy::{breadcrumbs, children, PageTree, TreeNode},
    progress::{progress, Progress},
    widgets::{render_dashboard, render_widget, RenderedWidget, TaskItem, WidgetView},
};
pub use traits::*;
pub use uuid_utils::new_id;
