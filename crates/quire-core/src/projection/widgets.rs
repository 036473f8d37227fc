//! Dashboard widget rendering.
//!
//! Each widget projects a small preview of the stored records. A widget that
//! points at a missing database, or has a type this build does not know,
//! renders as `Empty`.

use serde::Serialize;

use crate::blob::property_text;
use crate::defaults;
use crate::models::{Dashboard, Database, Page, ViewMode, Widget, WidgetType};
use crate::projection::board::{status_field, BoardColumn};
use crate::projection::progress::is_done;

/// A page in the tasks widget.
#[derive(Debug, Clone, Serialize)]
pub struct TaskItem<'a> {
    pub page: &'a Page,
    pub status: String,
    pub done: bool,
}

/// What a widget shows.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WidgetView<'a> {
    Notes {
        pages: Vec<&'a Page>,
    },
    Tasks {
        items: Vec<TaskItem<'a>>,
    },
    Table {
        database: &'a Database,
        pages: Vec<&'a Page>,
    },
    Board {
        database: &'a Database,
        columns: Vec<BoardColumn<'a>>,
    },
    Empty,
}

/// A widget with its rendered view.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedWidget<'a> {
    pub widget: &'a Widget,
    pub view: WidgetView<'a>,
}

/// Render one widget against the full record set.
pub fn render_widget<'a>(
    widget: &Widget,
    databases: &'a [Database],
    pages: &'a [Page],
) -> WidgetView<'a> {
    match widget.widget_type {
        WidgetType::Notes => WidgetView::Notes {
            pages: recent_notes(pages),
        },
        WidgetType::Tasks => WidgetView::Tasks {
            items: tasks(pages),
        },
        WidgetType::Database => {
            let Some(database) = widget
                .database_id
                .as_deref()
                .and_then(|id| databases.iter().find(|d| d.id == id))
            else {
                return WidgetView::Empty;
            };
            let entries: Vec<&Page> = pages
                .iter()
                .filter(|p| p.database_id.as_deref() == Some(database.id.as_str()))
                .filter(|p| p.is_root_entry())
                .collect();
            match widget.view_mode.unwrap_or_default() {
                ViewMode::Table => WidgetView::Table {
                    database,
                    pages: entries
                        .into_iter()
                        .take(defaults::WIDGET_PREVIEW_LIMIT)
                        .collect(),
                },
                ViewMode::Board => WidgetView::Board {
                    database,
                    columns: board_preview(database, &entries),
                },
            }
        }
        WidgetType::Unknown => WidgetView::Empty,
    }
}

/// Render every widget of a dashboard, in layout order.
pub fn render_dashboard<'a>(
    dashboard: &'a Dashboard,
    databases: &'a [Database],
    pages: &'a [Page],
) -> Vec<RenderedWidget<'a>> {
    dashboard
        .widgets
        .iter()
        .map(|widget| RenderedWidget {
            widget,
            view: render_widget(widget, databases, pages),
        })
        .collect()
}

/// Root-level live pages, most recently updated first. The sort is stable,
/// so equal timestamps keep storage order.
fn recent_notes(pages: &[Page]) -> Vec<&Page> {
    let mut notes: Vec<&Page> = pages.iter().filter(|p| p.is_root_entry()).collect();
    notes.sort_by(|a, b| b.updated_at_utc.cmp(&a.updated_at_utc));
    notes.truncate(defaults::WIDGET_PREVIEW_LIMIT);
    notes
}

fn tasks(pages: &[Page]) -> Vec<TaskItem<'_>> {
    pages
        .iter()
        .filter(|p| !p.is_template && p.properties.contains_key(defaults::STATUS_KEY))
        .take(defaults::WIDGET_PREVIEW_LIMIT)
        .map(|page| {
            let status = property_text(page.property(defaults::STATUS_KEY));
            TaskItem {
                done: is_done(&status),
                status,
                page,
            }
        })
        .collect()
}

/// Fixed Todo / In Progress / Done lanes with a few cards each.
fn board_preview<'a>(database: &Database, entries: &[&'a Page]) -> Vec<BoardColumn<'a>> {
    let key = status_field(&database.columns).key;
    defaults::STATUSES
        .iter()
        .map(|status| BoardColumn {
            status: status.to_string(),
            pages: entries
                .iter()
                .copied()
                .filter(|p| property_text(p.property(&key)) == *status)
                .take(defaults::WIDGET_BOARD_CARDS)
                .collect(),
        })
        .collect()
}
