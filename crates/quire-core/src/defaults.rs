//! Centralized default constants for the quire workspace.
//!
//! Names and sizes that the service fills in when a caller omits them, plus
//! the limits the dashboard projections apply.

use crate::models::{Column, ColumnType};

// =============================================================================
// RECORD DEFAULTS
// =============================================================================

/// Name given to a database created without one.
pub const DATABASE_NAME: &str = "Untitled Database";

/// Icon name given to a database created without one.
pub const DATABASE_ICON: &str = "Database";

/// Title given to a page created without one.
pub const PAGE_TITLE: &str = "Untitled";

/// Name given to a dashboard created without one.
pub const DASHBOARD_NAME: &str = "Untitled Dashboard";

/// Suffix appended to the name of an imported database.
pub const IMPORTED_SUFFIX: &str = " (Imported)";

// =============================================================================
// SCHEMA DEFAULTS
// =============================================================================

/// Display width of a new column.
pub const COLUMN_WIDTH: u32 = 150;

/// Conventional key of the status property.
pub const STATUS_KEY: &str = "status";

/// Conventional key of the date property.
pub const DATE_KEY: &str = "date";

/// Status options used when a database has no select status column.
pub const STATUSES: [&str; 3] = ["Todo", "In Progress", "Done"];

/// Status values (compared lowercase) that count a task as finished.
pub const DONE_STATUSES: [&str; 3] = ["done", "completed", "finished"];

/// Columns every new database starts with.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column {
            id: STATUS_KEY.to_string(),
            name: "Status".to_string(),
            column_type: ColumnType::Select,
            options: Some(STATUSES.iter().map(|s| s.to_string()).collect()),
            width: Some(COLUMN_WIDTH),
        },
        Column {
            id: DATE_KEY.to_string(),
            name: "Date".to_string(),
            column_type: ColumnType::Date,
            options: None,
            width: Some(COLUMN_WIDTH),
        },
        Column {
            id: "priority".to_string(),
            name: "Priority".to_string(),
            column_type: ColumnType::Select,
            options: Some(vec![
                "Low".to_string(),
                "Medium".to_string(),
                "High".to_string(),
            ]),
            width: Some(COLUMN_WIDTH),
        },
        Column {
            id: "assignee".to_string(),
            name: "Assignee".to_string(),
            column_type: ColumnType::Text,
            options: None,
            width: Some(COLUMN_WIDTH),
        },
    ]
}

// =============================================================================
// DASHBOARD DEFAULTS
// =============================================================================

/// Rows shown by notes, tasks, and table widgets.
pub const WIDGET_PREVIEW_LIMIT: usize = 5;

/// Cards shown per status column in a board widget.
pub const WIDGET_BOARD_CARDS: usize = 3;

/// Height of a newly added widget, in grid rows.
pub const WIDGET_HEIGHT: i64 = 2;

/// Width of a newly added notes or tasks widget.
pub const WIDGET_WIDTH_NARROW: i64 = 1;

/// Width of a newly added database widget.
pub const WIDGET_WIDTH_WIDE: i64 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns_shape() {
        let cols = default_columns();
        let ids: Vec<_> = cols.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["status", "date", "priority", "assignee"]);
        assert!(cols.iter().all(|c| c.width == Some(COLUMN_WIDTH)));
        assert_eq!(
            cols[0].options.as_deref(),
            Some(&["Todo".to_string(), "In Progress".to_string(), "Done".to_string()][..])
        );
    }

    #[test]
    fn test_done_statuses_are_lowercase() {
        for s in DONE_STATUSES {
            assert_eq!(s, s.to_lowercase());
        }
    }
}
