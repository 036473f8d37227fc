//! Kanban board projection.

use serde::Serialize;

use crate::blob::property_text;
use crate::defaults;
use crate::models::{Column, ColumnType, Page};
use crate::projection::hierarchy::children;

/// The property that drives a board, and its ordered values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusField {
    pub key: String,
    pub statuses: Vec<String>,
}

/// Resolve the status field of a schema.
///
/// The first `select` column named or keyed `status` (case-insensitive name)
/// wins. Without one the key is `status` with the default statuses.
pub fn status_field(columns: &[Column]) -> StatusField {
    let found = columns.iter().find(|c| {
        c.column_type == ColumnType::Select
            && (c.name.to_lowercase() == defaults::STATUS_KEY || c.id == defaults::STATUS_KEY)
    });
    let default_statuses =
        || -> Vec<String> { defaults::STATUSES.iter().map(|s| s.to_string()).collect() };
    match found {
        Some(col) => StatusField {
            key: col.id.clone(),
            statuses: col.options.clone().unwrap_or_else(default_statuses),
        },
        None => StatusField {
            key: defaults::STATUS_KEY.to_string(),
            statuses: default_statuses(),
        },
    }
}

/// One status lane.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn<'a> {
    pub status: String,
    pub pages: Vec<&'a Page>,
}

/// Pages grouped into status lanes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board<'a> {
    pub status_key: String,
    pub columns: Vec<BoardColumn<'a>>,
}

impl Board<'_> {
    /// Lane for a status, if the board has one.
    pub fn lane(&self, status: &str) -> Option<&BoardColumn<'_>> {
        self.columns.iter().find(|c| c.status == status)
    }
}

/// Group the direct non-template children of `parent_id` by exact status
/// value. Pages whose value matches no lane are left off the board.
pub fn board<'a>(columns: &[Column], pages: &'a [Page], parent_id: Option<&str>) -> Board<'a> {
    let field = status_field(columns);
    let entries = children(pages, parent_id);
    let lanes = field
        .statuses
        .iter()
        .map(|status| BoardColumn {
            status: status.clone(),
            pages: entries
                .iter()
                .copied()
                .filter(|p| property_text(p.property(&field.key)) == *status)
                .collect(),
        })
        .collect();
    Board {
        status_key: field.key,
        columns: lanes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_columns;
    use crate::projection::fixtures::{page, template};

    #[test]
    fn test_status_field_from_default_schema() {
        let field = status_field(&default_columns());
        assert_eq!(field.key, "status");
        assert_eq!(field.statuses, vec!["Todo", "In Progress", "Done"]);
    }

    #[test]
    fn test_status_field_matches_name_case_insensitively() {
        let cols = vec![Column {
            id: "state".into(),
            name: "STATUS".into(),
            column_type: ColumnType::Select,
            options: Some(vec!["Open".into(), "Closed".into()]),
            width: None,
        }];
        let field = status_field(&cols);
        assert_eq!(field.key, "state");
        assert_eq!(field.statuses, vec!["Open", "Closed"]);
    }

    #[test]
    fn test_status_field_ignores_non_select() {
        let cols = vec![Column {
            id: "status".into(),
            name: "Status".into(),
            column_type: ColumnType::Text,
            options: None,
            width: None,
        }];
        let field = status_field(&cols);
        assert_eq!(field.key, "status");
        assert_eq!(field.statuses.len(), 3);
    }

    #[test]
    fn test_board_groups_and_omits_unmatched() {
        let pages = vec![
            page("1", None, Some("Todo")),
            page("2", None, Some("Done")),
            page("3", None, Some("Blocked")),
            page("4", None, None),
            page("5", Some("1"), Some("Todo")),
            template("t", None),
        ];
        let b = board(&default_columns(), &pages, None);
        assert_eq!(b.status_key, "status");
        assert_eq!(b.columns.len(), 3);
        let todo: Vec<_> = b.lane("Todo").unwrap().pages.iter().map(|p| &p.id).collect();
        assert_eq!(todo, vec!["1"]);
        assert!(b.lane("In Progress").unwrap().pages.is_empty());
        assert_eq!(b.lane("Done").unwrap().pages.len(), 1);
        let placed: usize = b.columns.iter().map(|c| c.pages.len()).sum();
        assert_eq!(placed, 2);
    }

    #[test]
    fn test_board_of_sub_tasks() {
        let pages = vec![
            page("1", None, Some("Todo")),
            page("5", Some("1"), Some("Todo")),
        ];
        let b = board(&default_columns(), &pages, Some("1"));
        assert_eq!(b.lane("Todo").unwrap().pages[0].id, "5");
    }
}
