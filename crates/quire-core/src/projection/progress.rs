//! Sub-task completion progress.

use serde::Serialize;
use utoipa::ToSchema;

use crate::blob::property_text;
use crate::defaults;
use crate::models::{Column, Page};
use crate::projection::board::status_field;
use crate::projection::hierarchy::children;

/// Completion of a page's direct sub-tasks.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `completed / total`, in `0.0..=1.0`.
    pub fraction: f64,
    /// `fraction` as a rounded percentage.
    pub percentage: u32,
}

impl Progress {
    fn new(completed: usize, total: usize) -> Self {
        let fraction = completed as f64 / total as f64;
        Self {
            completed,
            total,
            fraction,
            percentage: (fraction * 100.0).round() as u32,
        }
    }
}

/// Whether a status value counts as finished.
pub fn is_done(status: &str) -> bool {
    let normalized = status.trim().to_lowercase();
    defaults::DONE_STATUSES.contains(&normalized.as_str())
}

/// Progress over the direct non-template children of `parent_id`.
///
/// `None` when the page has no children, so "no sub-tasks" stays distinct
/// from "none finished".
pub fn progress(columns: &[Column], pages: &[Page], parent_id: &str) -> Option<Progress> {
    let entries = children(pages, Some(parent_id));
    if entries.is_empty() {
        return None;
    }
    let key = status_field(columns).key;
    let completed = entries
        .iter()
        .filter(|p| is_done(&property_text(p.property(&key))))
        .count();
    Some(Progress::new(completed, entries.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_columns;
    use crate::projection::fixtures::{page, template};

    #[test]
    fn test_is_done_normalizes() {
        assert!(is_done("done"));
        assert!(is_done(" DONE "));
        assert!(is_done("Completed"));
        assert!(is_done("finished"));
        assert!(!is_done("In Progress"));
        assert!(!is_done(""));
    }

    #[test]
    fn test_half_done() {
        let pages = vec![
            page("p", None, None),
            page("a", Some("p"), Some("done")),
            page("b", Some("p"), Some("DONE")),
            page("c", Some("p"), Some("Todo")),
            page("d", Some("p"), None),
            template("t", Some("p")),
        ];
        let prog = progress(&default_columns(), &pages, "p").unwrap();
        assert_eq!(prog.completed, 2);
        assert_eq!(prog.total, 4);
        assert_eq!(prog.fraction, 0.5);
        assert_eq!(prog.percentage, 50);
    }

    #[test]
    fn test_no_children_is_none() {
        let pages = vec![page("p", None, None)];
        assert_eq!(progress(&default_columns(), &pages, "p"), None);
    }

    #[test]
    fn test_zero_done_is_some() {
        let pages = vec![page("p", None, None), page("a", Some("p"), Some("Todo"))];
        let prog = progress(&default_columns(), &pages, "p").unwrap();
        assert_eq!(prog.completed, 0);
        assert_eq!(prog.percentage, 0);
    }

    #[test]
    fn test_percentage_rounds() {
        let pages = vec![
            page("p", None, None),
            page("a", Some("p"), Some("Done")),
            page("b", Some("p"), Some("Todo")),
            page("c", Some("p"), Some("Todo")),
        ];
        let prog = progress(&default_columns(), &pages, "p").unwrap();
        assert_eq!(prog.percentage, 33);
    }
}
