//! View projections.
//!
//! Pure functions over already-fetched records that produce what the views
//! render: hierarchy, boards, progress, calendar days, and dashboard widgets.
//! They never fail; missing or malformed inputs project as empty.

pub mod board;
pub mod calendar;
pub mod hierarchy;
pub mod progress;
pub mod widgets;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use crate::models::{Page, Properties};

    /// A page with the given id, parent, and status; timestamps are spaced by
    /// the numeric suffix of the id when there is one.
    pub fn page(id: &str, parent: Option<&str>, status: Option<&str>) -> Page {
        let mut properties = Properties::new();
        if let Some(s) = status {
            properties.insert("status".into(), json!(s));
        }
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Page {
            id: id.to_string(),
            title: format!("Page {}", id),
            content: String::new(),
            properties,
            parent_id: parent.map(str::to_string),
            database_id: Some("db".into()),
            is_template: false,
            created_at_utc: t,
            updated_at_utc: t,
        }
    }

    pub fn template(id: &str, parent: Option<&str>) -> Page {
        let mut p = page(id, parent, None);
        p.is_template = true;
        p
    }
}
