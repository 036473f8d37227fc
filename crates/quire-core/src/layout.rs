//! Dashboard widget layout.
//!
//! Decoding of stored widget lists and the edits behind add, remove, and
//! re-layout. Edits replace the whole list; the store persists the result.

use serde::Deserialize;

use crate::blob::{decode_for_edit, decode_or_default};
use crate::defaults;
use crate::error::{Error, Result};
use crate::models::{LayoutItem, ViewMode, Widget, WidgetType};
use crate::uuid_utils::new_prefixed_id;

/// Stored widget as written by grid clients. `y` may be null to mean
/// "at the bottom".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWidget {
    #[serde(alias = "i", default)]
    id: String,
    #[serde(default)]
    x: i64,
    #[serde(default)]
    y: Option<i64>,
    #[serde(default = "default_w")]
    w: i64,
    #[serde(default = "default_h")]
    h: i64,
    #[serde(rename = "type", default = "unknown_type")]
    widget_type: WidgetType,
    #[serde(default)]
    database_id: Option<String>,
    #[serde(default)]
    view_mode: Option<ViewMode>,
}

fn default_w() -> i64 {
    defaults::WIDGET_WIDTH_NARROW
}

fn default_h() -> i64 {
    defaults::WIDGET_HEIGHT
}

fn unknown_type() -> WidgetType {
    WidgetType::Unknown
}

/// Decode a stored widget list. Widgets without a `y` are stacked below
/// the ones placed before them; widgets without an id are named by their
/// position (`w-0`, `w-1`, ...).
pub fn decode_widgets(raw: &str) -> Vec<Widget> {
    place(decode_or_default(raw, "widgets"))
}

/// Strict form of [`decode_widgets`] for edits that write the list back.
pub fn decode_widgets_for_edit(raw: &str) -> Result<Vec<Widget>> {
    decode_for_edit(raw, "widgets").map(place)
}

fn place(stored: Vec<StoredWidget>) -> Vec<Widget> {
    let mut widgets: Vec<Widget> = Vec::with_capacity(stored.len());
    for (index, s) in stored.into_iter().enumerate() {
        let y = s.y.unwrap_or_else(|| bottom(&widgets));
        let id = if s.id.is_empty() {
            format!("w-{}", index)
        } else {
            s.id
        };
        widgets.push(Widget {
            id,
            x: s.x,
            y,
            w: s.w,
            h: s.h,
            widget_type: s.widget_type,
            database_id: s.database_id,
            view_mode: s.view_mode,
        });
    }
    widgets
}

/// First free row below every widget.
pub fn bottom(widgets: &[Widget]) -> i64 {
    widgets
        .iter()
        .map(|w| w.y.saturating_add(w.h))
        .max()
        .unwrap_or(0)
}

/// Append a widget of the given type at the bottom-left of the grid.
pub fn add_widget(
    widgets: &mut Vec<Widget>,
    widget_type: WidgetType,
    database_id: Option<String>,
    view_mode: Option<ViewMode>,
) -> Result<Widget> {
    let w = match widget_type {
        WidgetType::Notes | WidgetType::Tasks => defaults::WIDGET_WIDTH_NARROW,
        WidgetType::Database => defaults::WIDGET_WIDTH_WIDE,
        WidgetType::Unknown => {
            return Err(Error::InvalidInput("Unknown widget type".into()));
        }
    };
    let (database_id, view_mode) = match widget_type {
        WidgetType::Database => (database_id, Some(view_mode.unwrap_or_default())),
        _ => (None, None),
    };
    let widget = Widget {
        id: new_prefixed_id("w"),
        x: 0,
        y: bottom(widgets),
        w,
        h: defaults::WIDGET_HEIGHT,
        widget_type,
        database_id,
        view_mode,
    };
    widgets.push(widget.clone());
    Ok(widget)
}

/// Remove a widget by id.
pub fn remove_widget(widgets: &mut Vec<Widget>, widget_id: &str) -> Result<Widget> {
    let idx = widgets
        .iter()
        .position(|w| w.id == widget_id)
        .ok_or_else(|| Error::NotFound(format!("Widget {} not found", widget_id)))?;
    Ok(widgets.remove(idx))
}

/// Apply new geometry. Items naming unknown widgets are ignored; widgets not
/// named keep their position. Returns how many widgets moved.
pub fn apply_layout(widgets: &mut [Widget], items: &[LayoutItem]) -> usize {
    let mut applied = 0;
    for item in items {
        if let Some(w) = widgets.iter_mut().find(|w| w.id == item.id) {
            w.x = item.x;
            w.y = item.y;
            w.w = item.w;
            w.h = item.h;
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"[
        {"i":"w1","x":0,"y":0,"w":2,"h":2,"type":"database","databaseId":"db-1","viewMode":"table"},
        {"i":"w2","x":2,"y":0,"w":1,"h":2,"type":"notes"},
        {"i":"w3","x":0,"y":2,"w":3,"h":2,"type":"database","databaseId":"db-2","viewMode":"board"}
    ]"#;

    #[test]
    fn test_decode_grid_layout() {
        let widgets = decode_widgets(HOME);
        assert_eq!(widgets.len(), 3);
        assert_eq!(widgets[0].id, "w1");
        assert_eq!(widgets[2].view_mode, Some(ViewMode::Board));
        assert_eq!(bottom(&widgets), 4);
    }

    #[test]
    fn test_decode_null_y_appends_at_bottom() {
        let raw = r#"[
            {"i":"a","x":0,"y":0,"w":1,"h":3,"type":"notes"},
            {"i":"b","x":1,"y":null,"w":1,"h":2,"type":"tasks"},
            {"i":"c","x":0,"w":1,"h":2,"type":"tasks"}
        ]"#;
        let widgets = decode_widgets(raw);
        assert_eq!(widgets[1].y, 3);
        assert_eq!(widgets[2].y, 5);
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        assert!(decode_widgets("not json").is_empty());
        assert!(decode_widgets("").is_empty());
    }

    #[test]
    fn test_widgets_without_ids_are_named_by_position() {
        let raw = r#"[{"x":0,"y":0,"type":"notes"},{"i":"kept","type":"tasks"},{"type":"tasks"}]"#;
        let ids: Vec<String> = decode_widgets(raw).into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["w-0", "kept", "w-2"]);
        let again: Vec<String> = decode_widgets(raw).into_iter().map(|w| w.id).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_bottom_saturates_on_extreme_geometry() {
        let raw = format!(r#"[{{"i":"far","x":0,"y":{},"w":1,"h":{},"type":"notes"}}]"#, i64::MAX, i64::MAX);
        let widgets = decode_widgets(&raw);
        assert_eq!(bottom(&widgets), i64::MAX);
    }

    #[test]
    fn test_decode_for_edit_rejects_malformed() {
        assert!(matches!(
            decode_widgets_for_edit(r#"[{"i":"a","x":"left"}]"#),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(decode_widgets_for_edit(HOME).unwrap().len(), 3);
        assert!(decode_widgets_for_edit("").unwrap().is_empty());
    }

    #[test]
    fn test_add_widget_sizes() {
        let mut widgets = decode_widgets(HOME);
        let notes = add_widget(&mut widgets, WidgetType::Notes, None, None).unwrap();
        assert_eq!((notes.x, notes.y, notes.w, notes.h), (0, 4, 1, 2));

        let db = add_widget(&mut widgets, WidgetType::Database, Some("db-1".into()), None).unwrap();
        assert_eq!((db.y, db.w), (6, 2));
        assert_eq!(db.view_mode, Some(ViewMode::Board));
        assert_eq!(widgets.len(), 5);
    }

    #[test]
    fn test_add_widget_to_empty_dashboard() {
        let mut widgets = Vec::new();
        let w = add_widget(&mut widgets, WidgetType::Tasks, Some("ignored".into()), None).unwrap();
        assert_eq!(w.y, 0);
        assert_eq!(w.database_id, None);
    }

    #[test]
    fn test_add_unknown_widget_rejected() {
        let mut widgets = Vec::new();
        assert!(add_widget(&mut widgets, WidgetType::Unknown, None, None).is_err());
    }

    #[test]
    fn test_remove_widget() {
        let mut widgets = decode_widgets(HOME);
        remove_widget(&mut widgets, "w2").unwrap();
        assert_eq!(widgets.len(), 2);
        assert!(matches!(
            remove_widget(&mut widgets, "w2"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_apply_layout_ignores_unknown_ids() {
        let mut widgets = decode_widgets(HOME);
        let items = vec![
            LayoutItem { id: "w2".into(), x: 0, y: 6, w: 3, h: 1 },
            LayoutItem { id: "ghost".into(), x: 9, y: 9, w: 9, h: 9 },
        ];
        assert_eq!(apply_layout(&mut widgets, &items), 1);
        let w2 = widgets.iter().find(|w| w.id == "w2").unwrap();
        assert_eq!((w2.x, w2.y, w2.w, w2.h), (0, 6, 3, 1));
        assert_eq!(widgets.len(), 3);
    }
}
