//! Data models for quire.
//!
//! Wire format is camelCase JSON. Stored records keep their blobs as text;
//! the typed structures here are what the service hands out after decoding.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::blob::{double_option, lenient_bool, lenient_opt_bool};
pub use crate::blob::BlobInput;
use crate::error::Error;

/// Page properties: column id to scalar value.
pub type Properties = serde_json::Map<String, JsonValue>;

// =============================================================================
// DATABASE / COLUMN
// =============================================================================

/// Column value type.
///
/// Deserialization is lenient: unknown type names read as `Text`. Use
/// [`ColumnType::from_str`] to reject them instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Date,
    Select,
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            "select" => Ok(ColumnType::Select),
            other => Err(Error::InvalidInput(format!("Unknown column type: {}", other))),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(ColumnType::Text))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Select => "select",
        };
        f.write_str(s)
    }
}

/// A typed field definition within a database schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Column {
    /// Slug, unique within the owning database.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_column_type")]
    pub column_type: ColumnType,
    /// Allowed values, meaningful only for `select`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Display width hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

fn default_column_type() -> ColumnType {
    ColumnType::Text
}

/// A user-defined structured collection of pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub columns: Vec<Column>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl Database {
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// A note, database entry, sub-task, or template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content: String,
    #[schema(value_type = Object)]
    pub properties: Properties,
    pub parent_id: Option<String>,
    pub database_id: Option<String>,
    pub is_template: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl Page {
    /// Property value by column id.
    pub fn property(&self, key: &str) -> Option<&JsonValue> {
        self.properties.get(key)
    }

    /// Whether this page is a live root-level entry (not a template, no parent).
    pub fn is_root_entry(&self) -> bool {
        !self.is_template && self.parent_id.is_none()
    }
}

// =============================================================================
// DASHBOARD / WIDGET
// =============================================================================

/// Widget kind. Unknown kinds read as `Unknown` and render empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Database,
    Notes,
    Tasks,
    Unknown,
}

impl FromStr for WidgetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "database" => Ok(WidgetType::Database),
            "notes" => Ok(WidgetType::Notes),
            "tasks" => Ok(WidgetType::Tasks),
            other => Err(Error::InvalidInput(format!("Unknown widget type: {}", other))),
        }
    }
}

impl<'de> Deserialize<'de> for WidgetType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(WidgetType::Unknown))
    }
}

/// How a database widget presents its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Table,
    #[default]
    Board,
}

impl<'de> Deserialize<'de> for ViewMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "table" => ViewMode::Table,
            _ => ViewMode::Board,
        })
    }
}

/// A positioned panel on a dashboard grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(alias = "i")]
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
}

/// A named grid of widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    pub widgets: Vec<Widget>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Request for creating a database. Absent fields take the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Partial database update. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatabaseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub columns: Option<BlobInput>,
}

/// Request for creating a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub properties: Option<BlobInput>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub is_template: Option<bool>,
}

/// Partial page update.
///
/// `parentId` and `databaseId` are tri-state: omitted keeps the stored value,
/// `null` clears it, a string sets it. `isTemplate` omitted keeps the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub properties: Option<BlobInput>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub database_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub is_template: Option<bool>,
}

impl UpdatePageRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.properties.is_none()
            && self.parent_id.is_none()
            && self.database_id.is_none()
            && self.is_template.is_none()
    }
}

/// Request for creating a dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDashboardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub widgets: Option<BlobInput>,
}

/// Partial dashboard update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDashboardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub widgets: Option<BlobInput>,
}

/// Request for instantiating a template page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstantiateTemplateRequest {
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Overrides the template's title.
    #[serde(default)]
    pub title: Option<String>,
}

/// Request for adding a column to a database schema.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnRequest {
    pub name: String,
    /// Column type name; defaults to `text`, unknown names are rejected.
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// Request for renaming a column. The column id is unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenameColumnRequest {
    pub name: String,
}

/// Request for adding a widget to a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddWidgetRequest {
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default)]
    pub view_mode: Option<ViewMode>,
}

/// One entry of a layout change: new geometry for an existing widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LayoutItem {
    #[serde(alias = "i")]
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

// =============================================================================
// DELETE
// =============================================================================

/// How far a page deletion reaches into the page hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStrategy {
    /// Delete the page and its direct children. Grandchildren stay stored
    /// with a dangling parent reference.
    #[default]
    Children,
    /// Delete the page and every descendant.
    Recursive,
}

/// Outcome of a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub success: bool,
    /// Ids removed, the target included.
    pub deleted_ids: Vec<String>,
}

impl DeleteResult {
    pub fn new(deleted_ids: Vec<String>) -> Self {
        Self {
            success: true,
            deleted_ids,
        }
    }
}

// =============================================================================
// IMPORT / EXPORT
// =============================================================================

/// Database portion of an import payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDatabase {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub columns: Option<BlobInput>,
}

/// One source page of an import payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPage {
    /// Source id, used only to rewrite parent references.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub properties: Option<BlobInput>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_template: bool,
}

/// Import payload. Both parts are required; they are optional here so a
/// missing part is reported as invalid input instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPayload {
    #[serde(default)]
    pub database: Option<ImportDatabase>,
    #[serde(default)]
    pub pages: Option<Vec<ImportPage>>,
}

/// Portable export of one database and its pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExportBundle {
    pub database: Database,
    pub pages: Vec<Page>,
}

impl From<ExportBundle> for ImportPayload {
    fn from(bundle: ExportBundle) -> Self {
        let database = ImportDatabase {
            name: Some(bundle.database.name),
            icon: Some(bundle.database.icon),
            columns: serde_json::to_value(&bundle.database.columns)
                .ok()
                .map(BlobInput::Structured),
        };
        let pages = bundle
            .pages
            .into_iter()
            .map(|p| ImportPage {
                id: Some(p.id),
                title: Some(p.title),
                content: Some(p.content),
                properties: Some(BlobInput::Structured(JsonValue::Object(p.properties))),
                parent_id: p.parent_id,
                is_template: p.is_template,
            })
            .collect();
        ImportPayload {
            database: Some(database),
            pages: Some(pages),
        }
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// Grouped search results. Each group is in storage order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResults {
    pub databases: Vec<Database>,
    pub pages: Vec<Page>,
    pub dashboards: Vec<Dashboard>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty() && self.pages.is_empty() && self.dashboards.is_empty()
    }
}
