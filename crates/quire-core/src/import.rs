//! Import planning and file projections.
//!
//! [`plan_import`] turns an import payload into rows with fresh ids and
//! rewritten parent references; the store inserts the plan in one
//! transaction. The file projections turn a CSV or Markdown upload into the
//! same payload and request types the JSON endpoints accept.

use std::collections::HashMap;

use serde_json::{json, Value as JsonValue};

use crate::defaults;
use crate::error::{Error, Result};
use crate::models::{
    BlobInput, Column, ColumnType, CreatePageRequest, ImportDatabase, ImportPage, ImportPayload,
    Properties,
};
use crate::schema::{slugify, unique_slug};

/// A page row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage {
    pub id: String,
    pub title: String,
    pub content: String,
    pub properties: String,
    pub parent_id: Option<String>,
    pub is_template: bool,
}

/// A database and its pages ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub database_id: String,
    pub name: String,
    pub icon: String,
    pub columns: String,
    pub pages: Vec<PlannedPage>,
}

/// Assign fresh ids and rewrite parent references.
///
/// Every source page yields exactly one planned page. Parent references go
/// through a table built from the source ids in a first pass; a parent that
/// is not among the source pages becomes `None`. When two source pages share
/// an id, references resolve to the first of them.
pub fn plan_import<F>(payload: ImportPayload, mut next_id: F) -> Result<ImportPlan>
where
    F: FnMut() -> String,
{
    let database = payload
        .database
        .ok_or_else(|| Error::InvalidInput("Import payload is missing 'database'".into()))?;
    let pages = payload
        .pages
        .ok_or_else(|| Error::InvalidInput("Import payload is missing 'pages'".into()))?;

    let database_id = next_id();

    let fresh: Vec<String> = pages.iter().map(|_| next_id()).collect();
    let mut remap: HashMap<&str, &str> = HashMap::with_capacity(pages.len());
    for (page, new_id) in pages.iter().zip(&fresh) {
        if let Some(src) = page.id.as_deref() {
            remap.entry(src).or_insert(new_id.as_str());
        }
    }

    let planned = pages
        .iter()
        .zip(&fresh)
        .map(|(page, new_id)| PlannedPage {
            id: new_id.clone(),
            title: page
                .title
                .clone()
                .unwrap_or_else(|| defaults::PAGE_TITLE.to_string()),
            content: page.content.clone().unwrap_or_default(),
            properties: page
                .properties
                .clone()
                .map(BlobInput::into_text)
                .unwrap_or_else(|| "{}".to_string()),
            parent_id: page
                .parent_id
                .as_deref()
                .and_then(|p| remap.get(p))
                .map(|p| p.to_string()),
            is_template: page.is_template,
        })
        .collect();

    Ok(ImportPlan {
        database_id,
        name: format!(
            "{}{}",
            database.name.as_deref().unwrap_or("Imported"),
            defaults::IMPORTED_SUFFIX
        ),
        icon: database
            .icon
            .unwrap_or_else(|| defaults::DATABASE_ICON.to_string()),
        columns: database
            .columns
            .map(BlobInput::into_text)
            .unwrap_or_else(|| "[]".to_string()),
        pages: planned,
    })
}

fn strip_extension<'a>(file_name: &'a str, extensions: &[&str]) -> &'a str {
    for ext in extensions {
        let cut = file_name.len().saturating_sub(ext.len());
        if cut == 0 {
            continue;
        }
        if let Some(tail) = file_name.get(cut..) {
            if tail.eq_ignore_ascii_case(ext) {
                return &file_name[..cut];
            }
        }
    }
    file_name
}

/// Project a CSV file into an import payload.
///
/// The header row names the columns; each becomes a `text` column with a
/// slug id. Every row becomes a page titled by its first value (or `Row N`)
/// with all values in its properties. The database is named after the file.
pub fn project_csv(file_name: &str, text: &str) -> Result<ImportPayload> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::InvalidInput("CSV has no header row".into()));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let mut base = slugify(header);
        if base.is_empty() {
            base = format!("column-{}", i + 1);
        }
        let id = unique_slug(&base, columns.iter().map(|c| c.id.as_str()));
        columns.push(Column {
            id,
            name: header.clone(),
            column_type: ColumnType::Text,
            options: None,
            width: Some(defaults::COLUMN_WIDTH),
        });
    }

    let mut pages = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let mut properties = Properties::new();
        for (i, column) in columns.iter().enumerate() {
            let value = record.get(i).unwrap_or("");
            properties.insert(column.id.clone(), JsonValue::String(value.to_string()));
        }
        let title = match record.get(0) {
            Some(first) if !first.is_empty() => first.to_string(),
            _ => format!("Row {}", index + 1),
        };
        pages.push(ImportPage {
            id: Some(format!("temp-{}", index)),
            title: Some(title),
            content: Some(String::new()),
            properties: Some(BlobInput::Structured(JsonValue::Object(properties))),
            parent_id: None,
            is_template: false,
        });
    }

    Ok(ImportPayload {
        database: Some(ImportDatabase {
            name: Some(strip_extension(file_name, &[".csv"]).to_string()),
            icon: None,
            columns: Some(BlobInput::Structured(json!(columns))),
        }),
        pages: Some(pages),
    })
}

/// Project a Markdown file into a page of an existing database, titled after
/// the file.
pub fn project_markdown(
    file_name: &str,
    text: &str,
    database_id: &str,
    parent_id: Option<String>,
) -> CreatePageRequest {
    let title = strip_extension(file_name, &[".markdown", ".md"]).trim();
    CreatePageRequest {
        title: Some(if title.is_empty() {
            defaults::PAGE_TITLE.to_string()
        } else {
            title.to_string()
        }),
        content: Some(text.to_string()),
        properties: None,
        parent_id,
        database_id: Some(database_id.to_string()),
        is_template: Some(false),
    }
}
