//! Page repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqliteConnection};
use tracing::debug;

use quire_core::blob::decode_properties;
use quire_core::defaults;
use quire_core::logging::SUBSYSTEM_DB;
use quire_core::{
    new_id, BlobInput, CreatePageRequest, DeleteResult, DeleteStrategy, Error,
    InstantiateTemplateRequest, Page, PageRepository, Result, UpdatePageRequest,
};

pub(crate) const PAGE_COLUMNS: &str =
    "id, title, content, properties, parent_id, database_id, is_template, created_at_utc, updated_at_utc";

/// A page as stored, properties still encoded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub properties: String,
    pub parent_id: Option<String>,
    pub database_id: Option<String>,
    pub is_template: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

impl PageRow {
    pub(crate) fn from_row(r: &SqliteRow) -> Self {
        Self {
            id: r.get("id"),
            title: r.get("title"),
            content: r.get("content"),
            properties: r.get("properties"),
            parent_id: r.get("parent_id"),
            database_id: r.get("database_id"),
            is_template: r.get("is_template"),
            created_at_utc: r.get("created_at_utc"),
            updated_at_utc: r.get("updated_at_utc"),
        }
    }

    pub(crate) fn into_page(self) -> Page {
        Page {
            properties: decode_properties(&self.properties),
            id: self.id,
            title: self.title,
            content: self.content,
            parent_id: self.parent_id,
            database_id: self.database_id,
            is_template: self.is_template,
            created_at_utc: self.created_at_utc,
            updated_at_utc: self.updated_at_utc,
        }
    }

    /// Same stored fields, timestamps aside.
    fn same_fields(&self, other: &PageRow) -> bool {
        self.title == other.title
            && self.content == other.content
            && self.properties == other.properties
            && self.parent_id == other.parent_id
            && self.database_id == other.database_id
            && self.is_template == other.is_template
    }

    /// Apply a coalesce-merge update.
    fn merged(&self, req: UpdatePageRequest) -> PageRow {
        PageRow {
            title: req.title.unwrap_or_else(|| self.title.clone()),
            content: req.content.unwrap_or_else(|| self.content.clone()),
            properties: req
                .properties
                .map(BlobInput::into_text)
                .unwrap_or_else(|| self.properties.clone()),
            parent_id: req.parent_id.unwrap_or_else(|| self.parent_id.clone()),
            database_id: req.database_id.unwrap_or_else(|| self.database_id.clone()),
            is_template: req.is_template.unwrap_or(self.is_template),
            ..self.clone()
        }
    }

    pub(crate) async fn insert(&self, conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pages (id, title, content, properties, parent_id, database_id, is_template, created_at_utc, updated_at_utc)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&self.id)
        .bind(&self.title)
        .bind(&self.content)
        .bind(&self.properties)
        .bind(&self.parent_id)
        .bind(&self.database_id)
        .bind(self.is_template)
        .bind(self.created_at_utc)
        .bind(self.updated_at_utc)
        .execute(conn)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }
}

/// SQLite implementation of PageRepository.
#[derive(Clone)]
pub struct SqlitePageRepository {
    pool: Pool<Sqlite>,
}

impl SqlitePageRepository {
    /// Create a new SqlitePageRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    async fn fetch_row(&self, conn: &mut SqliteConnection, id: &str) -> Result<Option<PageRow>> {
        let row = sqlx::query(&format!("SELECT {} FROM pages WHERE id = ?", PAGE_COLUMNS))
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Error::Database)?;
        Ok(row.as_ref().map(PageRow::from_row))
    }
}

#[async_trait]
impl PageRepository for SqlitePageRepository {
    async fn create(&self, req: CreatePageRequest) -> Result<Page> {
        let now = Utc::now();
        let row = PageRow {
            id: new_id(),
            title: req
                .title
                .unwrap_or_else(|| defaults::PAGE_TITLE.to_string()),
            content: req.content.unwrap_or_default(),
            properties: req
                .properties
                .map(BlobInput::into_text)
                .unwrap_or_else(|| "{}".to_string()),
            parent_id: req.parent_id,
            database_id: req.database_id,
            is_template: req.is_template.unwrap_or(false),
            created_at_utc: now,
            updated_at_utc: now,
        };

        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;
        row.insert(&mut conn).await?;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "pages",
            op = "create",
            page_id = %row.id,
            database_id = ?row.database_id,
            "Page created"
        );
        Ok(row.into_page())
    }

    async fn get(&self, id: &str) -> Result<Option<Page>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;
        Ok(self.fetch_row(&mut conn, id).await?.map(PageRow::into_page))
    }

    async fn list(&self, database_id: Option<&str>) -> Result<Vec<Page>> {
        let rows = match database_id {
            Some(db) => {
                sqlx::query(&format!(
                    "SELECT {} FROM pages WHERE database_id = ? ORDER BY rowid",
                    PAGE_COLUMNS
                ))
                .bind(db)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!("SELECT {} FROM pages ORDER BY rowid", PAGE_COLUMNS))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|r| PageRow::from_row(r).into_page())
            .collect())
    }

    async fn update(&self, id: &str, req: UpdatePageRequest) -> Result<Page> {
        let mut tx = crate::begin_write(&self.pool).await?;

        let current = self
            .fetch_row(&mut tx, id)
            .await?
            .ok_or_else(|| Error::page_not_found(id))?;

        if req.is_empty() {
            return Ok(current.into_page());
        }

        let mut merged = current.merged(req);
        if merged.same_fields(&current) {
            return Ok(current.into_page());
        }
        merged.updated_at_utc = Utc::now();

        sqlx::query(
            r#"
            UPDATE pages
            SET title = ?, content = ?, properties = ?, parent_id = ?, database_id = ?,
                is_template = ?, updated_at_utc = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.title)
        .bind(&merged.content)
        .bind(&merged.properties)
        .bind(&merged.parent_id)
        .bind(&merged.database_id)
        .bind(merged.is_template)
        .bind(merged.updated_at_utc)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "pages",
            op = "update",
            page_id = %id,
            "Page updated"
        );
        Ok(merged.into_page())
    }

    async fn delete(&self, id: &str, strategy: DeleteStrategy) -> Result<DeleteResult> {
        let mut tx = crate::begin_write(&self.pool).await?;

        if self.fetch_row(&mut tx, id).await?.is_none() {
            return Err(Error::page_not_found(id));
        }

        let ids: Vec<String> = match strategy {
            DeleteStrategy::Children => {
                let mut ids = vec![id.to_string()];
                let children: Vec<String> =
                    sqlx::query_scalar("SELECT id FROM pages WHERE parent_id = ? ORDER BY rowid")
                        .bind(id)
                        .fetch_all(&mut *tx)
                        .await
                        .map_err(Error::Database)?;
                ids.extend(children.into_iter().filter(|c| c != id));
                ids
            }
            // UNION (not UNION ALL) drops revisited ids, so parent cycles end.
            DeleteStrategy::Recursive => sqlx::query_scalar(
                r#"
                WITH RECURSIVE subtree(id) AS (
                    SELECT ?
                    UNION
                    SELECT p.id FROM pages p JOIN subtree s ON p.parent_id = s.id
                )
                SELECT id FROM subtree
                "#,
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(Error::Database)?,
        };

        for page_id in &ids {
            sqlx::query("DELETE FROM pages WHERE id = ?")
                .bind(page_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "pages",
            op = "delete",
            page_id = %id,
            strategy = ?strategy,
            result_count = ids.len(),
            "Page deleted"
        );
        Ok(DeleteResult::new(ids))
    }

    async fn list_templates(&self, database_id: &str) -> Result<Vec<Page>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM pages WHERE database_id = ? AND is_template = 1 ORDER BY rowid",
            PAGE_COLUMNS
        ))
        .bind(database_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|r| PageRow::from_row(r).into_page())
            .collect())
    }

    async fn instantiate_template(
        &self,
        template_id: &str,
        req: InstantiateTemplateRequest,
    ) -> Result<Page> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;

        let template = self
            .fetch_row(&mut conn, template_id)
            .await?
            .ok_or_else(|| Error::page_not_found(template_id))?;
        if !template.is_template {
            return Err(Error::InvalidInput(format!(
                "Page {} is not a template",
                template_id
            )));
        }

        let now = Utc::now();
        let row = PageRow {
            id: new_id(),
            title: req.title.unwrap_or_else(|| template.title.clone()),
            content: template.content,
            properties: template.properties,
            parent_id: req.parent_id,
            database_id: template.database_id,
            is_template: false,
            created_at_utc: now,
            updated_at_utc: now,
        };
        row.insert(&mut conn).await?;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "pages",
            op = "instantiate_template",
            page_id = %row.id,
            template_id = %template_id,
            "Page created from template"
        );
        Ok(row.into_page())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> PageRow {
        let now = Utc::now();
        PageRow {
            id: "p".into(),
            title: "Ship it".into(),
            content: String::new(),
            properties: r#"{"status":"Todo"}"#.into(),
            parent_id: Some("parent".into()),
            database_id: Some("db".into()),
            is_template: false,
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    #[test]
    fn test_merge_empty_request_keeps_everything() {
        let current = row();
        let merged = current.merged(UpdatePageRequest::default());
        assert!(merged.same_fields(&current));
    }

    #[test]
    fn test_merge_tri_state_parent() {
        let current = row();
        let req: UpdatePageRequest = serde_json::from_value(json!({"parentId": null})).unwrap();
        assert_eq!(current.merged(req).parent_id, None);

        let req: UpdatePageRequest = serde_json::from_value(json!({"title": "New"})).unwrap();
        let merged = current.merged(req);
        assert_eq!(merged.parent_id.as_deref(), Some("parent"));
        assert_eq!(merged.title, "New");
    }

    #[test]
    fn test_merge_structured_properties() {
        let current = row();
        let req: UpdatePageRequest =
            serde_json::from_value(json!({"properties": {"status": "Done"}})).unwrap();
        let merged = current.merged(req);
        assert_eq!(merged.properties, r#"{"status":"Done"}"#);
        assert!(!merged.same_fields(&current));
    }
}
