//! Database (collection) repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

use quire_core::blob::{decode_for_edit, decode_or_default};
use quire_core::defaults;
use quire_core::logging::SUBSYSTEM_DB;
use quire_core::{
    new_id, plan_import, schema, AddColumnRequest, BlobInput, Column, ColumnType,
    CreateDatabaseRequest, Database, DatabaseRepository, DeleteResult, Error, ExportBundle,
    ImportPayload, Result, UpdateDatabaseRequest,
};

use crate::pages::{PageRow, PAGE_COLUMNS};

pub(crate) const DATABASE_COLUMNS: &str = "id, name, icon, columns, created_at_utc, updated_at_utc";

pub(crate) fn database_from_row(r: &SqliteRow) -> Database {
    let columns: String = r.get("columns");
    Database {
        id: r.get("id"),
        name: r.get("name"),
        icon: r.get("icon"),
        columns: decode_or_default(&columns, "columns"),
        created_at_utc: r.get("created_at_utc"),
        updated_at_utc: r.get("updated_at_utc"),
    }
}

/// SQLite implementation of DatabaseRepository.
#[derive(Clone)]
pub struct SqliteDatabaseRepository {
    pool: Pool<Sqlite>,
}

impl SqliteDatabaseRepository {
    /// Create a new SqliteDatabaseRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Read-modify-write of the column list inside one transaction.
    async fn edit_columns<F>(&self, id: &str, op: &'static str, edit: F) -> Result<Database>
    where
        F: FnOnce(&mut Vec<Column>) -> Result<()> + Send,
    {
        let mut tx = crate::begin_write(&self.pool).await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM databases WHERE id = ?",
            DATABASE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?;
        let row = row.ok_or_else(|| Error::database_not_found(id))?;
        let raw: String = row.get("columns");
        let mut database = database_from_row(&row);
        database.columns = decode_for_edit(&raw, "columns")?;

        edit(&mut database.columns)?;

        let now = Utc::now();
        let encoded = serde_json::to_string(&database.columns)?;
        sqlx::query("UPDATE databases SET columns = ?, updated_at_utc = ? WHERE id = ?")
            .bind(&encoded)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        database.updated_at_utc = now;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "databases",
            op,
            database_id = %id,
            result_count = database.columns.len(),
            "Column schema updated"
        );
        Ok(database)
    }
}

#[async_trait]
impl DatabaseRepository for SqliteDatabaseRepository {
    async fn create(&self, req: CreateDatabaseRequest) -> Result<Database> {
        let id = new_id();
        let now = Utc::now();
        let name = req
            .name
            .unwrap_or_else(|| defaults::DATABASE_NAME.to_string());
        let icon = req
            .icon
            .unwrap_or_else(|| defaults::DATABASE_ICON.to_string());
        let columns = defaults::default_columns();

        sqlx::query(
            r#"
            INSERT INTO databases (id, name, icon, columns, created_at_utc, updated_at_utc)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&name)
        .bind(&icon)
        .bind(serde_json::to_string(&columns)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "databases",
            op = "create",
            database_id = %id,
            "Database created"
        );

        Ok(Database {
            id,
            name,
            icon,
            columns,
            created_at_utc: now,
            updated_at_utc: now,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Database>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM databases WHERE id = ?",
            DATABASE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| database_from_row(&r)))
    }

    async fn list(&self) -> Result<Vec<Database>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM databases ORDER BY rowid",
            DATABASE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(database_from_row).collect())
    }

    async fn update(&self, id: &str, req: UpdateDatabaseRequest) -> Result<Database> {
        let columns = req.columns.map(BlobInput::into_text);
        if req.name.is_none() && req.icon.is_none() && columns.is_none() {
            return self
                .get(id)
                .await?
                .ok_or_else(|| Error::database_not_found(id));
        }

        let now = Utc::now();

        // Build dynamic update query
        let mut updates = vec!["updated_at_utc = ?"];
        if req.name.is_some() {
            updates.push("name = ?");
        }
        if req.icon.is_some() {
            updates.push("icon = ?");
        }
        if columns.is_some() {
            updates.push("columns = ?");
        }

        let query = format!(
            "UPDATE databases SET {} WHERE id = ?",
            updates.join(", ")
        );

        let mut q = sqlx::query(&query).bind(now);
        if let Some(name) = &req.name {
            q = q.bind(name);
        }
        if let Some(icon) = &req.icon {
            q = q.bind(icon);
        }
        if let Some(columns) = &columns {
            q = q.bind(columns);
        }

        let result = q
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::database_not_found(id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| Error::database_not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<DeleteResult> {
        let mut tx = crate::begin_write(&self.pool).await?;

        let exists = sqlx::query("SELECT id FROM databases WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;
        if exists.is_none() {
            return Err(Error::database_not_found(id));
        }

        let page_ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM pages WHERE database_id = ? ORDER BY rowid")
                .bind(id)
                .fetch_all(&mut *tx)
                .await
                .map_err(Error::Database)?;

        sqlx::query("DELETE FROM pages WHERE database_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        sqlx::query("DELETE FROM databases WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "databases",
            op = "delete",
            database_id = %id,
            result_count = page_ids.len(),
            "Database deleted with its pages"
        );

        let mut deleted_ids = Vec::with_capacity(page_ids.len() + 1);
        deleted_ids.push(id.to_string());
        deleted_ids.extend(page_ids);
        Ok(DeleteResult::new(deleted_ids))
    }

    async fn add_column(&self, id: &str, req: AddColumnRequest) -> Result<Database> {
        let column_type = match req.column_type.as_deref() {
            Some(t) => t.parse::<ColumnType>()?,
            None => ColumnType::Text,
        };
        self.edit_columns(id, "add_column", move |columns| {
            schema::add_column(columns, &req.name, column_type, req.options).map(|_| ())
        })
        .await
    }

    async fn rename_column(&self, id: &str, column_id: &str, name: &str) -> Result<Database> {
        self.edit_columns(id, "rename_column", |columns| {
            schema::rename_column(columns, column_id, name)
        })
        .await
    }

    async fn remove_column(&self, id: &str, column_id: &str) -> Result<Database> {
        self.edit_columns(id, "remove_column", |columns| {
            schema::remove_column(columns, column_id).map(|_| ())
        })
        .await
    }

    async fn import(&self, payload: ImportPayload) -> Result<Database> {
        let plan = plan_import(payload, new_id)?;
        let now = Utc::now();

        let mut tx = crate::begin_write(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO databases (id, name, icon, columns, created_at_utc, updated_at_utc)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&plan.database_id)
        .bind(&plan.name)
        .bind(&plan.icon)
        .bind(&plan.columns)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        for page in &plan.pages {
            let row = PageRow {
                id: page.id.clone(),
                title: page.title.clone(),
                content: page.content.clone(),
                properties: page.properties.clone(),
                parent_id: page.parent_id.clone(),
                database_id: Some(plan.database_id.clone()),
                is_template: page.is_template,
                created_at_utc: now,
                updated_at_utc: now,
            };
            row.insert(&mut tx).await?;
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = SUBSYSTEM_DB,
            component = "databases",
            op = "import",
            database_id = %plan.database_id,
            result_count = plan.pages.len(),
            "Database imported"
        );

        Ok(Database {
            columns: decode_or_default(&plan.columns, "columns"),
            id: plan.database_id,
            name: plan.name,
            icon: plan.icon,
            created_at_utc: now,
            updated_at_utc: now,
        })
    }

    async fn export(&self, id: &str) -> Result<ExportBundle> {
        let database = self
            .get(id)
            .await?
            .ok_or_else(|| Error::database_not_found(id))?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM pages WHERE database_id = ? ORDER BY rowid",
            PAGE_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let pages = rows
            .iter()
            .map(|r| PageRow::from_row(r).into_page())
            .collect();

        Ok(ExportBundle { database, pages })
    }
}
