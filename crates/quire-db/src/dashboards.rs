//! Dashboard repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use quire_core::defaults;
use quire_core::layout;
use quire_core::logging::SUBSYSTEM_DB;
use quire_core::{
    new_id, AddWidgetRequest, BlobInput, CreateDashboardRequest, Dashboard, DashboardRepository,
    DeleteResult, Error, LayoutItem, Result, UpdateDashboardRequest, Widget, WidgetType,
};

pub(crate) const DASHBOARD_COLUMNS: &str = "id, name, widgets, created_at_utc, updated_at_utc";

pub(crate) fn dashboard_from_row(r: &SqliteRow) -> Dashboard {
    let widgets: String = r.get("widgets");
    Dashboard {
        id: r.get("id"),
        name: r.get("name"),
        widgets: layout::decode_widgets(&widgets),
        created_at_utc: r.get("created_at_utc"),
        updated_at_utc: r.get("updated_at_utc"),
    }
}

/// SQLite implementation of DashboardRepository.
#[derive(Clone)]
pub struct SqliteDashboardRepository {
    pool: Pool<Sqlite>,
}

impl SqliteDashboardRepository {
    /// Create a new SqliteDashboardRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Read-modify-write of the widget list inside one transaction.
    async fn edit_widgets<F>(&self, id: &str, op: &'static str, edit: F) -> Result<Dashboard>
    where
        F: FnOnce(&mut Vec<Widget>) -> Result<()> + Send,
    {
        let mut tx = crate::begin_write(&self.pool).await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM dashboards WHERE id = ?",
            DASHBOARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?;
        let row = row.ok_or_else(|| Error::dashboard_not_found(id))?;
        let raw: String = row.get("widgets");
        let mut dashboard = dashboard_from_row(&row);
        dashboard.widgets = layout::decode_widgets_for_edit(&raw)?;

        edit(&mut dashboard.widgets)?;

        let now = Utc::now();
        let encoded = serde_json::to_string(&dashboard.widgets)?;
        sqlx::query("UPDATE dashboards SET widgets = ?, updated_at_utc = ? WHERE id = ?")
            .bind(&encoded)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        dashboard.updated_at_utc = now;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "dashboards",
            op,
            dashboard_id = %id,
            result_count = dashboard.widgets.len(),
            "Widget layout updated"
        );
        Ok(dashboard)
    }
}

#[async_trait]
impl DashboardRepository for SqliteDashboardRepository {
    async fn create(&self, req: CreateDashboardRequest) -> Result<Dashboard> {
        let id = new_id();
        let now = Utc::now();
        let name = req
            .name
            .unwrap_or_else(|| defaults::DASHBOARD_NAME.to_string());
        let widgets = req
            .widgets
            .map(BlobInput::into_text)
            .unwrap_or_else(|| "[]".to_string());

        sqlx::query(
            r#"
            INSERT INTO dashboards (id, name, widgets, created_at_utc, updated_at_utc)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&name)
        .bind(&widgets)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "dashboards",
            op = "create",
            dashboard_id = %id,
            "Dashboard created"
        );

        Ok(Dashboard {
            id,
            name,
            widgets: layout::decode_widgets(&widgets),
            created_at_utc: now,
            updated_at_utc: now,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Dashboard>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM dashboards WHERE id = ?",
            DASHBOARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| dashboard_from_row(&r)))
    }

    async fn list(&self) -> Result<Vec<Dashboard>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM dashboards ORDER BY rowid",
            DASHBOARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(dashboard_from_row).collect())
    }

    async fn update(&self, id: &str, req: UpdateDashboardRequest) -> Result<Dashboard> {
        let widgets = req.widgets.map(BlobInput::into_text);
        if req.name.is_none() && widgets.is_none() {
            return self
                .get(id)
                .await?
                .ok_or_else(|| Error::dashboard_not_found(id));
        }

        let now = Utc::now();

        let mut updates = vec!["updated_at_utc = ?"];
        if req.name.is_some() {
            updates.push("name = ?");
        }
        if widgets.is_some() {
            updates.push("widgets = ?");
        }

        let query = format!(
            "UPDATE dashboards SET {} WHERE id = ?",
            updates.join(", ")
        );

        let mut q = sqlx::query(&query).bind(now);
        if let Some(name) = &req.name {
            q = q.bind(name);
        }
        if let Some(widgets) = &widgets {
            q = q.bind(widgets);
        }

        let result = q
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::dashboard_not_found(id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| Error::dashboard_not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<DeleteResult> {
        let result = sqlx::query("DELETE FROM dashboards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::dashboard_not_found(id));
        }

        debug!(
            subsystem = SUBSYSTEM_DB,
            component = "dashboards",
            op = "delete",
            dashboard_id = %id,
            "Dashboard deleted"
        );
        Ok(DeleteResult::new(vec![id.to_string()]))
    }

    async fn add_widget(&self, id: &str, req: AddWidgetRequest) -> Result<Dashboard> {
        let widget_type: WidgetType = req.widget_type.parse()?;
        self.edit_widgets(id, "add_widget", move |widgets| {
            layout::add_widget(widgets, widget_type, req.database_id, req.view_mode).map(|_| ())
        })
        .await
    }

    async fn remove_widget(&self, id: &str, widget_id: &str) -> Result<Dashboard> {
        self.edit_widgets(id, "remove_widget", |widgets| {
            layout::remove_widget(widgets, widget_id).map(|_| ())
        })
        .await
    }

    async fn apply_layout(&self, id: &str, items: Vec<LayoutItem>) -> Result<Dashboard> {
        self.edit_widgets(id, "apply_layout", move |widgets| {
            layout::apply_layout(widgets, &items);
            Ok(())
        })
        .await
    }
}
