//! Demo content for a fresh store.
//!
//! Records and dashboards are seeded independently, each only when its table
//! is empty, so a user who deleted the demo dashboard does not get it back
//! while their databases remain.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use quire_core::defaults;
use quire_core::logging::SUBSYSTEM_DB;
use quire_core::{Error, Result};

use crate::pages::PageRow;
use crate::Store;

struct SeedPage {
    id: &'static str,
    title: &'static str,
    content: &'static str,
    status: &'static str,
    date: Option<&'static str>,
    priority: &'static str,
    assignee: Option<&'static str>,
    parent_id: Option<&'static str>,
    database_id: &'static str,
    is_template: bool,
}

const SEED_PAGES: &[SeedPage] = &[
    SeedPage {
        id: "tpl-1",
        title: "Bug Report Template",
        content: "<h2>Steps to Reproduce</h2><p>1. </p><h2>Expected Behavior</h2><p></p><h2>Actual Behavior</h2><p></p>",
        status: "Todo",
        date: None,
        priority: "High",
        assignee: None,
        parent_id: None,
        database_id: "db-2",
        is_template: true,
    },
    SeedPage {
        id: "tpl-2",
        title: "Design Spec Template",
        content: "<h2>Overview</h2><p></p><h2>Requirements</h2><ul><li></li></ul>",
        status: "Todo",
        date: None,
        priority: "Medium",
        assignee: None,
        parent_id: None,
        database_id: "db-1",
        is_template: true,
    },
    SeedPage {
        id: "1",
        title: "Color Palette Refinement",
        content: "We need to refine the primary and secondary colors for the new brand identity.",
        status: "In Progress",
        date: Some("Oct 12, 2023"),
        priority: "High",
        assignee: Some("Alex M."),
        parent_id: None,
        database_id: "db-1",
        is_template: false,
    },
    SeedPage {
        id: "2",
        title: "Database Schema UI",
        content: "Design the UI for the database schema builder.",
        status: "Done",
        date: Some("Oct 10, 2023"),
        priority: "Medium",
        assignee: Some("Lena S."),
        parent_id: None,
        database_id: "db-1",
        is_template: false,
    },
    SeedPage {
        id: "3",
        title: "Typography Guide (Inter)",
        content: "Create a comprehensive guide for using the Inter font family.",
        status: "Todo",
        date: Some("Oct 08, 2023"),
        priority: "Low",
        assignee: Some("Marc K."),
        parent_id: None,
        database_id: "db-1",
        is_template: false,
    },
    SeedPage {
        id: "4",
        title: "API Rate Limiting",
        content: "Implement rate limiting for the public API.",
        status: "In Progress",
        date: Some("Oct 05, 2023"),
        priority: "High",
        assignee: Some("Sarah P."),
        parent_id: None,
        database_id: "db-2",
        is_template: false,
    },
    SeedPage {
        id: "5",
        title: "Redis Cache Setup",
        content: "Setup Redis cache for faster read operations.",
        status: "Done",
        date: Some("Oct 01, 2023"),
        priority: "Medium",
        assignee: Some("Alex M."),
        parent_id: None,
        database_id: "db-2",
        is_template: false,
    },
    SeedPage {
        id: "6",
        title: "Primary Colors",
        content: "Selected Blue (#135bec) as the primary brand color.",
        status: "Done",
        date: Some("Oct 11, 2023"),
        priority: "High",
        assignee: Some("Alex M."),
        parent_id: Some("1"),
        database_id: "db-1",
        is_template: false,
    },
];

impl SeedPage {
    fn properties(&self) -> String {
        let mut props = serde_json::Map::new();
        props.insert(defaults::STATUS_KEY.into(), json!(self.status));
        if let Some(date) = self.date {
            props.insert(defaults::DATE_KEY.into(), json!(date));
        }
        props.insert("priority".into(), json!(self.priority));
        if let Some(assignee) = self.assignee {
            props.insert("assignee".into(), json!(assignee));
        }
        serde_json::Value::Object(props).to_string()
    }
}

fn home_widgets() -> String {
    json!([
        {"i": "w1", "x": 0, "y": 0, "w": 2, "h": 2, "type": "database", "databaseId": "db-1", "viewMode": "table"},
        {"i": "w2", "x": 2, "y": 0, "w": 1, "h": 2, "type": "notes"},
        {"i": "w3", "x": 0, "y": 2, "w": 3, "h": 2, "type": "database", "databaseId": "db-2", "viewMode": "board"}
    ])
    .to_string()
}

/// Insert the demo databases, pages, and home dashboard into empty tables.
///
/// Returns true when anything was inserted.
pub async fn seed_demo_data(store: &Store) -> Result<bool> {
    let mut tx = crate::begin_write(&store.pool).await?;
    let now = Utc::now();
    let mut seeded = false;

    let databases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM databases")
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;
    if databases == 0 {
        let columns = serde_json::to_string(&defaults::default_columns())?;
        for (id, name, icon) in [
            ("db-1", "Design Project", "Palette"),
            ("db-2", "Engineering Tasks", "Code"),
        ] {
            sqlx::query(
                r#"
                INSERT INTO databases (id, name, icon, columns, created_at_utc, updated_at_utc)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(icon)
            .bind(&columns)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        for page in SEED_PAGES {
            PageRow {
                id: page.id.to_string(),
                title: page.title.to_string(),
                content: page.content.to_string(),
                properties: page.properties(),
                parent_id: page.parent_id.map(str::to_string),
                database_id: Some(page.database_id.to_string()),
                is_template: page.is_template,
                created_at_utc: now,
                updated_at_utc: now,
            }
            .insert(&mut tx)
            .await?;
        }
        seeded = true;
    }

    let dashboards: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dashboards")
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;
    if dashboards == 0 {
        sqlx::query(
            r#"
            INSERT INTO dashboards (id, name, widgets, created_at_utc, updated_at_utc)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind("dash-1")
        .bind("Home Dashboard")
        .bind(home_widgets())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;
        seeded = true;
    }

    tx.commit().await.map_err(Error::Database)?;

    if seeded {
        info!(
            subsystem = SUBSYSTEM_DB,
            component = "seed",
            op = "seed_demo_data",
            page_count = SEED_PAGES.len(),
            "Seeded demo data"
        );
    }
    Ok(seeded)
}
