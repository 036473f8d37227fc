//! Typed navigation.
//!
//! Views ask to go somewhere with a [`NavigationRequest`]; the [`Navigator`]
//! checks the target exists and answers with the [`Route`] to show.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::models::{Dashboard, Database, Page};
use crate::projection::hierarchy::breadcrumbs;

/// Kind of record being navigated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NavigationTarget {
    Dashboard,
    Database,
    Page,
    Note,
}

/// A request to open a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NavigationRequest {
    pub target: NavigationTarget,
    pub id: String,
    /// For `database`: a page of that database to open as a sub-list.
    #[serde(default)]
    pub context: Option<String>,
}

/// Top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Dashboard,
    Database,
    Notes,
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Crumb {
    pub id: String,
    pub title: String,
}

/// Where navigation lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub view: View,
    pub dashboard_id: Option<String>,
    pub database_id: Option<String>,
    /// Page whose children are listed; `None` lists the root level.
    pub parent_id: Option<String>,
    /// Page opened in the editor.
    pub page_id: Option<String>,
    /// Root-first path to `parent_id`.
    pub breadcrumbs: Vec<Crumb>,
}

impl Route {
    fn new(view: View) -> Self {
        Self {
            view,
            dashboard_id: None,
            database_id: None,
            parent_id: None,
            page_id: None,
            breadcrumbs: Vec::new(),
        }
    }
}

/// Resolves navigation requests against a snapshot of the records.
pub struct Navigator<'a> {
    databases: &'a [Database],
    pages: &'a [Page],
    dashboards: &'a [Dashboard],
}

impl<'a> Navigator<'a> {
    pub fn new(databases: &'a [Database], pages: &'a [Page], dashboards: &'a [Dashboard]) -> Self {
        Self {
            databases,
            pages,
            dashboards,
        }
    }

    pub fn resolve(&self, req: &NavigationRequest) -> Result<Route> {
        match req.target {
            NavigationTarget::Dashboard => {
                self.dashboards
                    .iter()
                    .find(|d| d.id == req.id)
                    .ok_or_else(|| Error::dashboard_not_found(&req.id))?;
                Ok(Route {
                    dashboard_id: Some(req.id.clone()),
                    ..Route::new(View::Dashboard)
                })
            }
            NavigationTarget::Database => {
                self.database(&req.id)?;
                let parent = req
                    .context
                    .as_deref()
                    .and_then(|ctx| self.page(ctx).ok())
                    .filter(|p| p.database_id.as_deref() == Some(req.id.as_str()));
                Ok(Route {
                    database_id: Some(req.id.clone()),
                    parent_id: parent.map(|p| p.id.clone()),
                    breadcrumbs: self.crumbs(parent.map(|p| p.id.as_str())),
                    ..Route::new(View::Database)
                })
            }
            NavigationTarget::Page => {
                let page = self.page(&req.id)?;
                match page.database_id.as_deref() {
                    Some(db) if self.database(db).is_ok() => Ok(Route {
                        database_id: Some(db.to_string()),
                        parent_id: page.parent_id.clone(),
                        page_id: Some(page.id.clone()),
                        breadcrumbs: self.crumbs(page.parent_id.as_deref()),
                        ..Route::new(View::Database)
                    }),
                    _ => Ok(self.note_route(page)),
                }
            }
            NavigationTarget::Note => {
                let page = self.page(&req.id)?;
                Ok(self.note_route(page))
            }
        }
    }

    fn note_route(&self, page: &Page) -> Route {
        Route {
            parent_id: page.parent_id.clone(),
            page_id: Some(page.id.clone()),
            breadcrumbs: self.crumbs(page.parent_id.as_deref()),
            ..Route::new(View::Notes)
        }
    }

    fn crumbs(&self, parent_id: Option<&str>) -> Vec<Crumb> {
        breadcrumbs(self.pages, parent_id)
            .into_iter()
            .map(|p| Crumb {
                id: p.id.clone(),
                title: p.title.clone(),
            })
            .collect()
    }

    fn database(&self, id: &str) -> Result<&'a Database> {
        self.databases
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::database_not_found(id))
    }

    fn page(&self, id: &str) -> Result<&'a Page> {
        self.pages
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::page_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_columns;
    use crate::projection::fixtures::page;
    use chrono::Utc;

    fn records() -> (Vec<Database>, Vec<Page>, Vec<Dashboard>) {
        let now = Utc::now();
        let dbs = vec![Database {
            id: "db".into(),
            name: "Design".into(),
            icon: "Palette".into(),
            columns: default_columns(),
            created_at_utc: now,
            updated_at_utc: now,
        }];
        let mut note = page("note", None, None);
        note.database_id = None;
        let pages = vec![page("1", None, None), page("6", Some("1"), None), note];
        let dashboards = vec![Dashboard {
            id: "home".into(),
            name: "Home".into(),
            widgets: vec![],
            created_at_utc: now,
            updated_at_utc: now,
        }];
        (dbs, pages, dashboards)
    }

    fn req(target: NavigationTarget, id: &str, context: Option<&str>) -> NavigationRequest {
        NavigationRequest {
            target,
            id: id.into(),
            context: context.map(str::to_string),
        }
    }

    #[test]
    fn test_dashboard_route() {
        let (d, p, h) = records();
        let nav = Navigator::new(&d, &p, &h);
        let route = nav.resolve(&req(NavigationTarget::Dashboard, "home", None)).unwrap();
        assert_eq!(route.view, View::Dashboard);
        assert_eq!(route.dashboard_id.as_deref(), Some("home"));
    }

    #[test]
    fn test_database_route_with_context() {
        let (d, p, h) = records();
        let nav = Navigator::new(&d, &p, &h);
        let route = nav
            .resolve(&req(NavigationTarget::Database, "db", Some("1")))
            .unwrap();
        assert_eq!(route.view, View::Database);
        assert_eq!(route.parent_id.as_deref(), Some("1"));
        assert_eq!(route.breadcrumbs.len(), 1);
        assert_eq!(route.breadcrumbs[0].title, "Page 1");

        let route = nav
            .resolve(&req(NavigationTarget::Database, "db", Some("nope")))
            .unwrap();
        assert_eq!(route.parent_id, None);
        assert!(route.breadcrumbs.is_empty());
    }

    #[test]
    fn test_sub_task_page_route() {
        let (d, p, h) = records();
        let nav = Navigator::new(&d, &p, &h);
        let route = nav.resolve(&req(NavigationTarget::Page, "6", None)).unwrap();
        assert_eq!(route.view, View::Database);
        assert_eq!(route.database_id.as_deref(), Some("db"));
        assert_eq!(route.parent_id.as_deref(), Some("1"));
        assert_eq!(route.page_id.as_deref(), Some("6"));
        assert_eq!(route.breadcrumbs[0].id, "1");
    }

    #[test]
    fn test_standalone_page_goes_to_notes() {
        let (d, p, h) = records();
        let nav = Navigator::new(&d, &p, &h);
        let route = nav.resolve(&req(NavigationTarget::Page, "note", None)).unwrap();
        assert_eq!(route.view, View::Notes);
        let route = nav.resolve(&req(NavigationTarget::Note, "6", None)).unwrap();
        assert_eq!(route.view, View::Notes);
        assert_eq!(route.page_id.as_deref(), Some("6"));
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let (d, p, h) = records();
        let nav = Navigator::new(&d, &p, &h);
        for target in [
            NavigationTarget::Dashboard,
            NavigationTarget::Database,
            NavigationTarget::Page,
            NavigationTarget::Note,
        ] {
            let err = nav.resolve(&req(target, "missing", None)).unwrap_err();
            assert!(matches!(err, Error::NotFound(_)));
        }
    }
}
