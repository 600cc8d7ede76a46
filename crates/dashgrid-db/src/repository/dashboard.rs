//! SurrealDB implementation of [`DashboardRepository`].
//!
//! Dashboard records carry the configuration (name, description,
//! widget list); the assigned-user set lives in the flat
//! `dashboard_user` relation and is replaced wholesale on editor save.

use std::collections::BTreeSet;

use dashgrid_core::access::AssignmentSet;
use dashgrid_core::error::{DashgridError, DashgridResult};
use dashgrid_core::models::dashboard::{CreateDashboard, Dashboard, UpdateDashboard};
use dashgrid_core::repository::{DashboardRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct DashboardRow {
    tenant_id: i64,
    subtenant_id: i64,
    name: String,
    description: String,
    widgets: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct DashboardRowWithId {
    record_id: String,
    tenant_id: i64,
    subtenant_id: i64,
    name: String,
    description: String,
    widgets: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_widgets(raw: Vec<String>) -> Result<Vec<Uuid>, DbError> {
    raw.into_iter()
        .map(|w| {
            Uuid::parse_str(&w).map_err(|e| DbError::Query(format!("invalid widget UUID: {e}")))
        })
        .collect()
}

impl DashboardRow {
    fn into_dashboard(self, id: Uuid) -> Result<Dashboard, DbError> {
        Ok(Dashboard {
            id,
            tenant_id: self.tenant_id,
            subtenant_id: self.subtenant_id,
            name: self.name,
            description: self.description,
            widgets: parse_widgets(self.widgets)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DashboardRowWithId {
    fn try_into_dashboard(self) -> Result<Dashboard, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Dashboard {
            id,
            tenant_id: self.tenant_id,
            subtenant_id: self.subtenant_id,
            name: self.name,
            description: self.description,
            widgets: parse_widgets(self.widgets)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for assignment queries.
#[derive(Debug, SurrealValue)]
struct AssignmentRow {
    user_id: i64,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// A write that trips the scope+name unique index means the name is
/// already taken within this tenant/subtenant.
fn map_write_error(e: surrealdb::Error) -> DashgridError {
    let msg = e.to_string();
    if msg.contains("idx_dashboard_scope_name") {
        DashgridError::AlreadyExists {
            entity: "dashboard".into(),
        }
    } else {
        DbError::Query(msg).into()
    }
}

/// SurrealDB implementation of the Dashboard repository.
#[derive(Clone)]
pub struct SurrealDashboardRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDashboardRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DashboardRepository for SurrealDashboardRepository<C> {
    async fn create(&self, input: CreateDashboard) -> DashgridResult<Dashboard> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let widgets: Vec<String> = input.widgets.iter().map(Uuid::to_string).collect();

        let result = self
            .db
            .query(
                "CREATE type::record('dashboard', $id) SET \
                 tenant_id = $tenant_id, subtenant_id = $subtenant_id, \
                 name = $name, description = $description, \
                 widgets = $widgets",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id))
            .bind(("subtenant_id", input.subtenant_id))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("widgets", widgets))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(map_write_error)?;

        let rows: Vec<DashboardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dashboard".into(),
            id: id_str,
        })?;

        Ok(row.into_dashboard(id)?)
    }

    async fn get_by_id(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
    ) -> DashgridResult<Dashboard> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('dashboard', $id) \
                 WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DashboardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dashboard".into(),
            id: id_str,
        })?;

        Ok(row.into_dashboard(id)?)
    }

    async fn update(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
        input: UpdateDashboard,
    ) -> DashgridResult<Dashboard> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.widgets.is_some() {
            sets.push("widgets = $widgets");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('dashboard', $id) SET {} \
             WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(widgets) = input.widgets {
            let widgets: Vec<String> = widgets.iter().map(Uuid::to_string).collect();
            builder = builder.bind(("widgets", widgets));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(map_write_error)?;

        let rows: Vec<DashboardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "dashboard".into(),
            id: id_str,
        })?;

        Ok(row.into_dashboard(id)?)
    }

    async fn delete(&self, tenant_id: i64, subtenant_id: i64, id: Uuid) -> DashgridResult<()> {
        let id_str = id.to_string();

        // Remove assignment rows first, then the dashboard record.
        self.db
            .query(
                "DELETE dashboard_user WHERE dashboard = $id \
                 AND tenant_id = $tenant_id AND subtenant_id = $subtenant_id; \
                 DELETE type::record('dashboard', $id) \
                 WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id;",
            )
            .bind(("id", id_str))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        pagination: Pagination,
    ) -> DashgridResult<PaginatedResult<Dashboard>> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM dashboard \
                 WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id \
                 GROUP ALL",
            )
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM dashboard \
                 WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DashboardRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_dashboard())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn get_assigned_users(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        dashboard_id: Uuid,
    ) -> DashgridResult<AssignmentSet> {
        let mut result = self
            .db
            .query(
                "SELECT user_id FROM dashboard_user WHERE dashboard = $dashboard \
                 AND tenant_id = $tenant_id AND subtenant_id = $subtenant_id",
            )
            .bind(("dashboard", dashboard_id.to_string()))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|r| r.user_id).collect::<BTreeSet<_>>())
    }

    async fn set_assigned_users(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        dashboard_id: Uuid,
        assigned: &AssignmentSet,
    ) -> DashgridResult<()> {
        let user_ids: Vec<i64> = assigned.iter().copied().collect();

        let result = self
            .db
            .query(
                "DELETE dashboard_user WHERE dashboard = $dashboard \
                 AND tenant_id = $tenant_id AND subtenant_id = $subtenant_id; \
                 FOR $uid IN $user_ids { \
                     CREATE dashboard_user SET dashboard = $dashboard, \
                     user_id = $uid, tenant_id = $tenant_id, \
                     subtenant_id = $subtenant_id; \
                 };",
            )
            .bind(("dashboard", dashboard_id.to_string()))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .bind(("user_ids", user_ids))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }
}
