//! SurrealDB implementation of [`WidgetRepository`].
//!
//! System widgets are global (stored with tenant_id/subtenant_id 0)
//! and cannot be deleted; custom widgets belong to one tenant scope.

use dashgrid_core::error::DashgridResult;
use dashgrid_core::models::widget::{CreateWidget, Widget, WidgetKind};
use dashgrid_core::repository::WidgetRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct WidgetRow {
    record_id: String,
    tenant_id: i64,
    subtenant_id: i64,
    name: String,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_kind(s: &str) -> Result<WidgetKind, DbError> {
    match s {
        "System" => Ok(WidgetKind::System),
        "Custom" => Ok(WidgetKind::Custom),
        other => Err(DbError::Query(format!("unknown widget kind: {other}"))),
    }
}

impl WidgetRow {
    fn try_into_widget(self) -> Result<Widget, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Widget {
            id,
            tenant_id: self.tenant_id,
            subtenant_id: self.subtenant_id,
            name: self.name,
            kind: parse_kind(&self.kind)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Widget repository.
#[derive(Clone)]
pub struct SurrealWidgetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWidgetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Register a system-defined widget (provisioning / test setup).
    pub async fn create_system(&self, name: String) -> DashgridResult<Widget> {
        let id = Uuid::new_v4();

        let mut result = self
            .db
            .query(
                "CREATE type::record('widget', $id) SET \
                 tenant_id = 0, subtenant_id = 0, \
                 name = $name, kind = 'System' \
                 RETURN meta::id(id) AS record_id, *",
            )
            .bind(("id", id.to_string()))
            .bind(("name", name))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WidgetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "widget".into(),
            id: id.to_string(),
        })?;

        Ok(row.try_into_widget()?)
    }
}

impl<C: Connection> WidgetRepository for SurrealWidgetRepository<C> {
    async fn list_available(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
    ) -> DashgridResult<Vec<Widget>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM widget \
                 WHERE kind = 'System' \
                 OR (tenant_id = $tenant_id AND subtenant_id = $subtenant_id) \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WidgetRow> = result.take(0).map_err(DbError::from)?;
        let widgets = rows
            .into_iter()
            .map(|row| row.try_into_widget())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(widgets)
    }

    async fn create_custom(&self, input: CreateWidget) -> DashgridResult<Widget> {
        let id = Uuid::new_v4();

        let mut result = self
            .db
            .query(
                "CREATE type::record('widget', $id) SET \
                 tenant_id = $tenant_id, subtenant_id = $subtenant_id, \
                 name = $name, kind = 'Custom' \
                 RETURN meta::id(id) AS record_id, *",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id))
            .bind(("subtenant_id", input.subtenant_id))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WidgetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "widget".into(),
            id: id.to_string(),
        })?;

        Ok(row.try_into_widget()?)
    }

    async fn get_by_id(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
    ) -> DashgridResult<Widget> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM type::record('widget', $id) \
                 WHERE kind = 'System' \
                 OR (tenant_id = $tenant_id AND subtenant_id = $subtenant_id)",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WidgetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "widget".into(),
            id: id_str,
        })?;

        Ok(row.try_into_widget()?)
    }

    async fn delete_custom(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
    ) -> DashgridResult<()> {
        self.db
            .query(
                "DELETE type::record('widget', $id) \
                 WHERE kind = 'Custom' \
                 AND tenant_id = $tenant_id AND subtenant_id = $subtenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
