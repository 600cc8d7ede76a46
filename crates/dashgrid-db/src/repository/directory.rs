//! SurrealDB implementation of [`DirectoryRepository`].
//!
//! The directory is owned upstream; this table is a mirror refreshed
//! by the sync job. Role input order matters to the reconciler, so
//! roles carry a `position` assigned at first insert and `list_roles`
//! returns them in that order.

use dashgrid_core::editor::DirectorySnapshot;
use dashgrid_core::error::DashgridResult;
use dashgrid_core::models::role::Role;
use dashgrid_core::models::user::User;
use dashgrid_core::repository::DirectoryRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct UserRow {
    record_id: i64,
    display_name: String,
    profile_name: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.record_id,
            display_name: self.display_name,
            profile_name: self.profile_name,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct RoleRow {
    record_id: i64,
    name: String,
    role_type: String,
    members: Vec<i64>,
}

impl RoleRow {
    fn into_role(self) -> Role {
        Role {
            id: self.record_id,
            name: self.name,
            role_type: self.role_type,
            members: self.members,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct PositionRow {
    position: i64,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the directory mirror.
#[derive(Clone)]
pub struct SurrealDirectoryRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDirectoryRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DirectoryRepository for SurrealDirectoryRepository<C> {
    async fn list_users(&self, tenant_id: i64, subtenant_id: i64) -> DashgridResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM directory_user \
                 WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id \
                 ORDER BY record_id ASC",
            )
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn list_roles(&self, tenant_id: i64, subtenant_id: i64) -> DashgridResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM directory_role \
                 WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id \
                 ORDER BY position ASC",
            )
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(RoleRow::into_role).collect())
    }

    async fn snapshot(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
    ) -> DashgridResult<DirectorySnapshot> {
        let users = self.list_users(tenant_id, subtenant_id).await?;
        let roles = self.list_roles(tenant_id, subtenant_id).await?;
        Ok(DirectorySnapshot { users, roles })
    }

    async fn upsert_user(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        user: User,
    ) -> DashgridResult<User> {
        let result = self
            .db
            .query(
                "UPSERT type::record('directory_user', $id) SET \
                 tenant_id = $tenant_id, subtenant_id = $subtenant_id, \
                 display_name = $display_name, profile_name = $profile_name, \
                 synced_at = time::now()",
            )
            .bind(("id", user.id))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .bind(("display_name", user.display_name.clone()))
            .bind(("profile_name", user.profile_name.clone()))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(user)
    }

    async fn upsert_role(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        role: Role,
    ) -> DashgridResult<Role> {
        // Keep the position of an already-mirrored role; a new role
        // goes to the end of the list.
        let mut result = self
            .db
            .query("SELECT position FROM type::record('directory_role', $id)")
            .bind(("id", role.id))
            .await
            .map_err(DbError::from)?;
        let existing: Vec<PositionRow> = result.take(0).map_err(DbError::from)?;

        let position = match existing.first() {
            Some(row) => row.position,
            None => {
                let mut count_result = self
                    .db
                    .query(
                        "SELECT count() AS total FROM directory_role \
                         WHERE tenant_id = $tenant_id AND subtenant_id = $subtenant_id \
                         GROUP ALL",
                    )
                    .bind(("tenant_id", tenant_id))
                    .bind(("subtenant_id", subtenant_id))
                    .await
                    .map_err(DbError::from)?;
                let counts: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
                counts.first().map(|r| r.total).unwrap_or(0) as i64
            }
        };

        let result = self
            .db
            .query(
                "UPSERT type::record('directory_role', $id) SET \
                 tenant_id = $tenant_id, subtenant_id = $subtenant_id, \
                 name = $name, role_type = $role_type, members = $members, \
                 position = $position, synced_at = time::now()",
            )
            .bind(("id", role.id))
            .bind(("tenant_id", tenant_id))
            .bind(("subtenant_id", subtenant_id))
            .bind(("name", role.name.clone()))
            .bind(("role_type", role.role_type.clone()))
            .bind(("members", role.members.clone()))
            .bind(("position", position))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(role)
    }
}
