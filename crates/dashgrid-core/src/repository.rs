//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require the `(tenant_id, subtenant_id)` pair on every call to
//! enforce two-level data isolation.

use uuid::Uuid;

use crate::access::AssignmentSet;
use crate::editor::DirectorySnapshot;
use crate::error::DashgridResult;
use crate::models::{
    dashboard::{CreateDashboard, Dashboard, UpdateDashboard},
    role::Role,
    session::{CreateSession, Session},
    tenant::{Subtenant, Tenant},
    user::User,
    widget::{CreateWidget, Widget},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant registry (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    /// Resolve an external code pair to the numeric ID pair embedded
    /// in issued tokens.
    fn get_by_codes(
        &self,
        tenant_code: &str,
        subtenant_code: &str,
    ) -> impl Future<Output = DashgridResult<(Tenant, Subtenant)>> + Send;

    /// Register a tenant (provisioning / test setup).
    fn create_tenant(
        &self,
        tenant: Tenant,
    ) -> impl Future<Output = DashgridResult<Tenant>> + Send;

    /// Register a subtenant under an existing tenant.
    fn create_subtenant(
        &self,
        subtenant: Subtenant,
    ) -> impl Future<Output = DashgridResult<Subtenant>> + Send;
}

// ---------------------------------------------------------------------------
// User/role directory mirror (tenant-scoped, read-mostly)
// ---------------------------------------------------------------------------

pub trait DirectoryRepository: Send + Sync {
    fn list_users(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
    ) -> impl Future<Output = DashgridResult<Vec<User>>> + Send;

    fn list_roles(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
    ) -> impl Future<Output = DashgridResult<Vec<Role>>> + Send;

    /// Users and roles captured together; what the rule editor opens
    /// against.
    fn snapshot(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
    ) -> impl Future<Output = DashgridResult<DirectorySnapshot>> + Send;

    /// Insert or refresh a mirrored user record (directory sync).
    fn upsert_user(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        user: User,
    ) -> impl Future<Output = DashgridResult<User>> + Send;

    /// Insert or refresh a mirrored role record (directory sync).
    fn upsert_role(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        role: Role,
    ) -> impl Future<Output = DashgridResult<Role>> + Send;
}

// ---------------------------------------------------------------------------
// Dashboards (tenant-scoped)
// ---------------------------------------------------------------------------

pub trait DashboardRepository: Send + Sync {
    fn create(
        &self,
        input: CreateDashboard,
    ) -> impl Future<Output = DashgridResult<Dashboard>> + Send;

    fn get_by_id(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
    ) -> impl Future<Output = DashgridResult<Dashboard>> + Send;

    fn update(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
        input: UpdateDashboard,
    ) -> impl Future<Output = DashgridResult<Dashboard>> + Send;

    /// Deletes the dashboard and its user-assignment rows.
    fn delete(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
    ) -> impl Future<Output = DashgridResult<()>> + Send;

    fn list(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        pagination: Pagination,
    ) -> impl Future<Output = DashgridResult<PaginatedResult<Dashboard>>> + Send;

    /// The flat set of user IDs assigned to a dashboard — the only
    /// persisted access-control state.
    fn get_assigned_users(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        dashboard_id: Uuid,
    ) -> impl Future<Output = DashgridResult<AssignmentSet>> + Send;

    /// Replace the assignment set wholesale (editor save).
    fn set_assigned_users(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        dashboard_id: Uuid,
        assigned: &AssignmentSet,
    ) -> impl Future<Output = DashgridResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

pub trait WidgetRepository: Send + Sync {
    /// System widgets plus the tenant's custom widgets.
    fn list_available(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
    ) -> impl Future<Output = DashgridResult<Vec<Widget>>> + Send;

    fn create_custom(
        &self,
        input: CreateWidget,
    ) -> impl Future<Output = DashgridResult<Widget>> + Send;

    fn get_by_id(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
    ) -> impl Future<Output = DashgridResult<Widget>> + Send;

    /// Custom widgets only; system widgets cannot be deleted.
    fn delete_custom(
        &self,
        tenant_id: i64,
        subtenant_id: i64,
        id: Uuid,
    ) -> impl Future<Output = DashgridResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Refresh-token sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSession,
    ) -> impl Future<Output = DashgridResult<Session>> + Send;

    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = DashgridResult<Session>> + Send;

    /// Invalidate a single session.
    fn invalidate(&self, id: Uuid) -> impl Future<Output = DashgridResult<()>> + Send;

    /// Remove all expired sessions; returns the number removed.
    fn cleanup_expired(&self) -> impl Future<Output = DashgridResult<u64>> + Send;
}
