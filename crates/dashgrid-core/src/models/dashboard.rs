//! Dashboard domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configurable dashboard: name, description, selected widgets, and
/// (via the flat `dashboard_user` relation) the set of assigned users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: Uuid,
    pub tenant_id: i64,
    pub subtenant_id: i64,
    pub name: String,
    pub description: String,
    /// Widget IDs in display order.
    pub widgets: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDashboard {
    pub tenant_id: i64,
    pub subtenant_id: i64,
    pub name: String,
    pub description: String,
    pub widgets: Vec<Uuid>,
}

/// Fields that can be updated on an existing dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDashboard {
    pub name: Option<String>,
    pub description: Option<String>,
    pub widgets: Option<Vec<Uuid>>,
}
