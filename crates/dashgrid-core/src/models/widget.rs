//! Widget domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WidgetKind {
    /// Fixed, system-defined widget available to every tenant.
    System,
    /// Tenant-defined custom widget.
    Custom,
}

/// A unit of dashboard content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    pub id: Uuid,
    /// Zero for system widgets (they are not tenant-scoped).
    pub tenant_id: i64,
    pub subtenant_id: i64,
    pub name: String,
    pub kind: WidgetKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a tenant-defined custom widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWidget {
    pub tenant_id: i64,
    pub subtenant_id: i64,
    pub name: String,
}
