//! Tenant and subtenant domain models.
//!
//! Two-level customer isolation: every persisted query is filtered by
//! both IDs. The auth step resolves a `(tenant_code, subtenant_code)`
//! pair to this numeric ID pair and embeds it in the signed token.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    /// External code presented at login (e.g. `ACME`).
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtenant {
    pub id: i64,
    pub tenant_id: i64,
    /// External code presented at login, unique within the tenant.
    pub code: String,
    pub name: String,
}
