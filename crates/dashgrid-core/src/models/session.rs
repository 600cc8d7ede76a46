//! Refresh-token session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub tenant_id: i64,
    pub subtenant_id: i64,
    /// SHA-256 hex hash of the raw refresh token (raw value is never stored).
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub tenant_id: i64,
    pub subtenant_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
