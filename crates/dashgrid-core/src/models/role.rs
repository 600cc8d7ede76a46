//! Directory role model.

use serde::{Deserialize, Serialize};

use crate::models::user::UserId;

/// Numeric role identifier assigned by the upstream directory.
pub type RoleId = i64;

/// An explicit, directory-managed group of users with a declared type.
///
/// Member order is preserved as delivered by the directory; the
/// reconciler depends on roles being processed in input list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub role_type: String,
    pub members: Vec<UserId>,
}

impl Role {
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        role_type: impl Into<String>,
        members: Vec<UserId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role_type: role_type.into(),
            members,
        }
    }
}
