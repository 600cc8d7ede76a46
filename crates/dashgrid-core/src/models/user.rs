//! Directory user model.

use serde::{Deserialize, Serialize};

/// Numeric user identifier assigned by the upstream directory.
pub type UserId = i64;

/// A user as reported by the directory. Read-only from this system's
/// perspective: the directory owns the record, we only mirror it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    /// Category label shared by all users of the same profile.
    /// An empty string means the user belongs to no profile.
    pub profile_name: String,
}

impl User {
    pub fn new(id: UserId, display_name: impl Into<String>, profile_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            profile_name: profile_name.into(),
        }
    }
}
