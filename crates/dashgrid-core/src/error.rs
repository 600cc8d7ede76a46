//! Error types for the DASHGRID system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashgridError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

pub type DashgridResult<T> = Result<T, DashgridError>;
