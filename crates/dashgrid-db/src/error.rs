//! Database-specific error types and conversions.

use dashgrid_core::error::DashgridError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for DashgridError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => DashgridError::NotFound { entity, id },
            other => DashgridError::Database(other.to_string()),
        }
    }
}
