//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! Directory-assigned identifiers (users, roles, tenants, subtenants)
//! are stored as ints; records this system creates (dashboards,
//! widgets, sessions) are keyed by UUID strings.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD code ON TABLE tenant TYPE string;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_code ON TABLE tenant COLUMNS code UNIQUE;

-- =======================================================================
-- Subtenants (scoped to tenant)
-- =======================================================================
DEFINE TABLE subtenant SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE subtenant TYPE int;
DEFINE FIELD code ON TABLE subtenant TYPE string;
DEFINE FIELD name ON TABLE subtenant TYPE string;
DEFINE FIELD created_at ON TABLE subtenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_subtenant_tenant_code ON TABLE subtenant \
    COLUMNS tenant_id, code UNIQUE;

-- =======================================================================
-- Directory users (tenant scope, mirrored from the upstream directory)
-- =======================================================================
DEFINE TABLE directory_user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE directory_user TYPE int;
DEFINE FIELD subtenant_id ON TABLE directory_user TYPE int;
DEFINE FIELD display_name ON TABLE directory_user TYPE string;
DEFINE FIELD profile_name ON TABLE directory_user TYPE string;
DEFINE FIELD synced_at ON TABLE directory_user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_directory_user_scope ON TABLE directory_user \
    COLUMNS tenant_id, subtenant_id;

-- =======================================================================
-- Directory roles (tenant scope, mirrored from the upstream directory)
-- =======================================================================
DEFINE TABLE directory_role SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE directory_role TYPE int;
DEFINE FIELD subtenant_id ON TABLE directory_role TYPE int;
DEFINE FIELD name ON TABLE directory_role TYPE string;
DEFINE FIELD role_type ON TABLE directory_role TYPE string;
DEFINE FIELD members ON TABLE directory_role TYPE array;
DEFINE FIELD members.* ON TABLE directory_role TYPE int;
DEFINE FIELD position ON TABLE directory_role TYPE int;
DEFINE FIELD synced_at ON TABLE directory_role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_directory_role_scope ON TABLE directory_role \
    COLUMNS tenant_id, subtenant_id;

-- =======================================================================
-- Widgets (system-wide or tenant scope)
-- =======================================================================
DEFINE TABLE widget SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE widget TYPE int;
DEFINE FIELD subtenant_id ON TABLE widget TYPE int;
DEFINE FIELD name ON TABLE widget TYPE string;
DEFINE FIELD kind ON TABLE widget TYPE string \
    ASSERT $value IN ['System', 'Custom'];
DEFINE FIELD created_at ON TABLE widget TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE widget TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_widget_scope ON TABLE widget \
    COLUMNS tenant_id, subtenant_id;

-- =======================================================================
-- Dashboards (tenant scope)
-- =======================================================================
DEFINE TABLE dashboard SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE dashboard TYPE int;
DEFINE FIELD subtenant_id ON TABLE dashboard TYPE int;
DEFINE FIELD name ON TABLE dashboard TYPE string;
DEFINE FIELD description ON TABLE dashboard TYPE string;
DEFINE FIELD widgets ON TABLE dashboard TYPE array;
DEFINE FIELD widgets.* ON TABLE dashboard TYPE string;
DEFINE FIELD created_at ON TABLE dashboard TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE dashboard TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_dashboard_scope_name ON TABLE dashboard \
    COLUMNS tenant_id, subtenant_id, name UNIQUE;

-- =======================================================================
-- Dashboard user assignments (flat relation, the only persisted
-- access-control state)
-- =======================================================================
DEFINE TABLE dashboard_user SCHEMAFULL;
DEFINE FIELD dashboard ON TABLE dashboard_user TYPE string;
DEFINE FIELD user_id ON TABLE dashboard_user TYPE int;
DEFINE FIELD tenant_id ON TABLE dashboard_user TYPE int;
DEFINE FIELD subtenant_id ON TABLE dashboard_user TYPE int;
DEFINE INDEX idx_dashboard_user ON TABLE dashboard_user \
    COLUMNS dashboard, user_id UNIQUE;

-- =======================================================================
-- Sessions (refresh tokens)
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE session TYPE int;
DEFINE FIELD subtenant_id ON TABLE session TYPE int;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query("CREATE _migration SET version = $version, name = $name")
                .bind(("version", migration.version))
                .bind(("name", migration.name))
                .await?
                .check()
                .map_err(|e| {
                    DbError::Migration(format!(
                        "Failed to record migration v{}: {}",
                        migration.version, e,
                    ))
                })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
