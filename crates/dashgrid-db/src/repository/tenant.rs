//! SurrealDB implementation of [`TenantRepository`].
//!
//! The tenant registry is the map the auth step consults: an external
//! `(tenant_code, subtenant_code)` pair resolves to the numeric ID
//! pair embedded in issued tokens.

use dashgrid_core::error::DashgridResult;
use dashgrid_core::models::tenant::{Subtenant, Tenant};
use dashgrid_core::repository::TenantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TenantRow {
    record_id: i64,
    code: String,
    name: String,
}

impl TenantRow {
    fn into_tenant(self) -> Tenant {
        Tenant {
            id: self.record_id,
            code: self.code,
            name: self.name,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct SubtenantRow {
    record_id: i64,
    tenant_id: i64,
    code: String,
    name: String,
}

impl SubtenantRow {
    fn into_subtenant(self) -> Subtenant {
        Subtenant {
            id: self.record_id,
            tenant_id: self.tenant_id,
            code: self.code,
            name: self.name,
        }
    }
}

/// SurrealDB implementation of the tenant registry.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn get_by_codes(
        &self,
        tenant_code: &str,
        subtenant_code: &str,
    ) -> DashgridResult<(Tenant, Subtenant)> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM tenant WHERE code = $code")
            .bind(("code", tenant_code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let tenant = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "tenant".into(),
                id: format!("code={tenant_code}"),
            })?
            .into_tenant();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM subtenant \
                 WHERE tenant_id = $tenant_id AND code = $code",
            )
            .bind(("tenant_id", tenant.id))
            .bind(("code", subtenant_code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubtenantRow> = result.take(0).map_err(DbError::from)?;
        let subtenant = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "subtenant".into(),
                id: format!("code={subtenant_code}"),
            })?
            .into_subtenant();

        Ok((tenant, subtenant))
    }

    async fn create_tenant(&self, tenant: Tenant) -> DashgridResult<Tenant> {
        let result = self
            .db
            .query("CREATE type::record('tenant', $id) SET code = $code, name = $name")
            .bind(("id", tenant.id))
            .bind(("code", tenant.code.clone()))
            .bind(("name", tenant.name.clone()))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(tenant)
    }

    async fn create_subtenant(&self, subtenant: Subtenant) -> DashgridResult<Subtenant> {
        let result = self
            .db
            .query(
                "CREATE type::record('subtenant', $id) SET \
                 tenant_id = $tenant_id, code = $code, name = $name",
            )
            .bind(("id", subtenant.id))
            .bind(("tenant_id", subtenant.tenant_id))
            .bind(("code", subtenant.code.clone()))
            .bind(("name", subtenant.name.clone()))
            .await
            .map_err(DbError::from)?;

        result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(subtenant)
    }
}
