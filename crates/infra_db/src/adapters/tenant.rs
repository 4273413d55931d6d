//! PostgreSQL adapter for `TenantPort`

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, TenantId};
use domain_tenant::{Gstin, Tenant, TenantPort};

use crate::repositories::TenantRepository;

#[derive(Debug, Clone)]
pub struct PostgresTenantAdapter {
    repository: TenantRepository,
    pool: PgPool,
}

impl PostgresTenantAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TenantRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &TenantRepository {
        &self.repository
    }
}

impl DomainPort for PostgresTenantAdapter {}

#[async_trait]
impl HealthCheckable for PostgresTenantAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-tenant-adapter").await
    }
}

#[async_trait]
impl TenantPort for PostgresTenantAdapter {
    #[instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
    async fn insert_tenant(&self, tenant: &Tenant) -> Result<(), PortError> {
        Ok(self.repository.insert(tenant).await?)
    }

    #[instrument(skip(self))]
    async fn get_tenant(&self, id: TenantId) -> Result<Tenant, PortError> {
        Ok(self.repository.get(id).await?)
    }

    async fn find_by_gstin(&self, gstin: &Gstin) -> Result<Option<Tenant>, PortError> {
        Ok(self.repository.find_by_gstin(gstin).await?)
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>, PortError> {
        Ok(self.repository.list().await?)
    }
}
