//! Tenant Domain Ports
//!
//! `TenantPort` is implemented by the Postgres adapter in `infra_db` and by
//! [`InMemoryTenantStore`](crate::adapters::InMemoryTenantStore).

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, TenantId};

use crate::gstin::Gstin;
use crate::tenant::Tenant;

#[async_trait]
pub trait TenantPort: DomainPort + HealthCheckable {
    /// Stores a new tenant
    ///
    /// Returns `PortError::Conflict` if the GSTIN is already registered.
    async fn insert_tenant(&self, tenant: &Tenant) -> Result<(), PortError>;

    /// Retrieves a tenant by ID, or `PortError::NotFound`
    async fn get_tenant(&self, id: TenantId) -> Result<Tenant, PortError>;

    /// Looks a tenant up by its GSTIN
    async fn find_by_gstin(&self, gstin: &Gstin) -> Result<Option<Tenant>, PortError>;

    /// Lists all tenants in registration order
    async fn list_tenants(&self) -> Result<Vec<Tenant>, PortError>;

    /// Returns true if the tenant exists
    async fn tenant_exists(&self, id: TenantId) -> Result<bool, PortError> {
        match self.get_tenant(id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
