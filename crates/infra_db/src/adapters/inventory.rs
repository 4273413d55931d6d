//! PostgreSQL adapter for `InventoryPort`

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, PortError, ProductId, TenantId, TenantScope,
};
use domain_inventory::{InventoryBalance, InventoryMovement, InventoryPort};

use crate::repositories::InventoryRepository;

#[derive(Debug, Clone)]
pub struct PostgresInventoryAdapter {
    repository: InventoryRepository,
    pool: PgPool,
}

impl PostgresInventoryAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InventoryRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresInventoryAdapter {}

#[async_trait]
impl HealthCheckable for PostgresInventoryAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-inventory-adapter").await
    }
}

#[async_trait]
impl InventoryPort for PostgresInventoryAdapter {
    #[instrument(skip(self, movement), fields(movement_id = %movement.id, product_id = %movement.product_id))]
    async fn record_movement(
        &self,
        movement: &InventoryMovement,
    ) -> Result<InventoryBalance, PortError> {
        Ok(self.repository.record_movement(movement).await?)
    }

    async fn get_balance(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<InventoryBalance>, PortError> {
        Ok(self.repository.get_balance(tenant_id, product_id).await?)
    }

    async fn list_balances(&self, scope: TenantScope) -> Result<Vec<InventoryBalance>, PortError> {
        Ok(self.repository.list_balances(scope).await?)
    }

    async fn list_movements(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<InventoryMovement>, PortError> {
        Ok(self.repository.list_movements(scope).await?)
    }
}
