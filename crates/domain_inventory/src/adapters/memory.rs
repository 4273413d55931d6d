//! In-memory implementation of `InventoryPort`

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, PortError, ProductId, TenantId, TenantScope,
};

use crate::balance::InventoryBalance;
use crate::movement::InventoryMovement;
use crate::ports::InventoryPort;

#[derive(Debug, Default)]
struct Stock {
    balances: BTreeMap<(TenantId, ProductId), InventoryBalance>,
    movements: Vec<InventoryMovement>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryInventoryStore {
    stock: Arc<RwLock<Stock>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryInventoryStore {}

#[async_trait]
impl HealthCheckable for InMemoryInventoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-inventory", 0)
    }
}

#[async_trait]
impl InventoryPort for InMemoryInventoryStore {
    async fn record_movement(
        &self,
        movement: &InventoryMovement,
    ) -> Result<InventoryBalance, PortError> {
        let mut stock = self.stock.write().await;
        let key = (movement.tenant_id, movement.product_id);

        let mut balance = stock
            .balances
            .get(&key)
            .cloned()
            .unwrap_or_else(|| InventoryBalance::opening(movement.tenant_id, movement.product_id));
        balance.apply(movement)?;

        stock.balances.insert(key, balance.clone());
        stock.movements.push(movement.clone());
        Ok(balance)
    }

    async fn get_balance(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<InventoryBalance>, PortError> {
        Ok(self
            .stock
            .read()
            .await
            .balances
            .get(&(tenant_id, product_id))
            .cloned())
    }

    async fn list_balances(&self, scope: TenantScope) -> Result<Vec<InventoryBalance>, PortError> {
        Ok(self
            .stock
            .read()
            .await
            .balances
            .values()
            .filter(|b| scope.matches(b.tenant_id))
            .cloned()
            .collect())
    }

    async fn list_movements(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<InventoryMovement>, PortError> {
        let mut movements: Vec<InventoryMovement> = self
            .stock
            .read()
            .await
            .movements
            .iter()
            .filter(|m| scope.matches(m.tenant_id))
            .cloned()
            .collect();
        movements.sort_by_key(|m| (m.transaction_date, m.created_at));
        Ok(movements)
    }
}
