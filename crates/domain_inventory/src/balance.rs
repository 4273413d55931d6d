//! Per-product stock balances

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{InventoryBalanceId, ProductId, TenantId};

use crate::error::InventoryError;
use crate::movement::InventoryMovement;

/// Stock on hand for one product of one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryBalance {
    #[serde(rename = "balanceId")]
    pub id: InventoryBalanceId,
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub current_quantity: i64,
    pub available_quantity: i64,
    pub reserved_quantity: i64,
    pub total_value: Decimal,
    pub average_cost: Decimal,
    pub last_movement_date: Option<DateTime<Utc>>,
    pub next_reorder_date: Option<NaiveDate>,
    pub last_updated: DateTime<Utc>,
}

impl InventoryBalance {
    /// An empty balance for a product seen for the first time
    pub fn opening(tenant_id: TenantId, product_id: ProductId) -> Self {
        Self {
            id: InventoryBalanceId::new_v7(),
            tenant_id,
            product_id,
            current_quantity: 0,
            available_quantity: 0,
            reserved_quantity: 0,
            total_value: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            last_movement_date: None,
            next_reorder_date: None,
            last_updated: Utc::now(),
        }
    }

    /// Applies a movement, refusing to go below zero on hand
    ///
    /// On error the balance is left untouched.
    pub fn apply(&mut self, movement: &InventoryMovement) -> Result<(), InventoryError> {
        if movement.tenant_id != self.tenant_id || movement.product_id != self.product_id {
            return Err(InventoryError::invalid(format!(
                "movement {} does not belong to balance {}",
                movement.id, self.id
            )));
        }

        let next = self.current_quantity + movement.net_quantity();
        if next < 0 {
            return Err(InventoryError::InsufficientStock {
                product_id: self.product_id.to_string(),
                on_hand: self.current_quantity,
                requested: movement.quantity_out,
            });
        }

        self.current_quantity = next;
        self.available_quantity = (next - self.reserved_quantity).max(0);
        self.last_movement_date = Some(
            self.last_movement_date
                .map_or(movement.transaction_date, |d| d.max(movement.transaction_date)),
        );
        self.last_updated = Utc::now();
        Ok(())
    }

    /// True once on-hand stock is at or under the threshold
    pub fn is_at_or_below(&self, threshold: Decimal) -> bool {
        Decimal::from(self.current_quantity) <= threshold
    }
}
