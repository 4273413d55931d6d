//! Inventory DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ProductId, TenantId};
use domain_inventory::{InventoryBalance, InventoryMovement, NewMovement, TransactionType};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordMovementRequest {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub transaction_type: TransactionType,
    pub transaction_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quantity_in: u32,
    #[serde(default)]
    pub quantity_out: u32,
    pub unit_cost: Option<Decimal>,
    #[validate(length(max = 50))]
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub reference_id: Option<String>,
    #[validate(length(max = 50))]
    pub reference_type: Option<String>,
}

impl From<RecordMovementRequest> for NewMovement {
    fn from(req: RecordMovementRequest) -> Self {
        NewMovement {
            tenant_id: req.tenant_id,
            product_id: req.product_id,
            transaction_type: req.transaction_type,
            transaction_date: req.transaction_date,
            quantity_in: req.quantity_in,
            quantity_out: req.quantity_out,
            unit_cost: req.unit_cost,
            batch_number: req.batch_number,
            expiry_date: req.expiry_date,
            reference_id: req.reference_id,
            reference_type: req.reference_type,
        }
    }
}

/// A recorded movement and the balance it produced
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRecordedResponse {
    pub movement: InventoryMovement,
    pub balance: InventoryBalance,
}
