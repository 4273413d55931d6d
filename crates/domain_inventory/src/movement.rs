//! Stock movements

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::money::ledger_amount;
use core_kernel::{InventoryMovementId, ProductId, TenantId};

use crate::error::InventoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Purchase,
    Sale,
    Adjustment,
    Return,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "PURCHASE",
            TransactionType::Sale => "SALE",
            TransactionType::Adjustment => "ADJUSTMENT",
            TransactionType::Return => "RETURN",
            TransactionType::Transfer => "TRANSFER",
        }
    }

    /// Purchases and returns bring stock in
    pub fn is_inbound_only(&self) -> bool {
        matches!(self, TransactionType::Purchase | TransactionType::Return)
    }

    pub fn is_outbound_only(&self) -> bool {
        matches!(self, TransactionType::Sale)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PURCHASE" => Ok(TransactionType::Purchase),
            "SALE" => Ok(TransactionType::Sale),
            "ADJUSTMENT" => Ok(TransactionType::Adjustment),
            "RETURN" => Ok(TransactionType::Return),
            "TRANSFER" => Ok(TransactionType::Transfer),
            other => Err(InventoryError::invalid(format!("unknown transaction type {}", other))),
        }
    }
}

/// One entry in the inventory ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    #[serde(rename = "ledgerId")]
    pub id: InventoryMovementId,
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: TransactionType,
    pub quantity_in: u32,
    pub quantity_out: u32,
    pub unit_cost: Option<Decimal>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMovement {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub transaction_type: TransactionType,
    /// Defaults to now
    pub transaction_date: Option<DateTime<Utc>>,
    pub quantity_in: u32,
    pub quantity_out: u32,
    pub unit_cost: Option<Decimal>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
}

impl NewMovement {
    pub fn inbound(
        tenant_id: TenantId,
        product_id: ProductId,
        transaction_type: TransactionType,
        quantity: u32,
    ) -> Self {
        Self {
            tenant_id,
            product_id,
            transaction_type,
            transaction_date: None,
            quantity_in: quantity,
            quantity_out: 0,
            unit_cost: None,
            batch_number: None,
            expiry_date: None,
            reference_id: None,
            reference_type: None,
        }
    }

    pub fn outbound(
        tenant_id: TenantId,
        product_id: ProductId,
        transaction_type: TransactionType,
        quantity: u32,
    ) -> Self {
        Self {
            quantity_in: 0,
            quantity_out: quantity,
            ..Self::inbound(tenant_id, product_id, transaction_type, 0)
        }
    }

    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn with_reference(mut self, reference_type: &str, reference_id: &str) -> Self {
        self.reference_type = Some(reference_type.to_string());
        self.reference_id = Some(reference_id.to_string());
        self
    }
}

impl InventoryMovement {
    /// Checks direction against the transaction type and builds the record
    pub fn create(new: NewMovement) -> Result<Self, InventoryError> {
        match (new.quantity_in, new.quantity_out) {
            (0, 0) => return Err(InventoryError::invalid("quantityIn or quantityOut must be positive")),
            (i, o) if i > 0 && o > 0 => {
                return Err(InventoryError::invalid(
                    "a movement cannot carry both quantityIn and quantityOut",
                ))
            }
            _ => {}
        }
        if new.transaction_type.is_inbound_only() && new.quantity_out > 0 {
            return Err(InventoryError::invalid(format!(
                "{} movements only bring stock in",
                new.transaction_type
            )));
        }
        if new.transaction_type.is_outbound_only() && new.quantity_in > 0 {
            return Err(InventoryError::invalid(format!(
                "{} movements only take stock out",
                new.transaction_type
            )));
        }

        let unit_cost = match new.unit_cost {
            Some(cost) if cost < Decimal::ZERO => {
                return Err(InventoryError::invalid("unitCost must not be negative"))
            }
            Some(cost) => Some(ledger_amount(cost)?),
            None => None,
        };

        let now = Utc::now();
        Ok(Self {
            id: InventoryMovementId::new_v7(),
            tenant_id: new.tenant_id,
            product_id: new.product_id,
            transaction_date: new.transaction_date.unwrap_or(now),
            transaction_type: new.transaction_type,
            quantity_in: new.quantity_in,
            quantity_out: new.quantity_out,
            unit_cost,
            batch_number: new.batch_number,
            expiry_date: new.expiry_date,
            reference_id: new.reference_id,
            reference_type: new.reference_type,
            created_at: now,
        })
    }

    /// Signed change to on-hand quantity
    pub fn net_quantity(&self) -> i64 {
        i64::from(self.quantity_in) - i64::from(self.quantity_out)
    }
}
