//! Invoice records

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use core_kernel::money::ledger_amount;
use core_kernel::{CustomerId, InvoiceId, InvoiceLineId, ProductId, Rate, TenantId};

use crate::error::InvoiceError;

/// Invoice status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Invoice is being drafted
    #[default]
    Draft,
    /// Invoice has been issued
    Issued,
    /// Partial payment received
    PartiallyPaid,
    /// Fully paid
    Paid,
    /// Past due date
    Overdue,
    /// Cancelled/voided
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Issued => "ISSUED",
            InvoiceStatus::PartiallyPaid => "PARTIALLY_PAID",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(InvoiceStatus::Draft),
            "ISSUED" => Ok(InvoiceStatus::Issued),
            "PARTIALLY_PAID" => Ok(InvoiceStatus::PartiallyPaid),
            "PAID" => Ok(InvoiceStatus::Paid),
            "OVERDUE" => Ok(InvoiceStatus::Overdue),
            "CANCELLED" => Ok(InvoiceStatus::Cancelled),
            other => Err(InvoiceError::invalid(format!("unknown invoice status {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    #[serde(rename = "lineId")]
    pub id: InvoiceLineId,
    pub invoice_id: InvoiceId,
    pub product_id: ProductId,
    pub line_number: u32,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub gst_rate: Option<Decimal>,
    pub gst_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "invoiceId")]
    pub id: InvoiceId,
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    pub total_tax: Decimal,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub amount_paid: Decimal,
    pub outstanding: Decimal,
    pub is_posted: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub lines: Vec<InvoiceLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewInvoiceLine {
    pub product_id: Option<ProductId>,
    /// Numbered by position when omitted
    pub line_number: Option<u32>,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Defaults to quantity × unit price
    pub line_total: Option<Decimal>,
    pub gst_rate: Option<Decimal>,
    pub gst_amount: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub invoice_number: String,
    /// Defaults to today in the tenant's timezone
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub cgst_amount: Option<Decimal>,
    pub sgst_amount: Option<Decimal>,
    pub igst_amount: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub total_amount: Decimal,
    pub status: Option<InvoiceStatus>,
    pub amount_paid: Option<Decimal>,
    /// Defaults to total amount minus amount paid
    pub outstanding: Option<Decimal>,
    pub lines: Vec<NewInvoiceLine>,
}

fn amount(field: &str, value: Decimal) -> Result<Decimal, InvoiceError> {
    if value < Decimal::ZERO {
        return Err(InvoiceError::invalid(format!("{} must not be negative", field)));
    }
    ledger_amount(value).map_err(|e| InvoiceError::invalid(format!("{}: {}", field, e)))
}

fn optional_amount(field: &str, value: Option<Decimal>) -> Result<Decimal, InvoiceError> {
    amount(field, value.unwrap_or(Decimal::ZERO))
}

impl Invoice {
    /// Checks the record's shape and builds it
    ///
    /// `today` is the tenant-local date used when no invoice date is given.
    pub fn create(new: NewInvoice, today: NaiveDate) -> Result<Self, InvoiceError> {
        let invoice_number = new.invoice_number.trim().to_string();
        if invoice_number.is_empty() {
            return Err(InvoiceError::invalid("invoiceNumber is required"));
        }

        let invoice_date = new.invoice_date.unwrap_or(today);
        if let Some(due) = new.due_date {
            if due < invoice_date {
                return Err(InvoiceError::invalid(format!(
                    "dueDate {} is before invoiceDate {}",
                    due, invoice_date
                )));
            }
        }

        let total_amount = amount("totalAmount", new.total_amount)?;
        let amount_paid = optional_amount("amountPaid", new.amount_paid)?;
        let outstanding = match new.outstanding {
            Some(value) => amount("outstanding", value)?,
            None => amount("outstanding", total_amount - amount_paid)?,
        };

        let id = InvoiceId::new_v7();
        let now = Utc::now();

        let mut seen = BTreeSet::new();
        let mut lines = Vec::with_capacity(new.lines.len());
        for (index, line) in new.lines.into_iter().enumerate() {
            let line_number = line.line_number.unwrap_or(index as u32 + 1);
            if !seen.insert(line_number) {
                return Err(InvoiceError::invalid(format!("duplicate lineNumber {}", line_number)));
            }
            let product_id = line.product_id.ok_or_else(|| {
                InvoiceError::invalid(format!("line {}: productId is required", line_number))
            })?;
            if line.quantity == 0 {
                return Err(InvoiceError::invalid(format!(
                    "line {}: quantity must be greater than zero",
                    line_number
                )));
            }
            if let Some(rate) = line.gst_rate {
                Rate::from_percentage(rate)?;
            }
            let unit_price = amount("unitPrice", line.unit_price)?;
            let line_total = match line.line_total {
                Some(total) => amount("lineTotal", total)?,
                None => {
                    let total = unit_price
                        .checked_mul(Decimal::from(line.quantity))
                        .ok_or_else(|| {
                            InvoiceError::invalid(format!("line {}: lineTotal overflows", line_number))
                        })?;
                    amount("lineTotal", total)?
                }
            };
            let gst_amount = line.gst_amount.map(|a| amount("gstAmount", a)).transpose()?;

            lines.push(InvoiceLine {
                id: InvoiceLineId::new_v7(),
                invoice_id: id,
                product_id,
                line_number,
                quantity: line.quantity,
                unit_price,
                line_total,
                gst_rate: line.gst_rate,
                gst_amount,
                created_at: now,
            });
        }
        lines.sort_by_key(|l| l.line_number);

        Ok(Self {
            id,
            tenant_id: new.tenant_id,
            customer_id: new.customer_id,
            invoice_number,
            invoice_date,
            due_date: new.due_date,
            subtotal: amount("subtotal", new.subtotal)?,
            cgst_amount: optional_amount("cgstAmount", new.cgst_amount)?,
            sgst_amount: optional_amount("sgstAmount", new.sgst_amount)?,
            igst_amount: optional_amount("igstAmount", new.igst_amount)?,
            total_tax: optional_amount("totalTax", new.total_tax)?,
            total_amount,
            status: new.status.unwrap_or_default(),
            amount_paid,
            outstanding,
            is_posted: false,
            posted_at: None,
            lines,
            created_at: now,
            updated_at: now,
        })
    }

    /// True if unpaid after its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(
            self.status,
            InvoiceStatus::Issued | InvoiceStatus::PartiallyPaid | InvoiceStatus::Overdue
        ) && self.outstanding > Decimal::ZERO
            && self.due_date.map_or(false, |due| today > due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn new_invoice() -> NewInvoice {
        NewInvoice {
            tenant_id: TenantId::new(),
            customer_id: CustomerId::new(),
            invoice_number: "INV-2024-001".to_string(),
            invoice_date: None,
            due_date: Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            subtotal: dec!(1000),
            cgst_amount: Some(dec!(90)),
            sgst_amount: Some(dec!(90)),
            igst_amount: None,
            total_tax: Some(dec!(180)),
            total_amount: dec!(1180),
            status: None,
            amount_paid: Some(dec!(180)),
            outstanding: None,
            lines: vec![NewInvoiceLine {
                product_id: Some(ProductId::new()),
                quantity: 4,
                unit_price: dec!(250),
                gst_rate: Some(dec!(18)),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_defaults() {
        let invoice = Invoice::create(new_invoice(), today()).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.invoice_date, today());
        assert_eq!(invoice.outstanding, dec!(1000.00));
        assert_eq!(invoice.igst_amount, dec!(0));
        assert!(!invoice.is_posted);
        assert_eq!(invoice.lines[0].line_number, 1);
        assert_eq!(invoice.lines[0].line_total, dec!(1000.00));
    }

    #[test]
    fn test_due_before_invoice_date() {
        let mut new = new_invoice();
        new.due_date = Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(matches!(Invoice::create(new, today()), Err(InvoiceError::Validation(_))));
    }

    #[test]
    fn test_negative_total() {
        let mut new = new_invoice();
        new.total_amount = dec!(-1);
        assert!(Invoice::create(new, today()).is_err());
    }

    #[test]
    fn test_duplicate_line_numbers() {
        let mut new = new_invoice();
        let mut second = new.lines[0].clone();
        second.line_number = Some(1);
        new.lines.push(second);
        assert!(matches!(Invoice::create(new, today()), Err(InvoiceError::Validation(_))));
    }

    #[test]
    fn test_zero_quantity() {
        let mut new = new_invoice();
        new.lines[0].quantity = 0;
        assert!(Invoice::create(new, today()).is_err());
    }

    #[test]
    fn test_line_total_past_ledger_range() {
        let mut new = new_invoice();
        new.lines[0].unit_price = dec!(99999999999999999.99);
        new.lines[0].quantity = 4_000_000_000;
        assert!(matches!(Invoice::create(new, today()), Err(InvoiceError::Validation(_))));
    }

    #[test]
    fn test_unit_price_past_ledger_range() {
        let mut new = new_invoice();
        new.lines[0].unit_price = dec!(79228162514264337593543.95);
        new.lines[0].quantity = 4_000_000_000;
        assert!(matches!(Invoice::create(new, today()), Err(InvoiceError::Validation(_))));
    }

    #[test]
    fn test_overdue() {
        let mut new = new_invoice();
        new.status = Some(InvoiceStatus::Issued);
        let invoice = Invoice::create(new, today()).unwrap();
        assert!(!invoice.is_overdue(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
        assert!(invoice.is_overdue(NaiveDate::from_ymd_opt(2024, 7, 2).unwrap()));
    }

    #[test]
    fn test_status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::PartiallyPaid).unwrap(),
            "\"PARTIALLY_PAID\""
        );
    }
}
