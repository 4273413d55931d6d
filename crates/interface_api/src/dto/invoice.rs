//! Invoice DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use core_kernel::{CustomerId, ProductId, TenantId};
use domain_invoicing::{InvoiceStatus, NewInvoice, NewInvoiceLine};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    #[validate(length(min = 1, max = 50))]
    pub invoice_number: String,
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
    pub outstanding: Option<Decimal>,
    #[serde(default)]
    #[validate(nested)]
    pub lines: Vec<CreateInvoiceLineRequest>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceLineRequest {
    pub product_id: Option<ProductId>,
    #[validate(range(min = 1))]
    pub line_number: Option<u32>,
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Option<Decimal>,
    pub gst_rate: Option<Decimal>,
    pub gst_amount: Option<Decimal>,
}

impl From<CreateInvoiceLineRequest> for NewInvoiceLine {
    fn from(req: CreateInvoiceLineRequest) -> Self {
        NewInvoiceLine {
            product_id: req.product_id,
            line_number: req.line_number,
            quantity: req.quantity,
            unit_price: req.unit_price,
            line_total: req.line_total,
            gst_rate: req.gst_rate,
            gst_amount: req.gst_amount,
        }
    }
}

impl From<CreateInvoiceRequest> for NewInvoice {
    fn from(req: CreateInvoiceRequest) -> Self {
        NewInvoice {
            tenant_id: req.tenant_id,
            customer_id: req.customer_id,
            invoice_number: req.invoice_number,
            invoice_date: req.invoice_date,
            due_date: req.due_date,
            subtotal: req.subtotal,
            cgst_amount: req.cgst_amount,
            sgst_amount: req.sgst_amount,
            igst_amount: req.igst_amount,
            total_tax: req.total_tax,
            total_amount: req.total_amount,
            status: req.status,
            amount_paid: req.amount_paid,
            outstanding: req.outstanding,
            lines: req.lines.into_iter().map(NewInvoiceLine::from).collect(),
        }
    }
}
