//! Invoice repository

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use core_kernel::{CustomerId, InvoiceId, InvoiceLineId, ProductId, TenantId, TenantScope};
use domain_invoicing::{Invoice, InvoiceLine, InvoiceStatus};

use super::{parse_column, scope_param, signed_column, unsigned_column};
use crate::error::DatabaseError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceRow {
    pub invoice_id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    pub total_tax: Decimal,
    pub total_amount: Decimal,
    pub status: String,
    pub amount_paid: Decimal,
    pub outstanding: Decimal,
    pub is_posted: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceLineRow {
    pub line_id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub line_number: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub gst_rate: Option<Decimal>,
    pub gst_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<InvoiceLineRow> for InvoiceLine {
    type Error = DatabaseError;

    fn try_from(row: InvoiceLineRow) -> Result<Self, Self::Error> {
        Ok(InvoiceLine {
            id: InvoiceLineId::from_uuid(row.line_id),
            invoice_id: InvoiceId::from_uuid(row.invoice_id),
            product_id: ProductId::from_uuid(row.product_id),
            line_number: unsigned_column("line_number", row.line_number)?,
            quantity: unsigned_column("quantity", row.quantity)?,
            unit_price: row.unit_price,
            line_total: row.line_total,
            gst_rate: row.gst_rate,
            gst_amount: row.gst_amount,
            created_at: row.created_at,
        })
    }
}

impl InvoiceRow {
    fn into_invoice(self, lines: Vec<InvoiceLine>) -> Result<Invoice, DatabaseError> {
        Ok(Invoice {
            id: InvoiceId::from_uuid(self.invoice_id),
            tenant_id: TenantId::from_uuid(self.tenant_id),
            customer_id: CustomerId::from_uuid(self.customer_id),
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            subtotal: self.subtotal,
            cgst_amount: self.cgst_amount,
            sgst_amount: self.sgst_amount,
            igst_amount: self.igst_amount,
            total_tax: self.total_tax,
            total_amount: self.total_amount,
            status: parse_column::<InvoiceStatus>("status", &self.status)?,
            amount_paid: self.amount_paid,
            outstanding: self.outstanding,
            is_posted: self.is_posted,
            posted_at: self.posted_at,
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_INVOICE: &str = r#"
    SELECT invoice_id, tenant_id, customer_id, invoice_number, invoice_date, due_date,
           subtotal, cgst_amount, sgst_amount, igst_amount, total_tax, total_amount,
           status, amount_paid, outstanding, is_posted, posted_at, created_at, updated_at
    FROM invoices
"#;

#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the invoice and its lines in one transaction
    pub async fn insert(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_id, tenant_id, customer_id, invoice_number, invoice_date, due_date,
                subtotal, cgst_amount, sgst_amount, igst_amount, total_tax, total_amount,
                status, amount_paid, outstanding, is_posted, posted_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(Uuid::from(invoice.id))
        .bind(Uuid::from(invoice.tenant_id))
        .bind(Uuid::from(invoice.customer_id))
        .bind(&invoice.invoice_number)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(invoice.subtotal)
        .bind(invoice.cgst_amount)
        .bind(invoice.sgst_amount)
        .bind(invoice.igst_amount)
        .bind(invoice.total_tax)
        .bind(invoice.total_amount)
        .bind(invoice.status.as_str())
        .bind(invoice.amount_paid)
        .bind(invoice.outstanding)
        .bind(invoice.is_posted)
        .bind(invoice.posted_at)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await?;

        for line in &invoice.lines {
            sqlx::query(
                r#"
                INSERT INTO invoice_lines (
                    line_id, invoice_id, product_id, line_number, quantity, unit_price,
                    line_total, gst_rate, gst_amount, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(Uuid::from(line.id))
            .bind(Uuid::from(line.invoice_id))
            .bind(Uuid::from(line.product_id))
            .bind(signed_column("line_number", line.line_number)?)
            .bind(signed_column("quantity", line.quantity)?)
            .bind(line.unit_price)
            .bind(line.line_total)
            .bind(line.gst_rate)
            .bind(line.gst_amount)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn get(&self, id: InvoiceId) -> Result<Invoice, DatabaseError> {
        let sql = format!("{} WHERE invoice_id = $1", SELECT_INVOICE);
        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Invoice", id))?;

        let mut lines = self.lines_for(&[row.invoice_id]).await?;
        let lines = lines.remove(&row.invoice_id).unwrap_or_default();
        row.into_invoice(lines)
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<Invoice>, DatabaseError> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR tenant_id = $1) ORDER BY invoice_date DESC, created_at DESC",
            SELECT_INVOICE
        );
        let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.invoice_id).collect();
        let mut lines = self.lines_for(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let invoice_lines = lines.remove(&row.invoice_id).unwrap_or_default();
                row.into_invoice(invoice_lines)
            })
            .collect()
    }

    async fn lines_for(
        &self,
        invoice_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<InvoiceLine>>, DatabaseError> {
        let rows = sqlx::query_as::<_, InvoiceLineRow>(
            r#"
            SELECT line_id, invoice_id, product_id, line_number, quantity, unit_price,
                   line_total, gst_rate, gst_amount, created_at
            FROM invoice_lines
            WHERE invoice_id = ANY($1)
            ORDER BY invoice_id, line_number
            "#,
        )
        .bind(invoice_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<InvoiceLine>> = HashMap::new();
        for row in rows {
            let invoice_id = row.invoice_id;
            grouped.entry(invoice_id).or_default().push(row.try_into()?);
        }
        Ok(grouped)
    }
}
