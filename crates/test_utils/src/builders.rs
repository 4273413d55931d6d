//! Test Data Builders
//!
//! Builders for registration payloads with sensible defaults, plus
//! [`TestServices`], a fully wired set of services over the in-memory
//! adapters.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{CustomerId, ProductId, TenantId, Timezone};
use domain_inventory::{InMemoryInventoryStore, InventoryService};
use domain_invoicing::{InMemoryInvoiceStore, InvoiceService, InvoiceStatus, NewInvoice, NewInvoiceLine};
use domain_ledger::{
    Account, AccountRegistry, AccountType, InMemoryLedgerStore, JournalBuilder, JournalEntry,
    LedgerQueries, NewAccount, PostingEngine,
};
use domain_tenant::{BusinessType, InMemoryTenantStore, NewTenant, Tenant, TenantService};

use crate::fixtures::{AccountCodeFixtures, GstinFixtures, IdFixtures};

/// Builder for tenant registration payloads
pub struct TestTenantBuilder {
    new: NewTenant,
}

impl Default for TestTenantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTenantBuilder {
    pub fn new() -> Self {
        Self {
            new: NewTenant {
                business_name: "Acme Traders Pvt Ltd".to_string(),
                business_type: Some(BusinessType::Retailer),
                gstin: GstinFixtures::primary().to_string(),
                ..Default::default()
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.new.business_name = name.into();
        self
    }

    pub fn with_gstin(mut self, gstin: impl Into<String>) -> Self {
        self.new.gstin = gstin.into();
        self
    }

    pub fn with_business_type(mut self, business_type: BusinessType) -> Self {
        self.new.business_type = Some(business_type);
        self
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.new.timezone = Some(timezone);
        self
    }

    pub fn with_fiscal_year_start(mut self, start: NaiveDate) -> Self {
        self.new.fiscal_year_start = Some(start);
        self
    }

    pub fn with_reorder_threshold(mut self, threshold: Decimal) -> Self {
        self.new.reorder_threshold = Some(threshold);
        self
    }

    pub fn build(self) -> NewTenant {
        self.new
    }
}

/// Builder for invoices with one line and consistent totals
pub struct TestInvoiceBuilder {
    tenant_id: TenantId,
    customer_id: CustomerId,
    invoice_number: String,
    invoice_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    status: Option<InvoiceStatus>,
    lines: Vec<NewInvoiceLine>,
    amount_paid: Option<Decimal>,
}

impl TestInvoiceBuilder {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            customer_id: IdFixtures::customer(),
            invoice_number: "INV-2024-0001".to_string(),
            invoice_date: None,
            due_date: None,
            status: None,
            lines: Vec::new(),
            amount_paid: None,
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = number.into();
        self
    }

    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.invoice_date = Some(date);
        self
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payment(mut self, amount: Decimal) -> Self {
        self.amount_paid = Some(amount);
        self
    }

    /// Adds a line at 18% GST
    pub fn with_line(mut self, product_id: ProductId, quantity: u32, unit_price: Decimal) -> Self {
        self.lines.push(NewInvoiceLine {
            product_id: Some(product_id),
            quantity,
            unit_price,
            gst_rate: Some(dec!(18)),
            ..Default::default()
        });
        self
    }

    /// Totals are derived from the lines so the record is self-consistent
    pub fn build(mut self) -> NewInvoice {
        if self.lines.is_empty() {
            self = self.with_line(IdFixtures::product(), 2, dec!(500));
        }
        let subtotal: Decimal = self
            .lines
            .iter()
            .map(|l| l.unit_price * Decimal::from(l.quantity))
            .sum();
        let half_tax = (subtotal * dec!(0.09)).round_dp(2);

        NewInvoice {
            tenant_id: self.tenant_id,
            customer_id: self.customer_id,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            subtotal,
            cgst_amount: Some(half_tax),
            sgst_amount: Some(half_tax),
            igst_amount: None,
            total_tax: Some(half_tax * dec!(2)),
            total_amount: subtotal + half_tax * dec!(2),
            status: self.status,
            amount_paid: self.amount_paid,
            outstanding: None,
            lines: self.lines,
        }
    }
}

/// Every service wired over fresh in-memory stores
#[derive(Clone)]
pub struct TestServices {
    pub tenant_store: Arc<InMemoryTenantStore>,
    pub ledger_store: Arc<InMemoryLedgerStore>,
    pub tenants: TenantService,
    pub registry: AccountRegistry,
    pub engine: PostingEngine,
    pub queries: LedgerQueries,
    pub invoices: InvoiceService,
    pub inventory: InventoryService,
}

impl Default for TestServices {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServices {
    pub fn new() -> Self {
        let tenant_store = Arc::new(InMemoryTenantStore::new());
        let ledger_store = Arc::new(InMemoryLedgerStore::new());
        let registry = AccountRegistry::new(ledger_store.clone(), tenant_store.clone());

        Self {
            tenants: TenantService::new(tenant_store.clone()),
            engine: PostingEngine::new(ledger_store.clone(), registry.clone()),
            queries: LedgerQueries::new(ledger_store.clone(), registry.clone()),
            invoices: InvoiceService::new(
                Arc::new(InMemoryInvoiceStore::new()),
                tenant_store.clone(),
            ),
            inventory: InventoryService::new(
                Arc::new(InMemoryInventoryStore::new()),
                tenant_store.clone(),
            ),
            registry,
            tenant_store,
            ledger_store,
        }
    }

    pub async fn tenant(&self, gstin: &str) -> Tenant {
        self.tenants
            .register(
                TestTenantBuilder::new()
                    .with_name(format!("Tenant {}", gstin))
                    .with_gstin(gstin)
                    .build(),
            )
            .await
            .expect("tenant registration")
    }

    /// A tenant with cash, bank, sales and rent accounts
    pub async fn books(&self, gstin: &str) -> TestBooks {
        let tenant = self.tenant(gstin).await;
        let cash = self.account(&tenant, AccountCodeFixtures::cash(), "Cash", AccountType::Asset).await;
        let bank = self.account(&tenant, AccountCodeFixtures::bank(), "Bank", AccountType::Asset).await;
        let sales = self
            .account(&tenant, AccountCodeFixtures::sales(), "Sales", AccountType::Revenue)
            .await;
        let rent = self
            .account(&tenant, AccountCodeFixtures::rent(), "Rent", AccountType::Expense)
            .await;

        TestBooks {
            tenant,
            cash,
            bank,
            sales,
            rent,
        }
    }

    pub async fn account(
        &self,
        tenant: &Tenant,
        code: &str,
        name: &str,
        account_type: AccountType,
    ) -> Account {
        self.registry
            .register(NewAccount::new(tenant.id, code, name, account_type))
            .await
            .expect("account registration")
    }

    /// Creates, validates and posts the entry described by `builder`
    pub async fn post(&self, builder: JournalBuilder) -> JournalEntry {
        let tenant_id = builder.tenant_id();
        let draft = self.engine.create_entry(builder).await.expect("draft");
        self.engine.validate(tenant_id, draft.id).await.expect("validate");
        self.engine
            .post(tenant_id, draft.id, None)
            .await
            .expect("post")
            .into_entry()
    }

    /// Creates, validates and posts a two-line entry
    pub async fn post_transfer(
        &self,
        books: &TestBooks,
        number: &str,
        debit: &Account,
        credit: &Account,
        amount: Decimal,
    ) -> JournalEntry {
        self.post(books.entry(number).debit(debit.id, amount).credit(credit.id, amount))
            .await
    }
}

/// A tenant and its basic chart
#[derive(Debug, Clone)]
pub struct TestBooks {
    pub tenant: Tenant,
    pub cash: Account,
    pub bank: Account,
    pub sales: Account,
    pub rent: Account,
}

impl TestBooks {
    pub fn entry(&self, number: &str) -> JournalBuilder {
        JournalBuilder::new(self.tenant.id, number, format!("Test entry {}", number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_builder_totals() {
        let invoice = TestInvoiceBuilder::new(TenantId::new()).build();
        assert_eq!(invoice.subtotal, dec!(1000));
        assert_eq!(invoice.total_tax, Some(dec!(180.00)));
        assert_eq!(invoice.total_amount, dec!(1180.00));
    }

    #[tokio::test]
    async fn test_posted_transfer() {
        let services = TestServices::new();
        let books = services.books(GstinFixtures::primary()).await;
        let entry = services
            .post_transfer(&books, "JE-1", &books.cash, &books.sales, dec!(100))
            .await;
        assert_eq!(entry.status, domain_ledger::JournalStatus::Posted);
    }
}
