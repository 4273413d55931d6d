//! Invoice service tests over the in-memory stores

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{CustomerId, InvoiceId, ProductId, TenantId, TenantScope};
use domain_invoicing::{
    InMemoryInvoiceStore, InvoiceError, InvoiceService, InvoiceStatus, NewInvoice, NewInvoiceLine,
};
use domain_tenant::{BusinessType, InMemoryTenantStore, NewTenant, TenantService};

async fn setup() -> (InvoiceService, TenantId, TenantId) {
    let tenants = Arc::new(InMemoryTenantStore::new());
    let tenant_service = TenantService::new(tenants.clone());
    let mut ids = Vec::new();
    for (name, gstin) in [("Acme Industries", "27AAPCS1234H1Z0"), ("Globex", "27AAPCS5678H1Z0")] {
        let tenant = tenant_service
            .register(NewTenant {
                business_name: name.to_string(),
                business_type: Some(BusinessType::Retailer),
                gstin: gstin.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        ids.push(tenant.id);
    }
    let service = InvoiceService::new(Arc::new(InMemoryInvoiceStore::new()), tenants);
    (service, ids[0], ids[1])
}

fn invoice_for(tenant_id: TenantId, number: &str, date: NaiveDate) -> NewInvoice {
    NewInvoice {
        tenant_id,
        customer_id: CustomerId::new(),
        invoice_number: number.to_string(),
        invoice_date: Some(date),
        due_date: None,
        subtotal: dec!(500),
        cgst_amount: Some(dec!(45)),
        sgst_amount: Some(dec!(45)),
        igst_amount: None,
        total_tax: Some(dec!(90)),
        total_amount: dec!(590),
        status: Some(InvoiceStatus::Issued),
        amount_paid: None,
        outstanding: None,
        lines: vec![
            NewInvoiceLine {
                product_id: Some(ProductId::new()),
                quantity: 2,
                unit_price: dec!(150),
                gst_rate: Some(dec!(18)),
                ..Default::default()
            },
            NewInvoiceLine {
                product_id: Some(ProductId::new()),
                quantity: 1,
                unit_price: dec!(200),
                gst_rate: Some(dec!(18)),
                ..Default::default()
            },
        ],
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let (service, tenant, _) = setup().await;
        let invoice = service
            .create(invoice_for(tenant, "INV-001", date(2024, 5, 10)))
            .await
            .unwrap();

        let fetched = service.get(invoice.id).await.unwrap();
        assert_eq!(fetched, invoice);
        assert_eq!(fetched.lines.len(), 2);
        assert_eq!(fetched.lines[1].line_number, 2);
        assert_eq!(fetched.outstanding, dec!(590.00));
    }

    #[tokio::test]
    async fn test_unknown_tenant() {
        let (service, _, _) = setup().await;
        let result = service
            .create(invoice_for(TenantId::new(), "INV-001", date(2024, 5, 10)))
            .await;
        assert!(matches!(result, Err(InvoiceError::TenantNotFound(_))));
    }

    #[tokio::test]
    async fn test_invoice_numbers_may_repeat() {
        let (service, tenant, _) = setup().await;
        service.create(invoice_for(tenant, "INV-001", date(2024, 5, 10))).await.unwrap();
        service.create(invoice_for(tenant, "INV-001", date(2024, 5, 11))).await.unwrap();
        assert_eq!(service.list(TenantScope::Tenant(tenant)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing_invoice() {
        let (service, _, _) = setup().await;
        let result = service.get(InvoiceId::new()).await;
        assert!(matches!(result, Err(InvoiceError::NotFound(_))));
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_scope_filters_and_orders() {
        let (service, acme, globex) = setup().await;
        service.create(invoice_for(acme, "A-1", date(2024, 4, 1))).await.unwrap();
        service.create(invoice_for(acme, "A-2", date(2024, 6, 1))).await.unwrap();
        service.create(invoice_for(globex, "G-1", date(2024, 5, 1))).await.unwrap();

        let acme_invoices = service.list(TenantScope::Tenant(acme)).await.unwrap();
        let numbers: Vec<_> = acme_invoices.iter().map(|i| i.invoice_number.as_str()).collect();
        assert_eq!(numbers, vec!["A-2", "A-1"]);

        assert_eq!(service.list(TenantScope::All).await.unwrap().len(), 3);
    }
}

mod built {
    use super::*;
    use proptest::prelude::*;
    use test_utils::{
        assert_amount_eq, fiscal_date_strategy, DateFixtures, GstinFixtures, IdFixtures,
        TestInvoiceBuilder, TestServices,
    };

    #[tokio::test]
    async fn test_partially_paid_invoice() {
        let services = TestServices::new();
        let tenant = services.tenant(GstinFixtures::primary()).await;
        let invoice = services
            .invoices
            .create(
                TestInvoiceBuilder::new(tenant.id)
                    .with_number("INV-2024-0042")
                    .dated(DateFixtures::mid_year())
                    .due(DateFixtures::fiscal_year_end())
                    .with_status(InvoiceStatus::Issued)
                    .with_payment(dec!(180))
                    .with_line(IdFixtures::product(), 4, dec!(250))
                    .build(),
            )
            .await
            .unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Issued);
        assert_eq!(invoice.due_date, Some(DateFixtures::fiscal_year_end()));
        assert_amount_eq(invoice.total_amount, dec!(1180));
        assert_amount_eq(invoice.outstanding, dec!(1000));
        assert_amount_eq(invoice.lines[0].line_total, dec!(1000));
    }

    #[tokio::test]
    async fn test_line_total_past_ledger_range_rejected() {
        let services = TestServices::new();
        let tenant = services.tenant(GstinFixtures::primary()).await;
        let mut new = TestInvoiceBuilder::new(tenant.id)
            .with_line(IdFixtures::product(), 4_000_000_000, dec!(99999999999999999.99))
            .build();
        new.total_amount = dec!(1000);

        let result = services.invoices.create(new).await;
        assert!(matches!(result, Err(InvoiceError::Validation(_))));
        assert!(services.invoices.list(TenantScope::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unit_price_past_ledger_range_rejected() {
        let services = TestServices::new();
        let tenant = services.tenant(GstinFixtures::primary()).await;
        let mut new = TestInvoiceBuilder::new(tenant.id).build();
        new.lines[0].unit_price = dec!(79228162514264337593543.95);
        new.lines[0].quantity = 4_000_000_000;

        let result = services.invoices.create(new).await;
        assert!(matches!(result, Err(InvoiceError::Validation(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn invoices_keep_their_fiscal_date(date in fiscal_date_strategy()) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let invoice = runtime.block_on(async {
                let services = TestServices::new();
                let tenant = services.tenant(GstinFixtures::primary()).await;
                services
                    .invoices
                    .create(
                        TestInvoiceBuilder::new(tenant.id)
                            .dated(date)
                            .due(DateFixtures::fiscal_year_end())
                            .build(),
                    )
                    .await
            });
            let invoice = invoice.map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(invoice.invoice_date, date);
            prop_assert!(invoice.due_date >= Some(invoice.invoice_date));
        }
    }
}
