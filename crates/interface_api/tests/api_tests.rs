//! Black-box API tests over in-memory storage

use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use interface_api::config::AppConfig;
use interface_api::{create_router, AppState};
use test_utils::{GstinFixtures, IdFixtures};

fn server() -> TestServer {
    let state = AppState::in_memory(AppConfig::in_memory());
    TestServer::new(create_router(state)).expect("test server")
}

fn amount(value: &Value) -> Decimal {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("not a decimal string: {}", value))
}

fn id(value: &Value, field: &str) -> String {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing {} in {}", field, value))
        .to_string()
}

async fn create_tenant(server: &TestServer, gstin: &str) -> String {
    let response = server
        .post("/api/v1/tenants")
        .json(&json!({
            "businessName": format!("Tenant {}", gstin),
            "businessType": "RETAILER",
            "gstin": gstin,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    id(&response.json::<Value>(), "tenantId")
}

async fn create_account(server: &TestServer, tenant: &str, code: &str, account_type: &str) -> String {
    let response = server
        .post("/api/v1/chart-of-accounts")
        .json(&json!({
            "tenantId": tenant,
            "accountCode": code,
            "accountName": format!("Account {}", code),
            "accountType": account_type,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    id(&response.json::<Value>(), "accountId")
}

async fn create_entry(
    server: &TestServer,
    tenant: &str,
    number: &str,
    debit: (&str, &str),
    credit: (&str, &str),
) -> String {
    let response = server
        .post("/api/v1/journal-entries")
        .json(&json!({
            "tenantId": tenant,
            "entryNumber": number,
            "entryDate": "2024-09-15",
            "description": format!("Entry {}", number),
            "lines": [
                { "accountId": debit.0, "postingType": "DEBIT", "amount": debit.1 },
                { "accountId": credit.0, "postingType": "CREDIT", "amount": credit.1 },
            ],
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    id(&response.json::<Value>(), "journalId")
}

struct Books {
    tenant: String,
    cash: String,
    revenue: String,
}

async fn books(server: &TestServer) -> Books {
    let tenant = create_tenant(server, GstinFixtures::primary()).await;
    let cash = create_account(server, &tenant, "1000", "ASSET").await;
    let revenue = create_account(server, &tenant, "4000", "REVENUE").await;
    Books { tenant, cash, revenue }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_is_up() {
        let response = server().get("/api/v1/health").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "UP");
        assert_eq!(body["service"], "Accounting Service");
    }

    #[tokio::test]
    async fn test_ready_with_memory_storage() {
        let response = server().get("/api/v1/health/ready").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["adapters"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let response = server().get("/api/v1/health").await;
        assert!(response.headers().contains_key("x-request-id"));
    }
}

mod tenants {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let server = server();
        let tenant = create_tenant(&server, GstinFixtures::primary()).await;

        let response = server.get(&format!("/api/v1/tenants/{}", tenant)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["gstin"], GstinFixtures::primary());
        assert_eq!(body["currency"], "INR");
        assert_eq!(body["timezone"], "Asia/Kolkata");

        let list = server.get("/api/v1/tenants").await.json::<Value>();
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_duplicate_gstin_conflicts() {
        let server = server();
        create_tenant(&server, GstinFixtures::primary()).await;

        let response = server
            .post("/api/v1/tenants")
            .json(&json!({
                "businessName": "Copycat",
                "businessType": "RETAILER",
                "gstin": GstinFixtures::primary(),
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["error"], "conflict");
    }

    #[tokio::test]
    async fn test_malformed_gstin_is_unprocessable() {
        let response = server()
            .post("/api/v1/tenants")
            .json(&json!({
                "businessName": "Acme",
                "businessType": "RETAILER",
                "gstin": GstinFixtures::malformed(),
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<Value>()["details"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = server()
            .post("/api/v1/tenants")
            .text("{\"businessName\": ")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_not_found() {
        let response = server()
            .get(&format!("/api/v1/tenants/{}", IdFixtures::unknown_tenant().as_uuid()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_uuid_id_is_bad_request() {
        let response = server().get("/api/v1/tenants/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

mod accounts {
    use super::*;

    #[tokio::test]
    async fn test_tenant_filter() {
        let server = server();
        let first = books(&server).await;
        let second = create_tenant(&server, GstinFixtures::secondary()).await;
        create_account(&server, &second, "1000", "ASSET").await;

        let all = server.get("/api/v1/chart-of-accounts").await.json::<Value>();
        assert_eq!(all.as_array().map(Vec::len), Some(3));

        let filtered = server
            .get("/api/v1/chart-of-accounts")
            .add_query_param("tenantId", &first.tenant)
            .await
            .json::<Value>();
        let rows = filtered.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|a| a["tenantId"] == first.tenant.as_str()));
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let server = server();
        let books = books(&server).await;

        let response = server
            .post("/api/v1/chart-of-accounts")
            .json(&json!({
                "tenantId": books.tenant,
                "accountCode": "1000",
                "accountName": "Petty cash",
                "accountType": "ASSET",
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_not_found() {
        let response = server()
            .post("/api/v1/chart-of-accounts")
            .json(&json!({
                "tenantId": IdFixtures::unknown_tenant().as_uuid(),
                "accountCode": "1000",
                "accountName": "Cash",
                "accountType": "ASSET",
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let server = server();
        books(&server).await;

        let response = server
            .get(&format!("/api/v1/chart-of-accounts/{}", core_kernel::AccountId::new().as_uuid()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod journal_workflow {
    use super::*;

    #[tokio::test]
    async fn test_draft_validate_post() {
        let server = server();
        let books = books(&server).await;
        let entry = create_entry(
            &server,
            &books.tenant,
            "JV-0001",
            (&books.cash, "100.00"),
            (&books.revenue, "100.00"),
        )
        .await;

        let draft = server
            .get(&format!("/api/v1/journal-entries/{}", entry))
            .await
            .json::<Value>();
        assert_eq!(draft["status"], "DRAFT");
        assert_eq!(amount(&draft["totalDebit"]), dec!(100));

        let validated = server
            .post(&format!("/api/v1/journal-entries/{}/validate", entry))
            .await;
        validated.assert_status_ok();
        assert_eq!(validated.json::<Value>()["status"], "VALIDATED");
        assert_eq!(validated.json::<Value>()["isBalanced"], true);

        let posted = server.post(&format!("/api/v1/journal-entries/{}/post", entry)).await;
        posted.assert_status_ok();
        assert_eq!(posted.json::<Value>()["status"], "POSTED");

        let postings = server
            .get(&format!("/api/v1/journal-entries/{}/postings", entry))
            .await
            .json::<Value>();
        assert_eq!(postings.as_array().map(Vec::len), Some(2));

        let ledger = server
            .get("/api/v1/general-ledger")
            .add_query_param("tenantId", &books.tenant)
            .await
            .json::<Value>();
        let rows = ledger.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 2);

        let row = server
            .get(&format!("/api/v1/general-ledger/{}", id(&rows[0], "glId")))
            .await;
        row.assert_status_ok();

        let balance = server
            .get(&format!("/api/v1/chart-of-accounts/{}/balance", books.cash))
            .await
            .json::<Value>();
        assert_eq!(amount(&balance["balance"]), dec!(100));
    }

    #[tokio::test]
    async fn test_repost_is_idempotent() {
        let server = server();
        let books = books(&server).await;
        let entry = create_entry(
            &server,
            &books.tenant,
            "JV-0002",
            (&books.cash, "250.00"),
            (&books.revenue, "250.00"),
        )
        .await;
        server.post(&format!("/api/v1/journal-entries/{}/validate", entry)).await;
        server.post(&format!("/api/v1/journal-entries/{}/post", entry)).await;

        let again = server.post(&format!("/api/v1/journal-entries/{}/post", entry)).await;
        again.assert_status_ok();
        assert_eq!(again.json::<Value>()["status"], "POSTED");

        let postings = server
            .get(&format!("/api/v1/journal-entries/{}/postings", entry))
            .await
            .json::<Value>();
        assert_eq!(postings.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_repost_with_different_lines_conflicts() {
        let server = server();
        let books = books(&server).await;
        let entry = create_entry(
            &server,
            &books.tenant,
            "JV-0003",
            (&books.cash, "10.00"),
            (&books.revenue, "10.00"),
        )
        .await;
        server.post(&format!("/api/v1/journal-entries/{}/validate", entry)).await;
        server.post(&format!("/api/v1/journal-entries/{}/post", entry)).await;

        let response = server
            .post(&format!("/api/v1/journal-entries/{}/post", entry))
            .json(&json!({
                "postingSet": [
                    { "accountId": books.cash, "postingType": "DEBIT", "amount": "20.00" },
                    { "accountId": books.revenue, "postingType": "CREDIT", "amount": "20.00" },
                ]
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unbalanced_entry_is_unprocessable_and_stays_draft() {
        let server = server();
        let books = books(&server).await;
        let entry = create_entry(
            &server,
            &books.tenant,
            "JV-0004",
            (&books.cash, "100.00"),
            (&books.revenue, "90.00"),
        )
        .await;

        let response = server
            .post(&format!("/api/v1/journal-entries/{}/validate", entry))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let details = response.json::<Value>()["details"].clone();
        assert_eq!(details[0], "difference: 10.00");

        let current = server
            .get(&format!("/api/v1/journal-entries/{}", entry))
            .await
            .json::<Value>();
        assert_eq!(current["status"], "DRAFT");
    }

    #[tokio::test]
    async fn test_posting_a_draft_conflicts() {
        let server = server();
        let books = books(&server).await;
        let entry = create_entry(
            &server,
            &books.tenant,
            "JV-0005",
            (&books.cash, "5.00"),
            (&books.revenue, "5.00"),
        )
        .await;

        let response = server.post(&format!("/api/v1/journal-entries/{}/post", entry)).await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reject_needs_reason_and_is_terminal() {
        let server = server();
        let books = books(&server).await;
        let entry = create_entry(
            &server,
            &books.tenant,
            "JV-0006",
            (&books.cash, "5.00"),
            (&books.revenue, "5.00"),
        )
        .await;

        let blank = server
            .post(&format!("/api/v1/journal-entries/{}/reject", entry))
            .json(&json!({ "reason": "" }))
            .await;
        blank.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let rejected = server
            .post(&format!("/api/v1/journal-entries/{}/reject", entry))
            .json(&json!({ "reason": "duplicate voucher" }))
            .await;
        rejected.assert_status_ok();
        assert_eq!(rejected.json::<Value>()["status"], "REJECTED");
        assert_eq!(rejected.json::<Value>()["rejectionReason"], "duplicate voucher");

        let validate = server
            .post(&format!("/api/v1/journal-entries/{}/validate", entry))
            .await;
        validate.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_sub_paisa_amount_is_unprocessable() {
        let server = server();
        let books = books(&server).await;

        let response = server
            .post("/api/v1/journal-entries")
            .json(&json!({
                "tenantId": books.tenant,
                "entryNumber": "JV-0007",
                "description": "Too precise",
                "lines": [
                    { "accountId": books.cash, "postingType": "DEBIT", "amount": "10.005" },
                    { "accountId": books.revenue, "postingType": "CREDIT", "amount": "10.005" },
                ],
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_client_status_is_ignored() {
        let server = server();
        let books = books(&server).await;

        let response = server
            .post("/api/v1/journal-entries")
            .json(&json!({
                "tenantId": books.tenant,
                "entryNumber": "JV-0008",
                "description": "Sneaky",
                "status": "POSTED",
                "isBalanced": true,
                "totalDebit": "999.00",
                "lines": [
                    { "accountId": books.cash, "postingType": "DEBIT", "amount": "1.00" },
                    { "accountId": books.revenue, "postingType": "CREDIT", "amount": "1.00" },
                ],
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "DRAFT");
        assert_eq!(amount(&body["totalDebit"]), dec!(1));
    }

    #[tokio::test]
    async fn test_unknown_entry_is_not_found() {
        let response = server()
            .post(&format!(
                "/api/v1/journal-entries/{}/validate",
                core_kernel::JournalEntryId::new().as_uuid()
            ))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_unknown_entry_is_not_found() {
        let server = server();
        let books = books(&server).await;
        create_entry(&server, &books.tenant, "JV-0009", (&books.cash, "5.00"), (&books.revenue, "5.00"))
            .await;

        let response = server
            .get(&format!("/api/v1/journal-entries/{}", core_kernel::JournalEntryId::new().as_uuid()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_ledger_row_is_not_found() {
        let server = server();
        let books = books(&server).await;
        let entry = create_entry(
            &server,
            &books.tenant,
            "JV-0010",
            (&books.cash, "5.00"),
            (&books.revenue, "5.00"),
        )
        .await;
        server.post(&format!("/api/v1/journal-entries/{}/validate", entry)).await;
        server.post(&format!("/api/v1/journal-entries/{}/post", entry)).await.assert_status_ok();

        let response = server
            .get(&format!("/api/v1/general-ledger/{}", core_kernel::LedgerEntryId::new().as_uuid()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod reports {
    use super::*;

    #[tokio::test]
    async fn test_trial_balance_and_reconciliation() {
        let server = server();
        let books = books(&server).await;
        for (number, value) in [("JV-0101", "100.00"), ("JV-0102", "45.50")] {
            let entry = create_entry(
                &server,
                &books.tenant,
                number,
                (&books.cash, value),
                (&books.revenue, value),
            )
            .await;
            server.post(&format!("/api/v1/journal-entries/{}/validate", entry)).await;
            server.post(&format!("/api/v1/journal-entries/{}/post", entry)).await;
        }

        let response = server
            .get("/api/v1/reports/trial-balance")
            .add_query_param("tenantId", &books.tenant)
            .add_query_param("asOf", "2024-12-31")
            .await;
        response.assert_status_ok();
        let trial = response.json::<Value>();
        assert_eq!(trial["isBalanced"], true);
        assert_eq!(amount(&trial["totalDebit"]), dec!(145.50));
        assert_eq!(trial["lines"].as_array().map(Vec::len), Some(2));

        let before = server
            .get("/api/v1/reports/trial-balance")
            .add_query_param("tenantId", &books.tenant)
            .add_query_param("asOf", "2024-01-01")
            .await
            .json::<Value>();
        assert_eq!(before["lines"].as_array().map(Vec::len), Some(0));

        let report = server
            .get("/api/v1/reports/reconciliation")
            .add_query_param("tenantId", &books.tenant)
            .await
            .json::<Value>();
        assert_eq!(report["isConsistent"], true);

        let history = server
            .get(&format!("/api/v1/chart-of-accounts/{}/history", books.cash))
            .await
            .json::<Value>();
        assert_eq!(amount(&history["closingBalance"]), dec!(145.50));
    }

    #[tokio::test]
    async fn test_trial_balance_requires_tenant() {
        let response = server().get("/api/v1/reports/trial-balance").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

mod invoicing {
    use super::*;

    #[tokio::test]
    async fn test_create_invoice_defaults_outstanding() {
        let server = server();
        let tenant = create_tenant(&server, GstinFixtures::primary()).await;

        let response = server
            .post("/api/v1/invoices")
            .json(&json!({
                "tenantId": tenant,
                "customerId": IdFixtures::customer().as_uuid(),
                "invoiceNumber": "INV-2024-001",
                "invoiceDate": "2024-09-15",
                "subtotal": "1000.00",
                "totalTax": "180.00",
                "totalAmount": "1180.00",
                "amountPaid": "180.00",
                "lines": [
                    {
                        "productId": IdFixtures::product().as_uuid(),
                        "quantity": 2,
                        "unitPrice": "500.00",
                        "gstRate": "18",
                    }
                ],
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let invoice = response.json::<Value>();
        assert_eq!(invoice["status"], "DRAFT");
        assert_eq!(amount(&invoice["outstanding"]), dec!(1000));
        assert_eq!(invoice["lines"][0]["lineNumber"], 1);

        let fetched = server
            .get(&format!("/api/v1/invoices/{}", id(&invoice, "invoiceId")))
            .await;
        fetched.assert_status_ok();
    }

    #[tokio::test]
    async fn test_overflowing_line_total_is_unprocessable() {
        let server = server();
        let tenant = create_tenant(&server, GstinFixtures::primary()).await;

        for unit_price in ["99999999999999999.99", "79228162514264337593543.95"] {
            let response = server
                .post("/api/v1/invoices")
                .json(&json!({
                    "tenantId": tenant,
                    "customerId": IdFixtures::customer().as_uuid(),
                    "invoiceNumber": "INV-2024-002",
                    "subtotal": "1000.00",
                    "totalAmount": "1000.00",
                    "lines": [
                        {
                            "productId": IdFixtures::product().as_uuid(),
                            "quantity": 4_000_000_000u32,
                            "unitPrice": unit_price,
                        }
                    ],
                }))
                .await;
            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        }

        let listed = server
            .get("/api/v1/invoices")
            .add_query_param("tenantId", &tenant)
            .await
            .json::<Value>();
        assert_eq!(listed.as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_unknown_invoice_is_not_found() {
        let response = server()
            .get(&format!("/api/v1/invoices/{}", core_kernel::InvoiceId::new().as_uuid()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod inventory {
    use super::*;

    #[tokio::test]
    async fn test_movements_update_balance_and_refuse_oversell() {
        let server = server();
        let tenant = create_tenant(&server, GstinFixtures::primary()).await;
        let product = IdFixtures::product().as_uuid().to_string();

        let purchase = server
            .post("/api/v1/inventory/movements")
            .json(&json!({
                "tenantId": tenant,
                "productId": product,
                "transactionType": "PURCHASE",
                "quantityIn": 10,
                "unitCost": "12.50",
            }))
            .await;
        purchase.assert_status(StatusCode::CREATED);
        assert_eq!(purchase.json::<Value>()["balance"]["currentQuantity"], 10);

        let oversell = server
            .post("/api/v1/inventory/movements")
            .json(&json!({
                "tenantId": tenant,
                "productId": product,
                "transactionType": "SALE",
                "quantityOut": 11,
            }))
            .await;
        oversell.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let balances = server
            .get("/api/v1/inventory/balance")
            .add_query_param("tenantId", &tenant)
            .await
            .json::<Value>();
        assert_eq!(balances[0]["currentQuantity"], 10);

        let movements = server.get("/api/v1/inventory/movements").await.json::<Value>();
        assert_eq!(movements.as_array().map(Vec::len), Some(1));
    }
}
