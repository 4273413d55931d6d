//! HTTP API Layer
//!
//! REST API of the accounting service using Axum. Every route lives under
//! `/api/v1` and is public.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each resource
//! - **Middleware**: Request ids, tracing, request logging
//! - **DTOs**: Request bodies and query strings
//! - **Error Handling**: Consistent `{error, message, details}` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::AppConfig};
//!
//! let app = create_router(AppState::in_memory(AppConfig::in_memory()));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_inventory::{InMemoryInventoryStore, InventoryPort, InventoryService};
use domain_invoicing::{InMemoryInvoiceStore, InvoicePort, InvoiceService};
use domain_ledger::{AccountRegistry, InMemoryLedgerStore, LedgerPort, LedgerQueries, PostingEngine};
use domain_tenant::{InMemoryTenantStore, TenantPort, TenantService};
use infra_db::{DatabasePool, PostgresAdapters};

use crate::config::AppConfig;
use crate::handlers::{accounts, health, inventory, invoices, journals, ledger, reports, tenants};
use crate::middleware::{request_logging_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tenants: TenantService,
    pub registry: AccountRegistry,
    pub engine: PostingEngine,
    pub queries: LedgerQueries,
    pub invoices: InvoiceService,
    pub inventory: InventoryService,
    /// Storage adapters asked by the readiness check
    pub adapters: Vec<Arc<dyn HealthCheckable>>,
    pub config: AppConfig,
}

impl AppState {
    /// Services over fresh in-memory stores
    pub fn in_memory(config: AppConfig) -> Self {
        let tenants = Arc::new(InMemoryTenantStore::new());
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let invoices = Arc::new(InMemoryInvoiceStore::new());
        let inventory = Arc::new(InMemoryInventoryStore::new());

        let adapters: Vec<Arc<dyn HealthCheckable>> = vec![
            tenants.clone(),
            ledger.clone(),
            invoices.clone(),
            inventory.clone(),
        ];
        Self::wire(tenants, ledger, invoices, inventory, adapters, config)
    }

    /// Services over the PostgreSQL adapters
    pub fn postgres(pool: DatabasePool, config: AppConfig) -> Self {
        let PostgresAdapters {
            tenants,
            ledger,
            invoices,
            inventory,
        } = PostgresAdapters::new(pool);
        let tenants = Arc::new(tenants);
        let ledger = Arc::new(ledger);
        let invoices = Arc::new(invoices);
        let inventory = Arc::new(inventory);

        let adapters: Vec<Arc<dyn HealthCheckable>> = vec![
            tenants.clone(),
            ledger.clone(),
            invoices.clone(),
            inventory.clone(),
        ];
        Self::wire(tenants, ledger, invoices, inventory, adapters, config)
    }

    fn wire(
        tenant_port: Arc<dyn TenantPort>,
        ledger_port: Arc<dyn LedgerPort>,
        invoice_port: Arc<dyn InvoicePort>,
        inventory_port: Arc<dyn InventoryPort>,
        adapters: Vec<Arc<dyn HealthCheckable>>,
        config: AppConfig,
    ) -> Self {
        let registry = AccountRegistry::new(ledger_port.clone(), tenant_port.clone());

        Self {
            tenants: TenantService::new(tenant_port.clone()),
            engine: PostingEngine::new(ledger_port.clone(), registry.clone()),
            queries: LedgerQueries::new(ledger_port, registry.clone()),
            invoices: InvoiceService::new(invoice_port, tenant_port.clone()),
            inventory: InventoryService::new(inventory_port, tenant_port),
            registry,
            adapters,
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let tenant_routes = Router::new()
        .route("/", post(tenants::create_tenant).get(tenants::list_tenants))
        .route("/:id", get(tenants::get_tenant));

    let account_routes = Router::new()
        .route("/", post(accounts::create_account).get(accounts::list_accounts))
        .route("/:id", get(accounts::get_account))
        .route("/:id/balance", get(accounts::get_account_balance))
        .route("/:id/history", get(accounts::get_account_history));

    let journal_routes = Router::new()
        .route(
            "/",
            post(journals::create_journal_entry).get(journals::list_journal_entries),
        )
        .route("/:id", get(journals::get_journal_entry))
        .route("/:id/validate", post(journals::validate_journal_entry))
        .route("/:id/reject", post(journals::reject_journal_entry))
        .route("/:id/post", post(journals::post_journal_entry))
        .route("/:id/postings", get(journals::list_postings));

    let ledger_routes = Router::new()
        .route("/", get(ledger::list_general_ledger))
        .route("/:id", get(ledger::get_general_ledger_entry));

    let invoice_routes = Router::new()
        .route("/", post(invoices::create_invoice).get(invoices::list_invoices))
        .route("/:id", get(invoices::get_invoice));

    let inventory_routes = Router::new()
        .route("/balance", get(inventory::list_balances))
        .route(
            "/movements",
            get(inventory::list_movements).post(inventory::record_movement),
        );

    let report_routes = Router::new()
        .route("/trial-balance", get(reports::trial_balance))
        .route("/reconciliation", get(reports::reconciliation));

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/tenants", tenant_routes)
        .nest("/chart-of-accounts", account_routes)
        .nest("/journal-entries", journal_routes)
        .nest("/general-ledger", ledger_routes)
        .nest("/invoices", invoice_routes)
        .nest("/inventory", inventory_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
