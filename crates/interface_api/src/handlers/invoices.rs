//! Invoice handlers

use axum::{extract::State, http::StatusCode, Json};

use core_kernel::InvoiceId;
use domain_invoicing::Invoice;

use crate::dto::invoice::CreateInvoiceRequest;
use crate::dto::TenantFilter;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::{error::ApiError, AppState};

pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let invoice = state.invoices.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn list_invoices(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TenantFilter>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(state.invoices.list(filter.scope()).await?))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<InvoiceId>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(state.invoices.get(id).await?))
}
