//! General ledger handlers

use axum::{extract::State, Json};

use core_kernel::LedgerEntryId;
use domain_ledger::GeneralLedgerEntry;

use crate::dto::TenantFilter;
use crate::extract::{ApiPath, ApiQuery};
use crate::{error::ApiError, AppState};

pub async fn list_general_ledger(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TenantFilter>,
) -> Result<Json<Vec<GeneralLedgerEntry>>, ApiError> {
    Ok(Json(state.queries.general_ledger(filter.scope()).await?))
}

pub async fn get_general_ledger_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LedgerEntryId>,
) -> Result<Json<GeneralLedgerEntry>, ApiError> {
    Ok(Json(state.queries.ledger_entry(id).await?))
}
