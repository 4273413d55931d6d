//! Ledger report handlers

use axum::{extract::State, Json};

use domain_ledger::{ReconciliationReport, TrialBalance};

use crate::dto::ReportQuery;
use crate::extract::ApiQuery;
use crate::{error::ApiError, AppState};

/// Trial balance as of `asOf`, or as of today in the tenant's timezone
pub async fn trial_balance(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Json<TrialBalance>, ApiError> {
    let as_of = match query.as_of {
        Some(date) => date,
        None => state.registry.tenant(query.tenant_id).await?.today(),
    };
    Ok(Json(state.queries.trial_balance(query.tenant_id, as_of).await?))
}

pub async fn reconciliation(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> Result<Json<ReconciliationReport>, ApiError> {
    Ok(Json(state.queries.reconcile(query.tenant_id).await?))
}
