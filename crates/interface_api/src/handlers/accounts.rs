//! Chart of accounts handlers

use axum::{extract::State, http::StatusCode, Json};

use core_kernel::AccountId;
use domain_ledger::{Account, AccountBalance, AccountHistory};

use crate::dto::account::CreateAccountRequest;
use crate::dto::{AsOfQuery, TenantFilter};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::{error::ApiError, AppState};

pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = state.registry.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TenantFilter>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.registry.list(filter.scope()).await?))
}

pub async fn get_account(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.registry.get(id).await?))
}

/// Materialized balance, zero for an account never posted to
pub async fn get_account_balance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<AccountBalance>, ApiError> {
    let account = state.registry.get(id).await?;
    Ok(Json(state.queries.account_balance(account.tenant_id, id).await?))
}

pub async fn get_account_history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AccountId>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> Result<Json<AccountHistory>, ApiError> {
    let account = state.registry.get(id).await?;
    let history = state
        .queries
        .account_history(account.tenant_id, id, query.as_of)
        .await?;
    Ok(Json(history))
}
