//! Tenant handlers

use axum::{extract::State, http::StatusCode, Json};

use core_kernel::TenantId;
use domain_tenant::Tenant;

use crate::dto::tenant::CreateTenantRequest;
use crate::extract::{ApiPath, ValidatedJson};
use crate::{error::ApiError, AppState};

pub async fn create_tenant(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTenantRequest>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    let tenant = state.tenants.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn list_tenants(State(state): State<AppState>) -> Result<Json<Vec<Tenant>>, ApiError> {
    Ok(Json(state.tenants.list().await?))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TenantId>,
) -> Result<Json<Tenant>, ApiError> {
    Ok(Json(state.tenants.get(id).await?))
}
