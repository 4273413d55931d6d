//! Inventory handlers

use axum::{extract::State, http::StatusCode, Json};

use domain_inventory::{InventoryBalance, InventoryMovement};

use crate::dto::inventory::{MovementRecordedResponse, RecordMovementRequest};
use crate::dto::TenantFilter;
use crate::extract::{ApiQuery, ValidatedJson};
use crate::{error::ApiError, AppState};

pub async fn list_balances(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TenantFilter>,
) -> Result<Json<Vec<InventoryBalance>>, ApiError> {
    Ok(Json(state.inventory.balances(filter.scope()).await?))
}

pub async fn list_movements(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TenantFilter>,
) -> Result<Json<Vec<InventoryMovement>>, ApiError> {
    Ok(Json(state.inventory.movements(filter.scope()).await?))
}

/// Records a movement and updates the product balance in one step
pub async fn record_movement(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecordMovementRequest>,
) -> Result<(StatusCode, Json<MovementRecordedResponse>), ApiError> {
    let (movement, balance) = state.inventory.record(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(MovementRecordedResponse { movement, balance }),
    ))
}
