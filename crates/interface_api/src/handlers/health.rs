//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use core_kernel::HealthCheckResult;

use crate::AppState;

pub const SERVICE_NAME: &str = "Accounting Service";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub adapters: Vec<HealthCheckResult>,
}

/// Liveness; answers as long as the process is serving
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness; asks every storage adapter
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let mut adapters = Vec::with_capacity(state.adapters.len());
    for adapter in &state.adapters {
        adapters.push(adapter.health_check().await);
    }

    if adapters.iter().all(HealthCheckResult::is_healthy) {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "UP".to_string(),
                adapters,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "DOWN".to_string(),
                adapters,
            }),
        )
    }
}
