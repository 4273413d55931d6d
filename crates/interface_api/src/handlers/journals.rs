//! Journal entry handlers
//!
//! Workflow endpoints look the entry up first and act within its tenant.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::info;

use core_kernel::JournalEntryId;
use domain_ledger::{JournalEntry, Posting};

use crate::dto::journal::{
    CreateJournalEntryRequest, PostJournalEntryRequest, RejectJournalEntryRequest,
};
use crate::dto::TenantFilter;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::{error::ApiError, AppState};

pub async fn create_journal_entry(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateJournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let entry = state.engine.create_entry(request.into()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list_journal_entries(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TenantFilter>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    Ok(Json(state.engine.list(filter.scope()).await?))
}

pub async fn get_journal_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<JournalEntryId>,
) -> Result<Json<JournalEntry>, ApiError> {
    Ok(Json(state.engine.find(id).await?))
}

pub async fn validate_journal_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<JournalEntryId>,
) -> Result<Json<JournalEntry>, ApiError> {
    let entry = state.engine.find(id).await?;
    Ok(Json(state.engine.validate(entry.tenant_id, id).await?))
}

pub async fn reject_journal_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<JournalEntryId>,
    ValidatedJson(request): ValidatedJson<RejectJournalEntryRequest>,
) -> Result<Json<JournalEntry>, ApiError> {
    let entry = state.engine.find(id).await?;
    Ok(Json(state.engine.reject(entry.tenant_id, id, request.reason).await?))
}

/// Posts a VALIDATED entry; the body is optional
pub async fn post_journal_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<JournalEntryId>,
    body: Bytes,
) -> Result<Json<JournalEntry>, ApiError> {
    let request: PostJournalEntryRequest = if body.is_empty() {
        PostJournalEntryRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let entry = state.engine.find(id).await?;
    let outcome = state
        .engine
        .post(entry.tenant_id, id, request.posting_set)
        .await?;
    if outcome.was_already_posted() {
        info!(journal_id = %id, "Post request repeated an earlier post");
    }
    Ok(Json(outcome.into_entry()))
}

pub async fn list_postings(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<JournalEntryId>,
) -> Result<Json<Vec<Posting>>, ApiError> {
    let entry = state.engine.find(id).await?;
    Ok(Json(state.engine.postings(entry.tenant_id, id).await?))
}
