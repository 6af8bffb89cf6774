//! Audit form submissions.
//!
//! Each handler validates the form first; a form with any field error
//! never reaches the back office. Back-office failures are reduced to a
//! single "Failed to ..." message.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::response::{Created, DataResponse, NoContent};
use crate::app::AppState;
use crate::domain::{EngagementInput, FindingInput, RecordId, WorkpaperInput};
use crate::error::{ApiError, ApiResult};
use crate::forms::Validate;
use crate::middleware::Caller;

/// POST /audit/engagements
pub async fn create_engagement(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Json(input): Json<EngagementInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate().map_err(ApiError::Validation)?;

    tracing::info!(name = %input.name, client = %input.client_name, "Creating engagement");

    let engagement = state
        .audit_for(&caller)
        .engagements()
        .create(&input)
        .await
        .map_err(|e| ApiError::upstream("save engagement", e))?;

    Ok(Created(DataResponse::new(engagement)))
}

/// PUT /audit/engagements/:id
pub async fn update_engagement(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(input): Json<EngagementInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate().map_err(ApiError::Validation)?;

    tracing::info!(engagement_id = %id, "Updating engagement");

    let engagement = state
        .audit_for(&caller)
        .engagements()
        .update(&id, &input)
        .await
        .map_err(|e| ApiError::upstream("save engagement", e))?;

    Ok(Json(DataResponse::new(engagement)))
}

/// DELETE /audit/engagements/:id
///
/// Workpapers and findings of the engagement are left in place.
pub async fn delete_engagement(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> ApiResult<NoContent> {
    tracing::info!(engagement_id = %id, "Deleting engagement");

    state
        .audit_for(&caller)
        .engagements()
        .delete(&id)
        .await
        .map_err(|e| ApiError::upstream("delete engagement", e))?;

    Ok(NoContent)
}

/// POST /audit/workpapers
pub async fn create_workpaper(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Json(input): Json<WorkpaperInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate().map_err(ApiError::Validation)?;

    tracing::info!(
        workpaper_number = %input.workpaper_number,
        engagement_id = ?input.engagement_id,
        "Creating workpaper"
    );

    let workpaper = state
        .audit_for(&caller)
        .workpapers()
        .create(&input)
        .await
        .map_err(|e| ApiError::upstream("save workpaper", e))?;

    Ok(Created(DataResponse::new(workpaper)))
}

/// PUT /audit/workpapers/:id
pub async fn update_workpaper(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(input): Json<WorkpaperInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate().map_err(ApiError::Validation)?;

    tracing::info!(workpaper_id = %id, "Updating workpaper");

    let workpaper = state
        .audit_for(&caller)
        .workpapers()
        .update(&id, &input)
        .await
        .map_err(|e| ApiError::upstream("save workpaper", e))?;

    Ok(Json(DataResponse::new(workpaper)))
}

/// POST /audit/findings
pub async fn create_finding(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Json(input): Json<FindingInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate().map_err(ApiError::Validation)?;

    tracing::info!(title = %input.title, severity = ?input.severity, "Recording finding");

    let finding = state
        .audit_for(&caller)
        .findings()
        .create(&input)
        .await
        .map_err(|e| ApiError::upstream("save finding", e))?;

    Ok(Created(DataResponse::new(finding)))
}
