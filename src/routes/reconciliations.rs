//! Reconciliation matching endpoints.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::response::{Created, DataResponse};
use crate::app::AppState;
use crate::domain::{Reconciliation, ReconciliationInput, ReconciliationItem, RecordId};
use crate::error::{ApiError, ApiResult};
use crate::forms::Validate;
use crate::middleware::Caller;
use crate::pages::reconciliations::ReconciliationDetail;
use crate::reconciliation::{dispute_item, toggle_item_match, ReconcileError};
use crate::services::AuditService;

type ItemChange = for<'a> fn(
    &'a mut [Reconciliation],
    &RecordId,
    &RecordId,
) -> Result<&'a ReconciliationItem, ReconcileError>;

/// Load one reconciliation, apply `change` to one of its items, persist the
/// item, and return the updated reconciliation.
async fn change_item(
    audit: AuditService,
    reconciliation_id: RecordId,
    item_id: RecordId,
    change: ItemChange,
) -> ApiResult<ReconciliationDetail> {
    let reconciliation = audit
        .reconciliations()
        .get(&reconciliation_id)
        .await
        .map_err(|e| ApiError::upstream("load reconciliation", e))?;

    let mut reconciliations = vec![reconciliation];
    let (status, matched_with) = {
        let item = change(&mut reconciliations, &reconciliation_id, &item_id)?;
        (item.status, item.matched_with.clone())
    };

    audit
        .update_reconciliation_item(&reconciliation_id, &item_id, status, matched_with.as_ref())
        .await
        .map_err(|e| ApiError::upstream("update reconciliation item", e))?;

    tracing::info!(
        reconciliation_id = %reconciliation_id,
        item_id = %item_id,
        status = status.as_str(),
        "Reconciliation item updated"
    );

    Ok(ReconciliationDetail::from(&reconciliations[0]))
}

/// POST /reconciliations/:id/items/:item_id/toggle
pub async fn toggle_item(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path((id, item_id)): Path<(RecordId, RecordId)>,
) -> ApiResult<impl IntoResponse> {
    let detail = change_item(state.audit_for(&caller), id, item_id, toggle_item_match).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// POST /reconciliations/:id/items/:item_id/dispute
pub async fn dispute(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Path((id, item_id)): Path<(RecordId, RecordId)>,
) -> ApiResult<impl IntoResponse> {
    let detail = change_item(state.audit_for(&caller), id, item_id, dispute_item).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// POST /reconciliations
pub async fn create_reconciliation(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Json(input): Json<ReconciliationInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate().map_err(ApiError::Validation)?;

    tracing::info!(
        supplier_code = %input.supplier_code,
        period = %input.period,
        "Opening reconciliation"
    );

    let reconciliation = state
        .audit_for(&caller)
        .reconciliations()
        .create(&input)
        .await
        .map_err(|e| ApiError::upstream("save reconciliation", e))?;

    Ok(Created(DataResponse::new(ReconciliationDetail::from(
        &reconciliation,
    ))))
}
