//! Page view endpoints.
//!
//! Every page load goes through the fetch facade, so these handlers only
//! fail when a newer load of the same view has started (same session
//! cookie and `x-view-id`), in which case the older response is dropped
//! with 409. Loads without both are never superseded.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::StatementRequest;
use crate::error::{ApiError, ApiResult};
use crate::middleware::Caller;
use crate::pages::{
    audit, etl, forex, integrations, materiality, quantum, ratios, reconciliations, statements,
    system,
};

/// Keep `view` only if no newer load of the same view started meanwhile.
fn respond<T: Serialize>(view: Option<T>) -> ApiResult<Json<DataResponse<T>>> {
    view.map(|view| Json(DataResponse::new(view)))
        .ok_or(ApiError::Superseded)
}

/// GET /pages/etl
pub async fn etl_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<etl::EtlQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("etl");
    respond(ctx.latest(key.as_deref(), etl::load(&ctx, &query)).await)
}

/// GET /pages/audit
pub async fn audit_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<audit::AuditQuery>,
) -> ApiResult<impl IntoResponse> {
    tracing::debug!(tab = ?query.tab, modal = ?query.modal, "Loading audit workspace");
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("audit");
    respond(ctx.latest(key.as_deref(), audit::load(&ctx, &query)).await)
}

/// GET /pages/materiality
pub async fn materiality_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<materiality::MaterialityQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("materiality");
    respond(ctx.latest(key.as_deref(), materiality::load(&ctx, &query)).await)
}

/// GET /pages/ratios
pub async fn ratios_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ratios::RatiosQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("ratios");
    respond(ctx.latest(key.as_deref(), ratios::load(&ctx, &query)).await)
}

/// GET /pages/forex
pub async fn forex_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<forex::ForexQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("forex");
    respond(ctx.latest(key.as_deref(), forex::load(&ctx, &query)).await)
}

/// GET /pages/quantum
pub async fn quantum_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<quantum::QuantumQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("quantum");
    respond(ctx.latest(key.as_deref(), quantum::load(&ctx, &query)).await)
}

/// GET /pages/reconciliations
pub async fn reconciliations_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<reconciliations::ReconciliationQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("reconciliations");
    respond(ctx.latest(key.as_deref(), reconciliations::load(&ctx, &query)).await)
}

/// GET /pages/system
pub async fn system_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<system::SystemQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("system");
    respond(ctx.latest(key.as_deref(), system::load(&ctx, &query)).await)
}

/// GET /pages/integrations
pub async fn integrations_page(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Query(query): Query<integrations::IntegrationsQuery>,
) -> ApiResult<impl IntoResponse> {
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("integrations");
    respond(ctx.latest(key.as_deref(), integrations::load(&ctx, &query)).await)
}

/// POST /pages/statements
pub async fn generate_statement(
    caller: Caller,
    State(state): State<Arc<AppState>>,
    Json(req): Json<StatementRequest>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!(
        entity_id = %req.entity_id,
        statement_type = ?req.statement_type,
        period_end = %req.period_end,
        "Generating financial statement"
    );
    let ctx = state.pages_for(&caller);
    let key = caller.load_key("statements");
    respond(ctx.latest(key.as_deref(), statements::generate(&ctx, &req)).await)
}
