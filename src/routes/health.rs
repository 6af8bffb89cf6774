use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub back_office: String,
    pub fallback_data: bool,
}

/// Health check endpoint - public
///
/// The gateway stays up when the back office is down, since every page can
/// render from sample data; that case reports `degraded` with 200.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let upstream = state.transport.health_check().await;
    if let Err(e) = &upstream {
        tracing::warn!(error = %e, "Back office health check failed");
    }

    let (status, status_code) = match (&upstream, state.settings.fallback_data_enabled) {
        (Ok(()), _) => ("healthy", StatusCode::OK),
        (Err(_), true) => ("degraded", StatusCode::OK),
        (Err(_), false) => ("unhealthy", StatusCode::SERVICE_UNAVAILABLE),
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                back_office: if upstream.is_ok() { "ok" } else { "error" }.to_string(),
                fallback_data: state.settings.fallback_data_enabled,
            },
        }),
    )
}
