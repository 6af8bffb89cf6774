//! Visual effect timelines for the browser shell.

use axum::{extract::Query, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::response::DataResponse;
use crate::error::{ApiError, ApiResult};
use crate::snap::{SnapConfig, SnapFrame};

const MAX_DURATION_MS: u64 = 10_000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapQuery {
    pub duration_ms: Option<u64>,
    pub frame_interval_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapTimeline {
    pub duration_ms: u64,
    /// Force completion this long after the start if frames stall
    pub fallback_after_ms: u64,
    pub frames: Vec<SnapFrame>,
}

/// GET /effects/snap
pub async fn snap_timeline(Query(query): Query<SnapQuery>) -> ApiResult<impl IntoResponse> {
    let defaults = SnapConfig::default();
    let duration_ms = query
        .duration_ms
        .unwrap_or(defaults.duration.as_millis() as u64);
    if duration_ms == 0 || duration_ms > MAX_DURATION_MS {
        return Err(ApiError::BadRequest(format!(
            "durationMs must be between 1 and {MAX_DURATION_MS}"
        )));
    }

    let config = SnapConfig {
        duration: Duration::from_millis(duration_ms),
        frame_interval: query
            .frame_interval_ms
            .map(|ms| Duration::from_millis(ms.max(1)))
            .unwrap_or(defaults.frame_interval),
        ..defaults
    };

    Ok(Json(DataResponse::new(SnapTimeline {
        duration_ms,
        fallback_after_ms: (config.duration + config.fallback_grace).as_millis() as u64,
        frames: config.keyframes(),
    })))
}
