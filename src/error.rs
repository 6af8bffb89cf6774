//! Error types for the gateway
//!
//! `ServiceError` describes what went wrong talking to the back office;
//! `ApiError` is what the browser shell sees.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::forms::FieldErrors;
use crate::reconciliation::ReconcileError;

/// Failure of a call to the back-office REST API.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("back office unreachable: {0}")]
    Transport(String),

    #[error("back office returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid back office response: {0}")]
    Decode(String),

    #[error("invalid endpoint {path}: {reason}")]
    Endpoint { path: String, reason: String },

    #[error("record id {0:?} cannot be used in a back office path")]
    InvalidId(String),
}

impl ServiceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    /// A submission the back office rejected, reduced to one user-facing line.
    #[error("{message}")]
    Upstream {
        message: String,
        #[source]
        source: ServiceError,
    },

    /// A newer load of the same view started before this one finished
    #[error("Superseded by a newer request")]
    Superseded,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<ReconcileError> for ApiError {
    fn from(e: ReconcileError) -> Self {
        Self::NotFound(e.to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    /// Wrap a failed back-office call with the generic "failed to X" message.
    pub fn upstream(action: &str, source: ServiceError) -> Self {
        if source.is_not_found() {
            return Self::NotFound(format!("{action}: record not found"));
        }
        if let ServiceError::InvalidId(id) = &source {
            return Self::BadRequest(format!("Invalid record id: {id:?}"));
        }
        Self::Upstream {
            message: format!("Failed to {action}, please try again"),
            source,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Superseded => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Upstream { .. } => "UPSTREAM_FAILED",
            Self::Superseded => "SUPERSEDED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Validation(_) => "Please correct the highlighted fields".to_string(),
            Self::Upstream { message, .. } => message.clone(),
            Self::Superseded => "A newer request replaced this one".to_string(),
            // Don't leak internal error details
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            Self::Upstream { source, .. } => {
                tracing::error!(error = %source, "Back office rejected request");
            }
            Self::Superseded => {
                tracing::debug!("Dropping superseded response");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let code = self.error_code().to_string();
        let message = self.public_message();
        let fields = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        (status, Json(ErrorResponse { code, message, fields })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_404_becomes_not_found() {
        let err = ApiError::upstream(
            "update engagement",
            ServiceError::Status {
                status: 404,
                message: "missing".into(),
            },
        );
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn upstream_failure_uses_generic_message() {
        let err = ApiError::upstream("save workpaper", ServiceError::Transport("refused".into()));
        assert_eq!(err.to_string(), "Failed to save workpaper, please try again");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unusable_id_is_a_bad_request() {
        let err = ApiError::upstream(
            "delete engagement",
            ServiceError::InvalidId("../integrations".into()),
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }
}
