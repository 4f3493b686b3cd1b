//! Mapping from core errors to HTTP responses.

use arbiter_core::ArbiterError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Handler error; renders as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

pub fn status_for(err: &ArbiterError) -> StatusCode {
    match err {
        ArbiterError::NotFound { .. } => StatusCode::NOT_FOUND,
        ArbiterError::InvalidInput { .. } | ArbiterError::UnsupportedFormat { .. } => {
            StatusCode::BAD_REQUEST
        }
        ArbiterError::NotReady { .. } => StatusCode::CONFLICT,
        ArbiterError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        ArbiterError::Startup { .. } | ArbiterError::Extraction { .. } | ArbiterError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<ArbiterError> for ApiError {
    fn from(err: ArbiterError) -> Self {
        Self::new(status_for(&err), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), detail = %self.detail, "request failed");
        }
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
