use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Core error taxonomy (spec §7). Only these variants are allowed to
/// surface as a request failure — everything else (provider hiccups,
/// summarizer timeouts, persistence failures) degrades silently at its
/// own call site and is never converted into an `AppError`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("input invalid: {0}")]
    InputInvalid(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn short_code(&self) -> &'static str {
        match self {
            AppError::InputInvalid(_) => "input_invalid",
            AppError::ConfigurationError(_) => "configuration_error",
            AppError::DeadlineExceeded => "timeout",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InputInvalid(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.short_code().to_string(),
            detail: self.to_string(),
        };
        tracing::warn!(error = %self, status = %status, "request failed");
        (status, Json(body)).into_response()
    }
}
