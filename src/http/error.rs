//! API error type and its HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::essence::EssenceError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be decoded (malformed JSON, unknown mode, ...).
    #[error("{}", .0.body_text())]
    Payload(#[from] JsonRejection),

    /// Path parameter could not be decoded.
    #[error("{}", .0.body_text())]
    Path(#[from] PathRejection),

    /// Decoded request failed semantic validation.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Max {max} iterations allowed, got {requested}")]
    IterationLimit { requested: u32, max: u32 },

    #[error("processing failed: {0}")]
    Processing(#[from] EssenceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Payload(
                JsonRejection::JsonSyntaxError(_)
                | JsonRejection::JsonDataError(_)
                | JsonRejection::MissingJsonContentType(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Payload(rejection) => rejection.status(),
            ApiError::Path(rejection) => rejection.status(),
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::IterationLimit { .. } => StatusCode::BAD_REQUEST,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Payload(_) | ApiError::Path(_) | ApiError::InvalidRequest(_) => {
                "invalid_request"
            }
            ApiError::IterationLimit { .. } => "iteration_limit",
            ApiError::Processing(_) => "processing_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = %status, detail = %detail, "Request failed");
        } else {
            tracing::warn!(status = %status, detail = %detail, "Request rejected");
        }

        let body = json!({
            "error": self.kind(),
            "detail": detail,
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidRequest("workers".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::IterationLimit { requested: 101, max: 100 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Processing(EssenceError::Task("panicked".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_iteration_limit_message() {
        let err = ApiError::IterationLimit { requested: 500, max: 100 };
        assert_eq!(err.to_string(), "Max 100 iterations allowed, got 500");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
