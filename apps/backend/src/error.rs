//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use question_core::{QuestionError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Question(#[from] QuestionError),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<ValidationErrors>,
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::Question(e) => match e {
                QuestionError::FeatureUnavailable { .. } => {
                    (StatusCode::NOT_IMPLEMENTED, "feature_unavailable")
                }
                QuestionError::GapCountMismatch { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "corrupted_question")
                }
                QuestionError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
                QuestionError::InvalidGapSpan { .. } => (StatusCode::BAD_REQUEST, "invalid_gap"),
                QuestionError::DuplicateId { .. }
                | QuestionError::DanglingMatchReference { .. }
                | QuestionError::IncompleteAnswerPayload { .. }
                | QuestionError::InvalidId { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let message = self.to_string();
        let fields = match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        };
        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
