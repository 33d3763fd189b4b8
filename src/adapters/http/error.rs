//! HTTP error mapping.
//!
//! Converts module errors into `{"code", "message"}` JSON bodies with the
//! matching status. Internal details never reach a 5xx body; they are logged.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorCode;
use crate::domain::task::TaskError;
use crate::domain::user::UserError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

fn internal_error(detail: &str) -> Response {
    tracing::error!(error = %detail, "Request failed");
    ErrorResponse::new("INTERNAL_ERROR", "Internal server error")
        .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}

// ════════════════════════════════════════════════════════════════════════════════
// Users & Auth
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts `UserError` to an HTTP response.
#[derive(Debug)]
pub struct UserApiError(pub UserError);

impl From<UserError> for UserApiError {
    fn from(err: UserError) -> Self {
        Self(err)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            UserError::NotFound(_) => StatusCode::NOT_FOUND,
            UserError::EmailTaken(_) => StatusCode::CONFLICT,
            UserError::InvalidCredentials | UserError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            UserError::Forbidden => StatusCode::FORBIDDEN,
            UserError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            UserError::Infrastructure(detail) => return internal_error(detail),
        };

        let message = match &self.0 {
            // Do not echo which address is registered.
            UserError::EmailTaken(_) => "Email already registered".to_string(),
            other => other.message(),
        };
        ErrorResponse::new(self.0.code().to_string(), message).into_response_with(status)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tasks
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts `TaskError` to an HTTP response.
#[derive(Debug)]
pub struct TaskApiError(pub TaskError);

impl From<TaskError> for TaskApiError {
    fn from(err: TaskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::BatchNotFound(_) => {
                return ErrorResponse::new(
                    ErrorCode::TaskNotFound.to_string(),
                    "Some tasks not found or unauthorized",
                )
                .into_response_with(StatusCode::NOT_FOUND)
            }
            TaskError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            TaskError::Infrastructure(detail) => return internal_error(detail),
        };

        ErrorResponse::new(self.0.code().to_string(), self.0.message()).into_response_with(status)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Extractor rejections
// ════════════════════════════════════════════════════════════════════════════════

/// Malformed body, path, or query string.
#[derive(Debug)]
pub struct BadRequest(pub String);

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        ErrorResponse::new(ErrorCode::ValidationFailed.to_string(), self.0)
            .into_response_with(StatusCode::BAD_REQUEST)
    }
}

impl From<JsonRejection> for BadRequest {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl From<PathRejection> for BadRequest {
    fn from(rejection: PathRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl From<QueryRejection> for BadRequest {
    fn from(rejection: QueryRejection) -> Self {
        Self(rejection.body_text())
    }
}

impl From<BadRequest> for UserApiError {
    fn from(err: BadRequest) -> Self {
        Self(UserError::validation("request", err.0))
    }
}

impl From<BadRequest> for TaskApiError {
    fn from(err: BadRequest) -> Self {
        Self(TaskError::validation("request", err.0))
    }
}
