//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"message": ...}` with a stable
//! message. Validation failures add `"issues"`. Internal detail is logged,
//! never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use applydiary_core::{Error, FieldIssue};

pub const INVALID_PAYLOAD: &str = "Invalid request payload";
pub const AUTH_REQUIRED: &str = "Authentication required";
pub const QUOTA_MESSAGE: &str = "AI quota exceeded. Add billing or try again later.";
pub const GENERATION_FAILED: &str = "AI generation failed.";
pub const GENERATION_UNCONFIGURED: &str = "AI generation is not configured";

/// JSON error body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<FieldIssue>>,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<FieldIssue>),
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    PayloadTooLarge(String),
    TooManyRequests(String),
    Internal(String),
}

impl ApiError {
    /// A 400 with a single field issue.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldIssue::new(field, message)])
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(issues) => ApiError::Validation(issues),
            Error::Unauthenticated(reason) => {
                debug!(subsystem = "api", auth_failure = %reason, "Rejected credentials");
                ApiError::Unauthorized(AUTH_REQUIRED.to_string())
            }
            Error::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".to_string()),
            Error::NotFound(kind) => ApiError::NotFound(format!("{} not found", kind)),
            Error::DuplicateEmail => ApiError::Conflict("Email already registered".to_string()),
            Error::PayloadTooLarge { limit, .. } => ApiError::PayloadTooLarge(format!(
                "File exceeds the maximum upload size of {} bytes",
                limit
            )),
            Error::QuotaExceeded(detail) => {
                warn!(subsystem = "api", error = %detail, "Generation quota exceeded");
                ApiError::TooManyRequests(QUOTA_MESSAGE.to_string())
            }
            Error::ServiceUnavailable(detail) => {
                warn!(subsystem = "api", error = %detail, "Generation unavailable");
                ApiError::Internal(GENERATION_UNCONFIGURED.to_string())
            }
            Error::Upstream(detail) => {
                error!(subsystem = "api", error = %detail, "Upstream failure");
                ApiError::Internal(GENERATION_FAILED.to_string())
            }
            other => {
                error!(subsystem = "api", error = %other, "Request failed");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(issues) => ErrorBody {
                message: INVALID_PAYLOAD.to_string(),
                issues: Some(issues),
            },
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message)
            | ApiError::PayloadTooLarge(message)
            | ApiError::TooManyRequests(message)
            | ApiError::Internal(message) => ErrorBody {
                message,
                issues: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
