//! OpenAI-specific error handling.

use applydiary_core::Error;

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit or billing quota exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert an OpenAI failure into the service error taxonomy.
///
/// Only throttling is surfaced distinctly; everything else is an opaque
/// upstream failure whose detail stays in the logs.
pub fn to_core_error(code: OpenAIErrorCode, message: &str) -> Error {
    match code {
        OpenAIErrorCode::RateLimitExceeded => Error::QuotaExceeded(message.to_string()),
        OpenAIErrorCode::AuthenticationError => {
            Error::Upstream(format!("Authentication failed: {}", message))
        }
        OpenAIErrorCode::ModelNotFound => Error::Upstream(format!("Model not found: {}", message)),
        OpenAIErrorCode::ContextLengthExceeded => {
            Error::Upstream(format!("Context too long: {}", message))
        }
        OpenAIErrorCode::ServerError => Error::Upstream(format!("Server error: {}", message)),
        OpenAIErrorCode::Unknown => Error::Upstream(message.to_string()),
    }
}
