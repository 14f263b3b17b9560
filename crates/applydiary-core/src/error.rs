//! Error types for ApplyDiary.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias using ApplyDiary's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of owned resource, used to build "not found" messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Application,
    Note,
    Document,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::User => "User",
            ResourceKind::Application => "Application",
            ResourceKind::Note => "Note",
            ResourceKind::Document => "Document",
        };
        f.write_str(name)
    }
}

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Core error type for ApplyDiary operations.
///
/// Ownership mismatches never get their own variant: a record owned by
/// someone else is reported exactly like a record that does not exist.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or out-of-range input
    #[error("Invalid request payload")]
    Validation(Vec<FieldIssue>),

    /// Missing, malformed, forged, or expired bearer token
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Unknown email or wrong password (indistinguishable on purpose)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Resource absent, soft-deleted, or owned by another user
    #[error("{0} not found")]
    NotFound(ResourceKind),

    /// Normalized email already registered
    #[error("Email already registered")]
    DuplicateEmail,

    /// Upload exceeds the configured maximum
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// External text-generation provider throttled the request
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// External text-generation provider is not configured
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// External dependency failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a validation error for a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation(vec![FieldIssue::new(field, message)])
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("Serialization error: {}", e))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Upstream(e.to_string())
    }
}
