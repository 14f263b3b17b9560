//! HTTP handlers for the ApplyDiary API.
//!
//! Handlers translate between HTTP and the service layer: extract, call one
//! service method, wrap the result in its response envelope.

pub mod applications;
pub mod auth;
pub mod documents;
pub mod followup;
pub mod health;
pub mod notes;

use axum::http::Uri;
use serde::Serialize;
use utoipa::ToSchema;

use applydiary_core::{Application, Document, Note, UserProfile};

use crate::error::ApiError;

/// `{"data": ...}` response envelope.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    ApplicationEnvelope = DataEnvelope<Application>,
    ApplicationListEnvelope = DataEnvelope<Vec<Application>>,
    NoteEnvelope = DataEnvelope<Note>,
    NoteListEnvelope = DataEnvelope<Vec<Note>>,
    DocumentEnvelope = DataEnvelope<Document>,
    DocumentListEnvelope = DataEnvelope<Vec<Document>>
)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{"user": ...}` response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserProfile,
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    tracing::debug!(subsystem = "api", path = %uri.path(), "No route matched");
    ApiError::NotFound("Not found".to_string())
}
