//! Note handlers, nested under `/applications/{id}/notes`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use applydiary_core::validation::NotePayload;
use applydiary_core::Note;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::handlers::DataEnvelope;
use crate::state::AppState;

#[utoipa::path(get, path = "/applications/{id}/notes", tag = "Notes",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 200, description = "Notes, newest first", body = crate::handlers::NoteListEnvelope),
        (status = 404, description = "Application not found", body = crate::error::ErrorBody)))]
pub async fn list_notes(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(application_id): ApiPath<Uuid>,
) -> Result<Json<DataEnvelope<Vec<Note>>>, ApiError> {
    let notes = state.notes.list(user.id(), application_id).await?;
    Ok(Json(DataEnvelope::new(notes)))
}

#[utoipa::path(post, path = "/applications/{id}/notes", tag = "Notes",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = NotePayload,
    responses(
        (status = 201, description = "Created", body = crate::handlers::NoteEnvelope),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 404, description = "Application not found", body = crate::error::ErrorBody)))]
pub async fn create_note(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(application_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<NotePayload>,
) -> Result<(StatusCode, Json<DataEnvelope<Note>>), ApiError> {
    let note = state.notes.create(user.id(), application_id, payload).await?;
    Ok((StatusCode::CREATED, Json(DataEnvelope::new(note))))
}

#[utoipa::path(put, path = "/applications/{id}/notes/{note_id}", tag = "Notes",
    security(("bearer" = [])),
    params(
        ("id" = Uuid, Path, description = "Application id"),
        ("note_id" = Uuid, Path, description = "Note id")),
    request_body = NotePayload,
    responses(
        (status = 200, description = "Updated", body = crate::handlers::NoteEnvelope),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 404, description = "Note not found", body = crate::error::ErrorBody)))]
pub async fn update_note(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath((application_id, note_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<NotePayload>,
) -> Result<Json<DataEnvelope<Note>>, ApiError> {
    let note = state
        .notes
        .update(user.id(), application_id, note_id, payload)
        .await?;
    Ok(Json(DataEnvelope::new(note)))
}

#[utoipa::path(delete, path = "/applications/{id}/notes/{note_id}", tag = "Notes",
    security(("bearer" = [])),
    params(
        ("id" = Uuid, Path, description = "Application id"),
        ("note_id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Note not found", body = crate::error::ErrorBody)))]
pub async fn delete_note(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath((application_id, note_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.notes.delete(user.id(), application_id, note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
