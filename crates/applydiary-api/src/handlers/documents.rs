//! Document handlers.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;
use utoipa::ToSchema;

use applydiary_core::defaults::FALLBACK_CONTENT_TYPE;
use applydiary_core::{Document, Error};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::handlers::DataEnvelope;
use crate::services::UploadedFile;
use crate::state::AppState;

pub const FILE_REQUIRED: &str = "File is required";

/// Multipart body of `POST /documents`. Documentation only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(get, path = "/documents", tag = "Documents",
    security(("bearer" = [])),
    responses((status = 200, description = "Documents, newest first", body = crate::handlers::DocumentListEnvelope)))]
pub async fn list_documents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DataEnvelope<Vec<Document>>>, ApiError> {
    let docs = state.documents.list(user.id()).await?;
    Ok(Json(DataEnvelope::new(docs)))
}

/// Upload a file.
///
/// # Multipart Fields
/// - `file`: the document (required, may be empty)
///
/// # Returns
/// - 201 Created with the document metadata
/// - 400 Bad Request if there is no `file` part
/// - 413 Payload Too Large if the file exceeds the upload limit
#[utoipa::path(post, path = "/documents", tag = "Documents",
    security(("bearer" = [])),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored", body = crate::handlers::DocumentEnvelope),
        (status = 400, description = "File is required", body = crate::error::ErrorBody),
        (status = 413, description = "File too large", body = crate::error::ErrorBody)))]
pub async fn upload_document(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<Document>>), ApiError> {
    let mut multipart =
        multipart.map_err(|_| ApiError::BadRequest(FILE_REQUIRED.to_string()))?;
    let limit = state.documents.max_upload_bytes();

    let mut upload = None;
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            let size = data.len() + chunk.len();
            if size > limit {
                return Err(Error::PayloadTooLarge { size, limit }.into());
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some(UploadedFile {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest(FILE_REQUIRED.to_string()))?;
    let doc = state.documents.upload(user.id(), upload).await?;
    Ok((StatusCode::CREATED, Json(DataEnvelope::new(doc))))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("File exceeds the maximum upload size".to_string())
    } else {
        ApiError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
    }
}

#[utoipa::path(delete, path = "/documents/{id}", tag = "Documents",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Document not found", body = crate::error::ErrorBody)))]
pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.documents.delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stream back the stored bytes as an attachment.
#[utoipa::path(get, path = "/documents/{id}/download", tag = "Documents",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "File contents"),
        (status = 404, description = "Document not found", body = crate::error::ErrorBody)))]
pub async fn download_document(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
    let (doc, data) = state.documents.download(user.id(), id).await?;

    let content_type = HeaderValue::from_str(&doc.file_type)
        .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    let disposition = HeaderValue::from_str(&content_disposition(&doc.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

/// `attachment; filename="..."` with an ASCII-only, quote-safe name.
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
