//! Application handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use applydiary_core::validation::ApplicationPayload;
use applydiary_core::Application;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::handlers::DataEnvelope;
use crate::services::ListApplicationsQuery;
use crate::state::AppState;

/// List the caller's applications.
///
/// # Query Parameters
/// - `status`: exact status match (optional)
/// - `search`: case-insensitive substring of company or role (optional)
/// - `sort`: `appliedDate` (default) or `deadline`
#[utoipa::path(get, path = "/applications", tag = "Applications",
    security(("bearer" = [])),
    params(ListApplicationsQuery),
    responses(
        (status = 200, description = "Applications", body = crate::handlers::ApplicationListEnvelope),
        (status = 400, description = "Invalid status filter", body = crate::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::error::ErrorBody)))]
pub async fn list_applications(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ListApplicationsQuery>,
) -> Result<Json<DataEnvelope<Vec<Application>>>, ApiError> {
    let apps = state.applications.list(user.id(), query).await?;
    Ok(Json(DataEnvelope::new(apps)))
}

#[utoipa::path(post, path = "/applications", tag = "Applications",
    security(("bearer" = [])),
    request_body = ApplicationPayload,
    responses(
        (status = 201, description = "Created", body = crate::handlers::ApplicationEnvelope),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody)))]
pub async fn create_application(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<ApplicationPayload>,
) -> Result<(StatusCode, Json<DataEnvelope<Application>>), ApiError> {
    let app = state.applications.create(user.id(), payload).await?;
    Ok((StatusCode::CREATED, Json(DataEnvelope::new(app))))
}

/// Partially update an application. `null` clears nullable fields.
#[utoipa::path(put, path = "/applications/{id}", tag = "Applications",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = ApplicationPayload,
    responses(
        (status = 200, description = "Updated", body = crate::handlers::ApplicationEnvelope),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 404, description = "Application not found", body = crate::error::ErrorBody)))]
pub async fn update_application(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ApplicationPayload>,
) -> Result<Json<DataEnvelope<Application>>, ApiError> {
    let app = state.applications.update(user.id(), id, payload).await?;
    Ok(Json(DataEnvelope::new(app)))
}

#[utoipa::path(delete, path = "/applications/{id}", tag = "Applications",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Application not found", body = crate::error::ErrorBody)))]
pub async fn delete_application(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.applications.delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
