//! Account handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use applydiary_core::validation::{LoginPayload, ProfilePayload, RegisterPayload};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::handlers::UserEnvelope;
use crate::services::AuthSession;
use crate::state::AppState;

/// Register an account and return a token for it.
#[utoipa::path(post, path = "/auth/register", tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Registered", body = AuthSession),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 409, description = "Email already registered", body = crate::error::ErrorBody)))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let session = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Exchange email and password for a token.
#[utoipa::path(post, path = "/auth/login", tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Signed in", body = AuthSession),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody)))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<Json<AuthSession>, ApiError> {
    Ok(Json(state.auth.login(payload).await?))
}

#[utoipa::path(get, path = "/auth/me", tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current profile", body = UserEnvelope),
        (status = 401, description = "Authentication required", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody)))]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state.auth.profile(user.id()).await?;
    Ok(Json(UserEnvelope { user }))
}

/// Change the display name.
#[utoipa::path(put, path = "/auth/me", tag = "Auth",
    security(("bearer" = [])),
    request_body = ProfilePayload,
    responses(
        (status = 200, description = "Updated profile", body = UserEnvelope),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 401, description = "Authentication required", body = crate::error::ErrorBody)))]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<ProfilePayload>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state.auth.update_profile(user.id(), payload).await?;
    Ok(Json(UserEnvelope { user }))
}
