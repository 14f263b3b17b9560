//! Follow-up draft handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use applydiary_core::validation::FollowupPayload;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftResponse {
    pub draft: String,
}

/// Draft a follow-up email for one of the caller's applications.
#[utoipa::path(post, path = "/ai/followup-email", tag = "AI",
    security(("bearer" = [])),
    request_body = FollowupPayload,
    responses(
        (status = 200, description = "Draft", body = DraftResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorBody),
        (status = 404, description = "Application not found", body = crate::error::ErrorBody),
        (status = 429, description = "Provider quota exceeded", body = crate::error::ErrorBody),
        (status = 500, description = "Generation failed or not configured", body = crate::error::ErrorBody)))]
pub async fn followup_email(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<FollowupPayload>,
) -> Result<Json<DraftResponse>, ApiError> {
    let draft = state.followup.draft(user.id(), payload).await?;
    Ok(Json(DraftResponse { draft }))
}
