//! OpenAPI document, served at `/openapi.json`.

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use applydiary_core::validation::{
    ApplicationPayload, FollowupPayload, LoginPayload, NotePayload, ProfilePayload,
    RegisterPayload,
};
use applydiary_core::{Application, ApplicationStatus, Document, FieldIssue, Location, Note, UserProfile};

use crate::error::ErrorBody;
use crate::handlers::{
    self, ApplicationEnvelope, ApplicationListEnvelope, DocumentEnvelope, DocumentListEnvelope,
    NoteEnvelope, NoteListEnvelope, UserEnvelope,
};
use crate::handlers::documents::UploadForm;
use crate::handlers::followup::DraftResponse;
use crate::handlers::health::HealthResponse;
use crate::services::AuthSession;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ApplyDiary API",
        description = "Job application tracker: applications, notes, documents and follow-up drafts"
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::update_me,
        handlers::applications::list_applications,
        handlers::applications::create_application,
        handlers::applications::update_application,
        handlers::applications::delete_application,
        handlers::notes::list_notes,
        handlers::notes::create_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,
        handlers::documents::list_documents,
        handlers::documents::upload_document,
        handlers::documents::delete_document,
        handlers::documents::download_document,
        handlers::followup::followup_email,
    ),
    components(schemas(
        Application,
        ApplicationStatus,
        Location,
        Note,
        Document,
        UserProfile,
        FieldIssue,
        ErrorBody,
        AuthSession,
        UserEnvelope,
        ApplicationEnvelope,
        ApplicationListEnvelope,
        NoteEnvelope,
        NoteListEnvelope,
        DocumentEnvelope,
        DocumentListEnvelope,
        DraftResponse,
        HealthResponse,
        UploadForm,
        RegisterPayload,
        LoginPayload,
        ProfilePayload,
        ApplicationPayload,
        NotePayload,
        FollowupPayload,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "System", description = "Health checks"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Applications", description = "Job application tracking"),
        (name = "Notes", description = "Notes attached to an application"),
        (name = "Documents", description = "Uploaded attachments"),
        (name = "AI", description = "Follow-up email drafts")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/health",
            "/auth/register",
            "/auth/login",
            "/auth/me",
            "/applications",
            "/applications/{id}",
            "/applications/{id}/notes",
            "/applications/{id}/notes/{note_id}",
            "/documents",
            "/documents/{id}",
            "/documents/{id}/download",
            "/ai/followup-email",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}
