//! Follow-up email drafts.
//!
//! Builds a compact context from an owned application, the applicant's
//! name and the most recent notes, then asks the generation backend for a
//! subject line and body.

use std::sync::Arc;
use std::time::Instant;

use chrono::SecondsFormat;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use applydiary_core::defaults::{FOLLOWUP_FALLBACK_NAME, FOLLOWUP_NOTE_COUNT};
use applydiary_core::validation::FollowupPayload;
use applydiary_core::{
    authorize, Application, ApplicationRepository, Error, GenerationBackend, NoteRepository,
    OwnerScope, ResourceKind, Result, UserRepository,
};

pub const SYSTEM_INSTRUCTIONS: &str = "You draft concise, polite follow-up emails for job applications. \
Provide a subject line and body. Use the applicant name and applied date when available.";

const PROMPT_PREAMBLE: &str =
    "Draft a professional follow-up email. Include a short subject line and a clear body.";

/// Facts handed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupContext {
    pub user_name: String,
    pub company: String,
    pub role: String,
    pub status: String,
    pub applied_date: String,
    pub location: String,
    pub notes: Vec<String>,
}

impl FollowupContext {
    pub fn new(user_name: Option<String>, app: &Application, notes: Vec<String>) -> Self {
        let user_name = user_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| FOLLOWUP_FALLBACK_NAME.to_string());
        Self {
            user_name,
            company: app.company.clone(),
            role: app.role.clone(),
            status: app.status.to_string(),
            applied_date: app.applied_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            location: app.location.to_string(),
            notes,
        }
    }

    pub fn prompt(&self) -> Result<String> {
        Ok(format!(
            "{}\n\nContext: {}",
            PROMPT_PREAMBLE,
            serde_json::to_string(self)?
        ))
    }
}

#[derive(Clone)]
pub struct FollowupService {
    users: Arc<dyn UserRepository>,
    applications: Arc<dyn ApplicationRepository>,
    notes: Arc<dyn NoteRepository>,
    generator: Option<Arc<dyn GenerationBackend>>,
}

impl FollowupService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        applications: Arc<dyn ApplicationRepository>,
        notes: Arc<dyn NoteRepository>,
        generator: Option<Arc<dyn GenerationBackend>>,
    ) -> Self {
        Self {
            users,
            applications,
            notes,
            generator,
        }
    }

    /// Draft a follow-up for one of the owner's applications.
    ///
    /// An unconfigured backend fails before any lookup. A foreign or
    /// deleted application never reaches the backend.
    pub async fn draft(&self, owner: Uuid, payload: FollowupPayload) -> Result<String> {
        let application_id = payload.validate()?;
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| Error::ServiceUnavailable("no generation backend configured".to_string()))?;

        let found = self
            .applications
            .fetch(OwnerScope::live(owner), application_id)
            .await?;
        let app = authorize(found, owner, ResourceKind::Application)?;

        let user_name = self.users.fetch(owner).await?.map(|u| u.name);
        let notes = self
            .notes
            .list_for_application(OwnerScope::live(owner), app.id, Some(FOLLOWUP_NOTE_COUNT))
            .await?
            .ok_or(Error::NotFound(ResourceKind::Application))?
            .into_iter()
            .map(|n| n.content)
            .collect();

        let prompt = FollowupContext::new(user_name, &app, notes).prompt()?;

        let start = Instant::now();
        let draft = generator
            .generate_with_system(SYSTEM_INSTRUCTIONS, &prompt)
            .await?;
        info!(
            subsystem = "api",
            component = "followup",
            op = "draft",
            application_id = %app.id,
            model = generator.model_name(),
            prompt_len = prompt.len(),
            response_len = draft.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Follow-up drafted"
        );
        Ok(draft.trim().to_string())
    }
}
