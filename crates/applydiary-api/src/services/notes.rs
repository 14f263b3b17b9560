//! Notes nested under an application.
//!
//! A note is reachable only through a live parent owned by the requester.
//! Listing and creation report a bad parent as `Application not found`;
//! update and delete report `Note not found`.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use applydiary_core::validation::NotePayload;
use applydiary_core::{Error, Note, NoteRepository, OwnerScope, ResourceKind, Result};

#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    /// Notes of an application, newest first.
    pub async fn list(&self, owner: Uuid, application_id: Uuid) -> Result<Vec<Note>> {
        let notes = self
            .notes
            .list_for_application(OwnerScope::live(owner), application_id, None)
            .await?
            .ok_or(Error::NotFound(ResourceKind::Application))?;
        debug!(
            subsystem = "api",
            component = "notes",
            op = "list",
            application_id = %application_id,
            result_count = notes.len(),
            "Listed notes"
        );
        Ok(notes)
    }

    pub async fn create(&self, owner: Uuid, application_id: Uuid, payload: NotePayload) -> Result<Note> {
        let content = payload.validate()?;
        self.notes
            .insert(owner, application_id, &content)
            .await?
            .ok_or(Error::NotFound(ResourceKind::Application))
    }

    pub async fn update(
        &self,
        owner: Uuid,
        application_id: Uuid,
        note_id: Uuid,
        payload: NotePayload,
    ) -> Result<Note> {
        let content = payload.validate()?;
        self.notes
            .update(owner, application_id, note_id, &content)
            .await?
            .ok_or(Error::NotFound(ResourceKind::Note))
    }

    pub async fn delete(&self, owner: Uuid, application_id: Uuid, note_id: Uuid) -> Result<()> {
        self.notes
            .soft_delete(owner, application_id, note_id)
            .await?
            .map(|_| ())
            .ok_or(Error::NotFound(ResourceKind::Note))
    }
}
