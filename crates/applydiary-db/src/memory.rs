//! In-memory resource store.
//!
//! Implements every repository trait with the same visibility and ownership
//! semantics as the PostgreSQL repositories:
//!
//! - Thread-safe concurrent access via a single `RwLock`
//! - Each mutation runs under one write guard, so it is atomic
//! - Rows are never removed; soft delete only sets `deleted_at`
//!
//! Used by the HTTP tests and for running the API without a database.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use applydiary_core::{
    Application, ApplicationFilter, ApplicationPatch, ApplicationRepository, ApplicationSort,
    Document, DocumentRepository, Error, NewApplication, NewDocument, NewUser, Note,
    NoteRepository, OwnerScope, Result, User, UserRepository,
};

use crate::Repositories;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    // Vec position doubles as insertion order for tie-breaking.
    applications: Vec<Application>,
    notes: Vec<Note>,
    documents: Vec<Document>,
}

impl Tables {
    fn live_owned_application(&self, owner: Uuid, id: Uuid) -> Option<&Application> {
        self.applications
            .iter()
            .find(|a| a.id == id && a.user_id == owner && a.deleted_at.is_none())
    }

    fn application_in_scope(&self, scope: OwnerScope, id: Uuid) -> Option<&Application> {
        self.applications
            .iter()
            .find(|a| a.id == id && scope.admits(a.user_id, a.deleted_at.is_some()))
    }

    /// Index of a live note whose live parent is owned by `owner`.
    fn live_note_index(&self, owner: Uuid, application_id: Uuid, note_id: Uuid) -> Option<usize> {
        self.live_owned_application(owner, application_id)?;
        self.notes.iter().position(|n| {
            n.id == note_id
                && n.application_id == application_id
                && n.user_id == owner
                && n.deleted_at.is_none()
        })
    }
}

/// Order two `(insertion index, application)` pairs for a listing.
fn compare_applications(
    sort: ApplicationSort,
    (ia, a): (usize, &Application),
    (ib, b): (usize, &Application),
) -> Ordering {
    let by_applied = b.applied_date.cmp(&a.applied_date).then(ib.cmp(&ia));
    match sort {
        ApplicationSort::AppliedDate => by_applied,
        ApplicationSort::Deadline => match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then(by_applied),
    }
}

/// In-memory implementation of all ApplyDiary repositories.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trait-object handles to this store, sharing the same tables.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            applications: Arc::new(self.clone()),
            notes: Arc::new(self.clone()),
            documents: Arc::new(self.clone()),
        }
    }

    /// Raw count of stored notes, tombstoned and orphaned included.
    pub async fn stored_note_count(&self) -> usize {
        self.tables.read().await.notes.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        let email = user.email.to_lowercase();
        if tables.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(Error::DuplicateEmail);
        }
        let user = User {
            id: Uuid::now_v7(),
            email,
            password_hash: user.password_hash,
            name: user.name,
            timezone: user.timezone,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.name = name.to_string();
            u.clone()
        }))
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn list(&self, scope: OwnerScope, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(usize, &Application)> = tables
            .applications
            .iter()
            .enumerate()
            .filter(|(_, a)| scope.admits(a.user_id, a.deleted_at.is_some()) && filter.matches(a))
            .collect();
        rows.sort_by(|a, b| compare_applications(filter.sort, *a, *b));
        Ok(rows.into_iter().map(|(_, a)| a.clone()).collect())
    }

    async fn fetch(&self, scope: OwnerScope, id: Uuid) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables.application_in_scope(scope, id).cloned())
    }

    async fn insert(&self, owner: Uuid, app: NewApplication) -> Result<Application> {
        let now = Utc::now();
        let app = Application {
            id: Uuid::now_v7(),
            user_id: owner,
            company: app.company,
            role: app.role,
            status: app.status,
            applied_date: app.applied_date,
            location: app.location,
            deadline: app.deadline,
            notes: app.notes,
            source: app.source,
            resume_url: app.resume_url,
            cover_url: app.cover_url,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().await.applications.push(app.clone());
        Ok(app)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner && a.deleted_at.is_none())
            .map(|a| {
                patch.apply_to(a);
                a.updated_at = Utc::now();
                a.clone()
            }))
    }

    async fn soft_delete(&self, owner: Uuid, id: Uuid) -> Result<Option<Application>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner && a.deleted_at.is_none())
            .map(|a| {
                a.deleted_at = Some(Utc::now());
                a.clone()
            }))
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn list_for_application(
        &self,
        scope: OwnerScope,
        application_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Option<Vec<Note>>> {
        let tables = self.tables.read().await;
        if tables.application_in_scope(scope, application_id).is_none() {
            return Ok(None);
        }

        let mut rows: Vec<(usize, &Note)> = tables
            .notes
            .iter()
            .enumerate()
            .filter(|(_, n)| {
                n.application_id == application_id
                    && scope.admits(n.user_id, n.deleted_at.is_some())
            })
            .collect();
        rows.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));

        let notes = rows
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(_, n)| n.clone())
            .collect();
        Ok(Some(notes))
    }

    async fn fetch(
        &self,
        scope: OwnerScope,
        application_id: Uuid,
        note_id: Uuid,
    ) -> Result<Option<Note>> {
        let tables = self.tables.read().await;
        let Some(parent) = tables
            .applications
            .iter()
            .find(|a| a.id == application_id && a.user_id == scope.owner)
        else {
            return Ok(None);
        };
        Ok(tables
            .notes
            .iter()
            .find(|n| {
                n.id == note_id
                    && n.application_id == application_id
                    && n.user_id == scope.owner
                    && (scope.visibility.include_deleted()
                        || (n.deleted_at.is_none() && parent.deleted_at.is_none()))
            })
            .cloned())
    }

    async fn insert(
        &self,
        owner: Uuid,
        application_id: Uuid,
        content: &str,
    ) -> Result<Option<Note>> {
        let mut tables = self.tables.write().await;
        if tables.live_owned_application(owner, application_id).is_none() {
            return Ok(None);
        }
        let now = Utc::now();
        let note = Note {
            id: Uuid::now_v7(),
            application_id,
            user_id: owner,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.notes.push(note.clone());
        Ok(Some(note))
    }

    async fn update(
        &self,
        owner: Uuid,
        application_id: Uuid,
        note_id: Uuid,
        content: &str,
    ) -> Result<Option<Note>> {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables.live_note_index(owner, application_id, note_id) else {
            return Ok(None);
        };
        let note = &mut tables.notes[idx];
        note.content = content.to_string();
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn soft_delete(
        &self,
        owner: Uuid,
        application_id: Uuid,
        note_id: Uuid,
    ) -> Result<Option<Note>> {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables.live_note_index(owner, application_id, note_id) else {
            return Ok(None);
        };
        let note = &mut tables.notes[idx];
        note.deleted_at = Some(Utc::now());
        Ok(Some(note.clone()))
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn list(&self, scope: OwnerScope) -> Result<Vec<Document>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(usize, &Document)> = tables
            .documents
            .iter()
            .enumerate()
            .filter(|(_, d)| scope.admits(d.user_id, d.deleted_at.is_some()))
            .collect();
        rows.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(rows.into_iter().map(|(_, d)| d.clone()).collect())
    }

    async fn fetch(&self, scope: OwnerScope, id: Uuid) -> Result<Option<Document>> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .find(|d| d.id == id && scope.admits(d.user_id, d.deleted_at.is_some()))
            .cloned())
    }

    async fn insert(&self, owner: Uuid, doc: NewDocument) -> Result<Document> {
        let doc = Document {
            id: Uuid::now_v7(),
            user_id: owner,
            file_name: doc.file_name,
            file_type: doc.file_type,
            file_size: doc.file_size,
            url: doc.url,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.tables.write().await.documents.push(doc.clone());
        Ok(doc)
    }

    async fn soft_delete(&self, owner: Uuid, id: Uuid) -> Result<Option<Document>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .documents
            .iter_mut()
            .find(|d| d.id == id && d.user_id == owner && d.deleted_at.is_none())
            .map(|d| {
                d.deleted_at = Some(Utc::now());
                d.clone()
            }))
    }
}
