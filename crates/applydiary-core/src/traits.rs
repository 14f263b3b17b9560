//! Core traits for ApplyDiary abstractions.
//!
//! Repositories never decide ownership on their own: every query over an
//! owned entity receives the requester explicitly, and every read takes a
//! [`Visibility`] so the tombstone filter is visible at the call site.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// SCOPING
// =============================================================================

/// Which rows a read may see with respect to soft deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// `deleted_at IS NULL` only. Every service operation uses this.
    #[default]
    Live,
    /// Tombstoned rows too. Reserved for audit reads.
    IncludeDeleted,
}

impl Visibility {
    pub fn include_deleted(&self) -> bool {
        matches!(self, Visibility::IncludeDeleted)
    }
}

/// The requester on whose behalf a query runs, plus the tombstone filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    pub owner: Uuid,
    pub visibility: Visibility,
}

impl OwnerScope {
    /// Live rows owned by `owner`.
    pub fn live(owner: Uuid) -> Self {
        Self {
            owner,
            visibility: Visibility::Live,
        }
    }

    /// All rows owned by `owner`, tombstones included.
    pub fn include_deleted(owner: Uuid) -> Self {
        Self {
            owner,
            visibility: Visibility::IncludeDeleted,
        }
    }

    /// Whether a row with this owner and tombstone is inside the scope.
    pub fn admits(&self, owner: Uuid, deleted: bool) -> bool {
        owner == self.owner && (!deleted || self.visibility.include_deleted())
    }
}

// =============================================================================
// REPOSITORIES
// =============================================================================

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` when the lowercased
    /// email is taken.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn fetch(&self, id: Uuid) -> Result<Option<User>>;

    /// Update the display name, returning the updated row.
    async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<User>>;
}

/// Repository for job applications.
///
/// `None` from a mutation means no live application with that id is owned
/// by the requester.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn list(&self, scope: OwnerScope, filter: &ApplicationFilter) -> Result<Vec<Application>>;

    async fn fetch(&self, scope: OwnerScope, id: Uuid) -> Result<Option<Application>>;

    async fn insert(&self, owner: Uuid, app: NewApplication) -> Result<Application>;

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> Result<Option<Application>>;

    /// Set `deleted_at` on a live owned application.
    async fn soft_delete(&self, owner: Uuid, id: Uuid) -> Result<Option<Application>>;
}

/// Repository for notes scoped to a parent application.
///
/// Every operation requires the parent to be owned by the requester and
/// live. Notes under a tombstoned parent are kept but unreachable.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Notes of an application, newest first, truncated to `limit`.
    ///
    /// Returns `None` when the parent application is not in scope.
    async fn list_for_application(
        &self,
        scope: OwnerScope,
        application_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Option<Vec<Note>>>;

    /// Single note by its full path. Services never read one note on its
    /// own; this exists for `Visibility::IncludeDeleted` audit reads.
    async fn fetch(
        &self,
        scope: OwnerScope,
        application_id: Uuid,
        note_id: Uuid,
    ) -> Result<Option<Note>>;

    /// Returns `None` when the parent application is not live and owned.
    async fn insert(&self, owner: Uuid, application_id: Uuid, content: &str)
        -> Result<Option<Note>>;

    async fn update(
        &self,
        owner: Uuid,
        application_id: Uuid,
        note_id: Uuid,
        content: &str,
    ) -> Result<Option<Note>>;

    async fn soft_delete(
        &self,
        owner: Uuid,
        application_id: Uuid,
        note_id: Uuid,
    ) -> Result<Option<Note>>;
}

/// Repository for document metadata.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, scope: OwnerScope) -> Result<Vec<Document>>;

    async fn fetch(&self, scope: OwnerScope, id: Uuid) -> Result<Option<Document>>;

    async fn insert(&self, owner: Uuid, doc: NewDocument) -> Result<Document>;

    async fn soft_delete(&self, owner: Uuid, id: Uuid) -> Result<Option<Document>>;
}

// =============================================================================
// BLOB STORAGE
// =============================================================================

/// Byte storage for uploaded documents, addressed by a relative key.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Write data under `key`. Returns the number of bytes written.
    async fn write(&self, key: &str, data: &[u8]) -> Result<u64>;

    async fn read(&self, key: &str) -> Result<Vec<u8>>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;
}

// =============================================================================
// GENERATION
// =============================================================================

/// Backend for text generation.
///
/// Implementations report provider throttling as `Error::QuotaExceeded` and
/// any other provider failure as `Error::Upstream`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a response given system instructions and a user prompt.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
