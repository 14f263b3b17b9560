//! Ownership guard.
//!
//! Authorization in ApplyDiary has exactly one rule: the requester must own
//! the record. A mismatch is reported as [`Error::NotFound`], the same as a
//! record that does not exist, so callers cannot probe for other users' ids.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, ResourceKind, Result};
use crate::models::{Application, Document, Note};

/// A record owned by exactly one user and soft-deletable.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_live(&self) -> bool {
        self.deleted_at().is_none()
    }
}

impl Owned for Application {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl Owned for Note {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl Owned for Document {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// The single authorization predicate.
pub fn owner_matches<T: Owned + ?Sized>(entity: &T, requester: Uuid) -> bool {
    entity.owner_id() == requester
}

/// Turn a store lookup into a service result.
///
/// Absent, soft-deleted and foreign records all yield `NotFound(kind)`.
pub fn authorize<T: Owned>(found: Option<T>, requester: Uuid, kind: ResourceKind) -> Result<T> {
    match found {
        Some(entity) if owner_matches(&entity, requester) && entity.is_live() => Ok(entity),
        _ => Err(Error::NotFound(kind)),
    }
}
