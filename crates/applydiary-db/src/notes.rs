//! Note repository implementation.
//!
//! Every statement joins the parent application and requires it to be live
//! and owned by the requester. Notes under a tombstoned parent stay in the
//! table but no statement here can reach them.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use applydiary_core::{Error, Note, NoteRepository, OwnerScope, Result};

const NOTE_COLUMNS: &str =
    "n.id, n.application_id, n.user_id, n.content, n.created_at, n.updated_at, n.deleted_at";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_note(row: &PgRow) -> Result<Note> {
        Ok(Note {
            id: row.try_get("id").map_err(Error::Database)?,
            application_id: row.try_get("application_id").map_err(Error::Database)?,
            user_id: row.try_get("user_id").map_err(Error::Database)?,
            content: row.try_get("content").map_err(Error::Database)?,
            created_at: row.try_get("created_at").map_err(Error::Database)?,
            updated_at: row.try_get("updated_at").map_err(Error::Database)?,
            deleted_at: row.try_get("deleted_at").map_err(Error::Database)?,
        })
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list_for_application(
        &self,
        scope: OwnerScope,
        application_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Option<Vec<Note>>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let parent_visible: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM application
                 WHERE id = $1 AND user_id = $2 AND ($3 OR deleted_at IS NULL))",
        )
        .bind(application_id)
        .bind(scope.owner)
        .bind(scope.visibility.include_deleted())
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if !parent_visible {
            tx.commit().await.map_err(Error::Database)?;
            return Ok(None);
        }

        let query = format!(
            "SELECT {} FROM note n
             WHERE n.application_id = $1 AND n.user_id = $2 AND ($3 OR n.deleted_at IS NULL)
             ORDER BY n.created_at DESC, n.id DESC
             LIMIT $4",
            NOTE_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(application_id)
            .bind(scope.owner)
            .bind(scope.visibility.include_deleted())
            .bind(limit.map(|n| n as i64))
            .fetch_all(&mut *tx)
            .await
            .map_err(Error::Database)?;
        tx.commit().await.map_err(Error::Database)?;

        let notes = rows
            .iter()
            .map(Self::row_to_note)
            .collect::<Result<Vec<_>>>()?;
        debug!(
            subsystem = "db",
            component = "notes",
            op = "list",
            application_id = %application_id,
            result_count = notes.len(),
            "Listed notes"
        );
        Ok(Some(notes))
    }

    async fn fetch(
        &self,
        scope: OwnerScope,
        application_id: Uuid,
        note_id: Uuid,
    ) -> Result<Option<Note>> {
        let query = format!(
            "SELECT {} FROM note n
             JOIN application a ON a.id = n.application_id AND a.user_id = n.user_id
             WHERE n.id = $1 AND n.application_id = $2 AND n.user_id = $3
               AND ($4 OR (n.deleted_at IS NULL AND a.deleted_at IS NULL))",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(note_id)
            .bind(application_id)
            .bind(scope.owner)
            .bind(scope.visibility.include_deleted())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_note).transpose()
    }

    async fn insert(
        &self,
        owner: Uuid,
        application_id: Uuid,
        content: &str,
    ) -> Result<Option<Note>> {
        let query = format!(
            "INSERT INTO note AS n (id, application_id, user_id, content, created_at, updated_at)
             SELECT $1, a.id, a.user_id, $4, now(), now()
             FROM application a
             WHERE a.id = $2 AND a.user_id = $3 AND a.deleted_at IS NULL
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::now_v7())
            .bind(application_id)
            .bind(owner)
            .bind(content)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_note).transpose()
    }

    async fn update(
        &self,
        owner: Uuid,
        application_id: Uuid,
        note_id: Uuid,
        content: &str,
    ) -> Result<Option<Note>> {
        let query = format!(
            "UPDATE note n SET content = $4, updated_at = now()
             FROM application a
             WHERE n.id = $1 AND n.application_id = $2 AND n.user_id = $3
               AND n.deleted_at IS NULL
               AND a.id = n.application_id AND a.user_id = n.user_id AND a.deleted_at IS NULL
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(note_id)
            .bind(application_id)
            .bind(owner)
            .bind(content)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_note).transpose()
    }

    async fn soft_delete(
        &self,
        owner: Uuid,
        application_id: Uuid,
        note_id: Uuid,
    ) -> Result<Option<Note>> {
        let query = format!(
            "UPDATE note n SET deleted_at = now()
             FROM application a
             WHERE n.id = $1 AND n.application_id = $2 AND n.user_id = $3
               AND n.deleted_at IS NULL
               AND a.id = n.application_id AND a.user_id = n.user_id AND a.deleted_at IS NULL
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(note_id)
            .bind(application_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_note).transpose()
    }
}
