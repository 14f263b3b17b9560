//! Document metadata repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use applydiary_core::{Document, DocumentRepository, Error, NewDocument, OwnerScope, Result};

const DOCUMENT_COLUMNS: &str =
    "id, user_id, file_name, file_type, file_size, url, created_at, deleted_at";

/// PostgreSQL implementation of DocumentRepository.
#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

impl PgDocumentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_document(row: &PgRow) -> Result<Document> {
        Ok(Document {
            id: row.try_get("id").map_err(Error::Database)?,
            user_id: row.try_get("user_id").map_err(Error::Database)?,
            file_name: row.try_get("file_name").map_err(Error::Database)?,
            file_type: row.try_get("file_type").map_err(Error::Database)?,
            file_size: row.try_get("file_size").map_err(Error::Database)?,
            url: row.try_get("url").map_err(Error::Database)?,
            created_at: row.try_get("created_at").map_err(Error::Database)?,
            deleted_at: row.try_get("deleted_at").map_err(Error::Database)?,
        })
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn list(&self, scope: OwnerScope) -> Result<Vec<Document>> {
        let query = format!(
            "SELECT {} FROM document
             WHERE user_id = $1 AND ($2 OR deleted_at IS NULL)
             ORDER BY created_at DESC, id DESC",
            DOCUMENT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(scope.owner)
            .bind(scope.visibility.include_deleted())
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        rows.iter().map(Self::row_to_document).collect()
    }

    async fn fetch(&self, scope: OwnerScope, id: Uuid) -> Result<Option<Document>> {
        let query = format!(
            "SELECT {} FROM document
             WHERE id = $1 AND user_id = $2 AND ($3 OR deleted_at IS NULL)",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(scope.owner)
            .bind(scope.visibility.include_deleted())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn insert(&self, owner: Uuid, doc: NewDocument) -> Result<Document> {
        let query = format!(
            "INSERT INTO document (id, user_id, file_name, file_type, file_size, url, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, now())
             RETURNING {}",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::now_v7())
            .bind(owner)
            .bind(&doc.file_name)
            .bind(&doc.file_type)
            .bind(doc.file_size)
            .bind(&doc.url)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Self::row_to_document(&row)
    }

    async fn soft_delete(&self, owner: Uuid, id: Uuid) -> Result<Option<Document>> {
        let query = format!(
            "UPDATE document SET deleted_at = now()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {}",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(Self::row_to_document).transpose()
    }
}
