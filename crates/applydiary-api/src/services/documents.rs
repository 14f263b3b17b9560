//! Document uploads.
//!
//! Bytes go to [`BlobStorage`] under a generated key; the metadata row
//! records the sanitized original name and a `/uploads/<key>` locator.
//! Soft deletion only tombstones the row. The blob is retained.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use applydiary_core::defaults::UPLOAD_URL_PREFIX;
use applydiary_core::{
    authorize, detect_content_type, sanitize_filename, storage_extension, BlobStorage, Document,
    DocumentRepository, Error, NewDocument, OwnerScope, ResourceKind, Result,
};

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// MIME type declared by the client, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentRepository>,
    blobs: Arc<dyn BlobStorage>,
    max_upload_bytes: usize,
}

impl DocumentService {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        blobs: Arc<dyn BlobStorage>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            documents,
            blobs,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Documents of the owner, newest first.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Document>> {
        self.documents.list(OwnerScope::live(owner)).await
    }

    /// Store an upload and record its metadata.
    pub async fn upload(&self, owner: Uuid, file: UploadedFile) -> Result<Document> {
        let size = file.data.len();
        if size > self.max_upload_bytes {
            return Err(Error::PayloadTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let file_name = sanitize_filename(&file.file_name);
        let file_type = detect_content_type(&file.data, file.content_type.as_deref());
        let key = format!("{}{}", Uuid::now_v7(), storage_extension(&file_name));

        self.blobs.write(&key, &file.data).await?;

        let inserted = self
            .documents
            .insert(
                owner,
                NewDocument {
                    file_name,
                    file_type,
                    file_size: size as i64,
                    url: format!("{}/{}", UPLOAD_URL_PREFIX, key),
                },
            )
            .await;

        match inserted {
            Ok(doc) => {
                info!(
                    subsystem = "api",
                    component = "documents",
                    op = "upload",
                    user_id = %owner,
                    document_id = %doc.id,
                    file_size = size,
                    "Document stored"
                );
                Ok(doc)
            }
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&key).await {
                    warn!(
                        subsystem = "api",
                        component = "documents",
                        storage_key = %key,
                        error = %cleanup,
                        "Failed to remove blob after metadata insert failed"
                    );
                }
                Err(e)
            }
        }
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()> {
        self.documents
            .soft_delete(owner, id)
            .await?
            .map(|_| ())
            .ok_or(Error::NotFound(ResourceKind::Document))
    }

    /// Metadata and bytes of an owned, live document.
    pub async fn download(&self, owner: Uuid, id: Uuid) -> Result<(Document, Vec<u8>)> {
        let found = self.documents.fetch(OwnerScope::live(owner), id).await?;
        let doc = authorize(found, owner, ResourceKind::Document)?;

        let key = blob_key(&doc.url)
            .ok_or_else(|| Error::Internal(format!("Unexpected document locator: {}", doc.url)))?;
        let data = match self.blobs.read(key).await {
            Ok(data) => data,
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    subsystem = "api",
                    component = "documents",
                    document_id = %doc.id,
                    "Blob missing for live document"
                );
                return Err(Error::NotFound(ResourceKind::Document));
            }
            Err(e) => return Err(e),
        };
        debug!(
            subsystem = "api",
            component = "documents",
            op = "download",
            document_id = %doc.id,
            file_size = data.len(),
            "Document read"
        );
        Ok((doc, data))
    }
}

/// Storage key of a `/uploads/<key>` locator.
fn blob_key(url: &str) -> Option<&str> {
    url.strip_prefix(UPLOAD_URL_PREFIX)?
        .strip_prefix('/')
        .filter(|key| !key.is_empty())
}
