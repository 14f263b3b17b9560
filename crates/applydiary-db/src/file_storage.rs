//! Filesystem blob storage for uploaded documents.
//!
//! Blobs are addressed by a flat key such as `0192b7c0-....pdf`, stored
//! directly under the base directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use applydiary_core::{BlobStorage, Error, Result};

/// Filesystem storage backend.
#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create the base directory if it does not exist.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Resolve a key to a path, refusing anything that could escape the
    /// base directory.
    fn full_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.starts_with('.')
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(Error::Internal(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl BlobStorage for FilesystemBackend {
    async fn write(&self, key: &str, data: &[u8]) -> Result<u64> {
        let full_path = self.full_path(key)?;
        debug!(
            subsystem = "db",
            component = "file_storage",
            op = "write",
            storage_key = %key,
            file_size = data.len(),
            "Writing blob"
        );

        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            warn!(base = %self.base_path.display(), error = %e, "file_storage: create_dir_all failed");
            e
        })?;

        // Atomic write: temp file + rename
        let temp_path = self
            .base_path
            .join(format!(".{}.{}.tmp", key, Uuid::new_v4().simple()));
        let result = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &full_path).await
        }
        .await;

        if let Err(e) = result {
            warn!(temp_path = %temp_path.display(), error = %e, "file_storage: write failed");
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        // Set permissions to 0644 (rw-r--r--, no execute)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(data.len() as u64)
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(key)?;
        Ok(fs::read(full_path).await?)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let full_path = self.full_path(key)?;
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let full_path = self.full_path(key)?;
        Ok(fs::try_exists(full_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path());

        let written = backend.write("abc.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(written, 8);
        assert!(backend.exists("abc.pdf").await.unwrap());
        assert_eq!(backend.read("abc.pdf").await.unwrap(), b"%PDF-1.4");

        backend.delete("abc.pdf").await.unwrap();
        assert!(!backend.exists("abc.pdf").await.unwrap());
        // Deleting a missing blob is not an error
        backend.delete("abc.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_creates_missing_base_dir() {
        let dir = tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path().join("nested").join("uploads"));
        backend.write("a.txt", b"hi").await.unwrap();
        assert!(backend.exists("a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path());
        backend.write("a.txt", b"one").await.unwrap();
        backend.write("a.txt", b"two").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["a.txt"]);
        assert_eq!(backend.read("a.txt").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let dir = tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path());
        for key in ["../escape.txt", "a/b.txt", "..", "", ".hidden", "a\\b"] {
            assert!(backend.write(key, b"x").await.is_err(), "key {:?}", key);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_written_files_are_not_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path());
        backend.write("a.bin", b"\x7FELF").await.unwrap();
        let mode = std::fs::metadata(dir.path().join("a.bin"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
