use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::storage::blob::{BlobHandle, BlobStore};

const BLOB_EXTENSION: &str = "blob";

/// One file per blob inside an application-private directory
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    base_path: PathBuf,
}

impl FileBlobStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Create the storage directory if needed
    pub async fn initialize(&self) -> AppResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            AppError::FileIo(format!(
                "Failed to create blob directory {:?}: {}",
                self.base_path, e
            ))
        })?;
        info!("Blob store ready at {:?}", self.base_path);
        Ok(())
    }

    fn blob_path(&self, handle: &BlobHandle) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", handle.as_str(), BLOB_EXTENSION))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn put(&self, prefix: &str, bytes: &[u8]) -> AppResult<BlobHandle> {
        let handle = BlobHandle::generate(prefix)?;
        let path = self.blob_path(&handle);

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| AppError::FileIo(format!("Failed to create {:?}: {}", path, e)))?;
        file.write_all(bytes)
            .await
            .map_err(|e| AppError::FileIo(format!("Failed to write {:?}: {}", path, e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::FileIo(format!("Failed to flush {:?}: {}", path, e)))?;

        debug!("Stored blob {} ({} bytes)", handle, bytes.len());
        Ok(handle)
    }

    async fn get(&self, handle: &BlobHandle) -> AppResult<Option<Vec<u8>>> {
        let path = self.blob_path(handle);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::FileIo(format!("Failed to read {:?}: {}", path, e))),
        }
    }

    async fn delete(&self, handle: &BlobHandle) -> AppResult<()> {
        let path = self.blob_path(handle);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted blob {}", handle);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::FileIo(format!("Failed to delete {:?}: {}", path, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (TempDir, FileBlobStore) {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path().join("blobs"));
        store.initialize().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let (_dir, store) = store().await;

        let handle = store.put("profile", b"\x89PNG fake").await.unwrap();
        assert!(store.blob_path(&handle).exists());
        assert_eq!(store.get(&handle).await.unwrap().unwrap(), b"\x89PNG fake");

        store.delete(&handle).await.unwrap();
        assert!(store.get(&handle).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let (_dir, store) = store().await;
        let handle = BlobHandle::parse("never_written").unwrap();
        assert!(store.delete(&handle).await.is_ok());
    }

    #[tokio::test]
    async fn test_put_without_directory_fails_with_file_io() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path().join("missing"));
        assert!(matches!(
            store.put("profile", b"data").await,
            Err(AppError::FileIo(_))
        ));
    }
}
