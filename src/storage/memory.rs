use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::storage::blob::{BlobHandle, BlobStore};

/// Blob store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<BlobHandle, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, prefix: &str, bytes: &[u8]) -> AppResult<BlobHandle> {
        let handle = BlobHandle::generate(prefix)?;
        self.blobs.write().await.insert(handle.clone(), bytes.to_vec());
        Ok(handle)
    }

    async fn get(&self, handle: &BlobHandle) -> AppResult<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(handle).cloned())
    }

    async fn delete(&self, handle: &BlobHandle) -> AppResult<()> {
        self.blobs.write().await.remove(handle);
        Ok(())
    }
}
