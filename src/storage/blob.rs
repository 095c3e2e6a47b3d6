//! Blob Store
//!
//! Named-blob storage used for binary user content such as profile photos.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, AppResult};

/// Opaque name of a stored blob. Restricted to `[A-Za-z0-9_-]` so it is
/// always safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobHandle(String);

impl BlobHandle {
    pub fn parse(raw: &str) -> AppResult<Self> {
        if is_safe_handle(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::invalid_blob_handle(raw))
        }
    }

    /// Fresh handle with a readable prefix, e.g. `profile_3f0c…`
    pub fn generate(prefix: &str) -> AppResult<Self> {
        Self::parse(&format!("{}_{}", prefix, uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_safe_handle(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= 128
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl TryFrom<String> for BlobHandle {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BlobHandle> for String {
    fn from(handle: BlobHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a newly generated handle
    async fn put(&self, prefix: &str, bytes: &[u8]) -> AppResult<BlobHandle>;

    /// Read a blob back; a missing blob is `Ok(None)`
    async fn get(&self, handle: &BlobHandle) -> AppResult<Option<Vec<u8>>>;

    /// Remove a blob; removing a missing blob succeeds
    async fn delete(&self, handle: &BlobHandle) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_validation() {
        assert!(BlobHandle::parse("profile_abc-123").is_ok());
        assert!(BlobHandle::parse("").is_err());
        assert!(BlobHandle::parse("../etc/passwd").is_err());
        assert!(BlobHandle::parse("a/b").is_err());
        assert!(BlobHandle::parse(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_generated_handles_are_unique_and_prefixed() {
        let a = BlobHandle::generate("profile").unwrap();
        let b = BlobHandle::generate("profile").unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("profile_"));
    }

    #[test]
    fn test_deserialize_rejects_unsafe_handle() {
        assert!(serde_json::from_str::<BlobHandle>("\"ok_handle\"").is_ok());
        assert!(serde_json::from_str::<BlobHandle>("\"../nope\"").is_err());
    }
}
