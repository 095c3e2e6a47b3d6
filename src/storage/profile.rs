//! Profile Images
//!
//! Saves, loads and removes the signed-in user's profile photo. Reads never
//! fail from the caller's point of view: anything missing or unreadable
//! falls back to the default avatar.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::services::auth::UserId;
use crate::services::user::UserStore;
use crate::storage::blob::{BlobHandle, BlobStore};

const PROFILE_BLOB_PREFIX: &str = "profile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileImage {
    Custom { bytes: Vec<u8>, etag: String },
    Default,
}

impl ProfileImage {
    pub fn is_default(&self) -> bool {
        matches!(self, ProfileImage::Default)
    }
}

pub fn content_etag(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub struct ProfileImageManager {
    blobs: Arc<dyn BlobStore>,
    users: Arc<dyn UserStore>,
    max_image_bytes: usize,
}

impl ProfileImageManager {
    pub fn new(blobs: Arc<dyn BlobStore>, users: Arc<dyn UserStore>, max_image_bytes: usize) -> Self {
        Self {
            blobs,
            users,
            max_image_bytes,
        }
    }

    /// Store a newly picked image and make it the user's profile photo
    pub async fn save(&self, user: &UserId, bytes: &[u8]) -> AppResult<BlobHandle> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Image is empty".to_string()));
        }
        if bytes.len() > self.max_image_bytes {
            return Err(AppError::image_too_large(bytes.len(), self.max_image_bytes));
        }

        let handle = self.blobs.put(PROFILE_BLOB_PREFIX, bytes).await?;
        let previous = match self.users.set_profile_image(user, Some(handle.clone())).await {
            Ok(previous) => previous,
            Err(e) => {
                // Don't leave an orphan behind when the user record can't be updated.
                if let Err(cleanup) = self.blobs.delete(&handle).await {
                    warn!("Failed to clean up unreferenced blob {}: {}", handle, cleanup);
                }
                return Err(e);
            }
        };

        if let Some(previous) = previous.filter(|p| *p != handle) {
            if let Err(e) = self.blobs.delete(&previous).await {
                warn!("Failed to delete previous profile image {}: {}", previous, e);
            }
        }

        info!("Saved profile image {} for {} ({} bytes)", handle, user, bytes.len());
        Ok(handle)
    }

    pub async fn load(&self, user: &UserId) -> ProfileImage {
        let Some(profile) = self.users.profile(user).await else {
            debug!("No profile for {}, using default avatar", user);
            return ProfileImage::Default;
        };
        let Some(handle) = profile.profile_image else {
            return ProfileImage::Default;
        };

        match self.blobs.get(&handle).await {
            Ok(Some(bytes)) => {
                let etag = content_etag(&bytes);
                ProfileImage::Custom { bytes, etag }
            }
            Ok(None) => {
                warn!("Profile image {} for {} is missing, using default avatar", handle, user);
                ProfileImage::Default
            }
            Err(e) => {
                warn!("Failed to read profile image {} for {}: {}", handle, user, e);
                ProfileImage::Default
            }
        }
    }

    /// Clear the user's profile photo. Storage failures are logged and ignored.
    pub async fn remove(&self, user: &UserId) -> AppResult<()> {
        let previous = self.users.set_profile_image(user, None).await?;
        if let Some(handle) = previous {
            match self.blobs.delete(&handle).await {
                Ok(()) => info!("Removed profile image {} for {}", handle, user),
                Err(e) => warn!("Failed to delete profile image {} for {}: {}", handle, user, e),
            }
        }
        Ok(())
    }
}
