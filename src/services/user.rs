use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::auth::UserId;
use crate::storage::BlobHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub profile_image: Option<BlobHandle>,
}

impl UserProfile {
    pub fn new(id: UserId, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            profile_image: None,
        }
    }

    /// First word of the display name, used for greetings
    pub fn first_name(&self) -> Option<&str> {
        self.display_name.split_whitespace().next()
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn profile(&self, user: &UserId) -> Option<UserProfile>;

    async fn upsert(&self, profile: UserProfile);

    /// Replace the stored image handle, returning the previous one
    async fn set_profile_image(
        &self,
        user: &UserId,
        handle: Option<BlobHandle>,
    ) -> AppResult<Option<BlobHandle>>;
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn profile(&self, user: &UserId) -> Option<UserProfile> {
        self.profiles.read().await.get(user).cloned()
    }

    async fn upsert(&self, profile: UserProfile) {
        debug!("Storing profile for {}", profile.id);
        self.profiles.write().await.insert(profile.id.clone(), profile);
    }

    async fn set_profile_image(
        &self,
        user: &UserId,
        handle: Option<BlobHandle>,
    ) -> AppResult<Option<BlobHandle>> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user)
            .ok_or_else(|| AppError::Validation(format!("Unknown user: {}", user)))?;
        Ok(std::mem::replace(&mut profile.profile_image, handle))
    }
}
