use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("User id must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self) -> Option<UserId>;

    async fn sign_in(&self, user: UserId);

    async fn sign_out(&self);

    /// Signed-in user or `AppError::Unauthorized`
    async fn require_user(&self) -> AppResult<UserId> {
        self.current_user().await.ok_or(AppError::Unauthorized)
    }
}

/// In-process session holder
#[derive(Debug, Default)]
pub struct SessionAuth {
    current: RwLock<Option<UserId>>,
}

impl SessionAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserId) -> Self {
        Self {
            current: RwLock::new(Some(user)),
        }
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    async fn current_user(&self) -> Option<UserId> {
        self.current.read().await.clone()
    }

    async fn sign_in(&self, user: UserId) {
        info!("User {} signed in", user);
        *self.current.write().await = Some(user);
    }

    async fn sign_out(&self) {
        if let Some(user) = self.current.write().await.take() {
            info!("User {} signed out", user);
        }
    }
}
