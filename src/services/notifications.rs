//! Notification Gateway
//!
//! Boundary to the platform's push-notification permission APIs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundRefreshStatus {
    Available,
    Denied,
    Restricted,
    Unknown,
}

impl fmt::Display for BackgroundRefreshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackgroundRefreshStatus::Available => "Available",
            BackgroundRefreshStatus::Denied => "Denied",
            BackgroundRefreshStatus::Restricted => "Restricted",
            BackgroundRefreshStatus::Unknown => "Unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationStatus {
    Authorized,
    Denied,
    NotDetermined,
    Provisional,
    Ephemeral,
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationStatus::Authorized => "Authorized",
            NotificationStatus::Denied => "Denied",
            NotificationStatus::NotDetermined => "Not Determined",
            NotificationStatus::Provisional => "Provisional",
            NotificationStatus::Ephemeral => "Ephemeral",
        })
    }
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn permission_granted(&self) -> bool;

    /// Ask the platform for permission; returns whether it was granted
    async fn request_permission(&self) -> AppResult<bool>;

    async fn background_refresh_status(&self) -> BackgroundRefreshStatus;

    async fn notification_status(&self) -> NotificationStatus;
}

/// Gateway whose answers are fixed at construction time
#[derive(Debug)]
pub struct StaticNotificationGateway {
    granted: AtomicBool,
    asked: AtomicBool,
    grant_on_request: bool,
    background_refresh: BackgroundRefreshStatus,
}

impl StaticNotificationGateway {
    pub fn new(
        granted: bool,
        grant_on_request: bool,
        background_refresh: BackgroundRefreshStatus,
    ) -> Self {
        Self {
            granted: AtomicBool::new(granted),
            asked: AtomicBool::new(granted),
            grant_on_request,
            background_refresh,
        }
    }
}

#[async_trait]
impl NotificationGateway for StaticNotificationGateway {
    async fn permission_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_permission(&self) -> AppResult<bool> {
        self.asked.store(true, Ordering::SeqCst);
        if self.grant_on_request {
            self.granted.store(true, Ordering::SeqCst);
        }
        let granted = self.granted.load(Ordering::SeqCst);
        info!("Notification permission request answered: granted={}", granted);
        Ok(granted)
    }

    async fn background_refresh_status(&self) -> BackgroundRefreshStatus {
        self.background_refresh
    }

    async fn notification_status(&self) -> NotificationStatus {
        match (
            self.asked.load(Ordering::SeqCst),
            self.granted.load(Ordering::SeqCst),
        ) {
            (_, true) => NotificationStatus::Authorized,
            (true, false) => NotificationStatus::Denied,
            (false, false) => NotificationStatus::NotDetermined,
        }
    }
}
