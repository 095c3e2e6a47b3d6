//! Notification Preferences
//!
//! Per-category notification toggles. Turning a category on asks the
//! platform for permission first when it has not been granted yet.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::services::notifications::NotificationGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationCategory {
    AccessAlerts,
    MaintenanceUpdates,
    TemperatureAlerts,
    BuildingAnnouncements,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 4] = [
        NotificationCategory::AccessAlerts,
        NotificationCategory::MaintenanceUpdates,
        NotificationCategory::TemperatureAlerts,
        NotificationCategory::BuildingAnnouncements,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationCategory::AccessAlerts => "accessAlerts",
            NotificationCategory::MaintenanceUpdates => "maintenanceUpdates",
            NotificationCategory::TemperatureAlerts => "temperatureAlerts",
            NotificationCategory::BuildingAnnouncements => "buildingAnnouncements",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotificationCategory::AccessAlerts => "Access Alerts",
            NotificationCategory::MaintenanceUpdates => "Maintenance Updates",
            NotificationCategory::TemperatureAlerts => "Temperature Alerts",
            NotificationCategory::BuildingAnnouncements => "Building Announcements",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown notification category: {}", s)))
    }
}

/// Result of toggling a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceChange {
    Enabled,
    Disabled,
    /// Permission was requested and refused; the category stays off.
    PermissionDenied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatusReport {
    pub permission_granted: bool,
    pub background_refresh: String,
    pub notification_status: String,
}

pub struct NotificationSettings {
    gateway: Arc<dyn NotificationGateway>,
    enabled: RwLock<BTreeMap<NotificationCategory, bool>>,
}

impl NotificationSettings {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        let enabled = NotificationCategory::ALL
            .into_iter()
            .map(|c| (c, false))
            .collect();
        Self {
            gateway,
            enabled: RwLock::new(enabled),
        }
    }

    pub async fn preferences(&self) -> BTreeMap<NotificationCategory, bool> {
        self.enabled.read().await.clone()
    }

    pub async fn is_enabled(&self, category: NotificationCategory) -> bool {
        self.enabled
            .read()
            .await
            .get(&category)
            .copied()
            .unwrap_or(false)
    }

    pub async fn set_enabled(
        &self,
        category: NotificationCategory,
        enabled: bool,
    ) -> AppResult<PreferenceChange> {
        if !enabled {
            self.enabled.write().await.insert(category, false);
            info!("Disabled {} notifications", category);
            return Ok(PreferenceChange::Disabled);
        }

        if !self.gateway.permission_granted().await {
            let granted = self.gateway.request_permission().await?;
            if !granted {
                warn!("Notification permission denied; {} stays off", category);
                return Ok(PreferenceChange::PermissionDenied);
            }
        }

        self.enabled.write().await.insert(category, true);
        info!("Enabled {} notifications", category);
        Ok(PreferenceChange::Enabled)
    }

    pub async fn status_report(&self) -> NotificationStatusReport {
        NotificationStatusReport {
            permission_granted: self.gateway.permission_granted().await,
            background_refresh: self.gateway.background_refresh_status().await.to_string(),
            notification_status: self.gateway.notification_status().await.to_string(),
        }
    }
}
