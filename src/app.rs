//! Composition Root
//!
//! Builds concrete services from configuration and hands them to the
//! controllers that consume them.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::AppState;
use crate::config::{AppConfig, HistorySourceKind};
use crate::error::{AppError, AppResult};
use crate::history::{AccessHistoryController, HistorySource, HttpHistorySource, MockHistorySource};
use crate::notifications::NotificationSettings;
use crate::services::{
    AuthProvider, BackgroundRefreshStatus, MemoryUserStore, SessionAuth,
    StaticNotificationGateway, UserId, UserProfile, UserStore,
};
use crate::storage::{BlobStore, FileBlobStore, ProfileImageManager};

/// History source selected by `history.source`
pub fn build_history_source(config: &AppConfig) -> AppResult<Arc<dyn HistorySource>> {
    match config.history.source {
        HistorySourceKind::Mock => Ok(Arc::new(MockHistorySource::new(Duration::from_millis(
            config.history.mock_latency_ms,
        )))),
        HistorySourceKind::Http => {
            let endpoint = config.history.endpoint.clone().ok_or_else(|| {
                AppError::Config("history.endpoint is required for the http source".to_string())
            })?;
            Ok(Arc::new(HttpHistorySource::new(
                endpoint,
                Duration::from_secs(config.history.request_timeout_secs),
            )?))
        }
    }
}

pub async fn build_state(config: &AppConfig) -> AppResult<AppState> {
    let user = UserId::new(config.session.user_id.clone())?;
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::with_profiles([UserProfile::new(
        user.clone(),
        config.session.display_name.clone(),
        config.session.email.clone(),
    )]));
    let auth: Arc<dyn AuthProvider> = Arc::new(SessionAuth::signed_in(user));

    let file_store = FileBlobStore::new(&config.storage.blob_dir);
    file_store.initialize().await?;
    let blobs: Arc<dyn BlobStore> = Arc::new(file_store);

    let background_refresh = if config.notifications.background_refresh_available {
        BackgroundRefreshStatus::Available
    } else {
        BackgroundRefreshStatus::Denied
    };
    let gateway = Arc::new(StaticNotificationGateway::new(
        config.notifications.permission_granted,
        config.notifications.grant_on_request,
        background_refresh,
    ));

    let history = Arc::new(AccessHistoryController::new(build_history_source(config)?));
    let profile_images = Arc::new(ProfileImageManager::new(
        blobs,
        users.clone(),
        config.storage.max_image_bytes,
    ));
    let notifications = Arc::new(NotificationSettings::new(gateway));

    info!("Application services wired");
    Ok(AppState {
        auth,
        users,
        history,
        profile_images,
        notifications,
    })
}
