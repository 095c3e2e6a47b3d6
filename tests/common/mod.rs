#![allow(dead_code)]

use building_companion::api::AppState;
use building_companion::history::{AccessHistoryController, AccessLogEntry, HistorySource, MockHistorySource};
use building_companion::notifications::NotificationSettings;
use building_companion::services::{
    AuthProvider, BackgroundRefreshStatus, MemoryUserStore, SessionAuth,
    StaticNotificationGateway, UserId, UserProfile, UserStore,
};
use building_companion::storage::{BlobStore, MemoryBlobStore, ProfileImageManager};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

pub const TEST_USER: &str = "resident-42";

pub fn test_user() -> UserId {
    UserId::new(TEST_USER).expect("valid user id")
}

pub fn test_profile() -> UserProfile {
    UserProfile::new(test_user(), "Priya Raman", "priya@example.com")
}

/// Entry with metadata given as key/value pairs
pub fn create_test_entry(
    id: &str,
    login_type: &str,
    age: Duration,
    metadata: &[(&str, &str)],
) -> AccessLogEntry {
    metadata.iter().fold(
        AccessLogEntry::new(id, login_type, Utc::now() - age, "192.168.1.100"),
        |entry, (k, v)| entry.with_metadata(*k, *v),
    )
}

pub fn fixed_anchor() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub struct TestApp {
    pub state: AppState,
    pub blobs: Arc<MemoryBlobStore>,
}

/// App state backed by in-memory services
pub fn create_test_app(signed_in: bool, grant_on_request: bool) -> TestApp {
    create_test_app_with_source(
        Arc::new(MockHistorySource::new(std::time::Duration::ZERO)),
        signed_in,
        grant_on_request,
    )
}

pub fn create_test_app_with_source(
    source: Arc<dyn HistorySource>,
    signed_in: bool,
    grant_on_request: bool,
) -> TestApp {
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::with_profiles([test_profile()]));
    let auth: Arc<dyn AuthProvider> = if signed_in {
        Arc::new(SessionAuth::signed_in(test_user()))
    } else {
        Arc::new(SessionAuth::new())
    };
    let blobs = Arc::new(MemoryBlobStore::new());
    let blob_store: Arc<dyn BlobStore> = blobs.clone();
    let gateway = Arc::new(StaticNotificationGateway::new(
        false,
        grant_on_request,
        BackgroundRefreshStatus::Available,
    ));

    let state = AppState {
        auth,
        users: users.clone(),
        history: Arc::new(AccessHistoryController::new(source)),
        profile_images: Arc::new(ProfileImageManager::new(blob_store, users, 1024)),
        notifications: Arc::new(NotificationSettings::new(gateway)),
    };

    TestApp { state, blobs }
}
