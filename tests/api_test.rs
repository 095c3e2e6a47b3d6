use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use building_companion::api::router;
use building_companion::history::{AccessLogEntry, HistorySource, MockHistorySource};
use building_companion::{AppError, AppResult};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;

mod common;
use common::*;

async fn send(app: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

struct FailingSource;

#[async_trait::async_trait]
impl HistorySource for FailingSource {
    async fn fetch(&self) -> AppResult<Vec<AccessLogEntry>> {
        Err(AppError::Fetch("unreachable".to_string()))
    }
}

/// Serves the mock fixture, each call taking the next scripted delay.
struct DelayedSource {
    delays: Mutex<VecDeque<Duration>>,
    fixture: MockHistorySource,
}

impl DelayedSource {
    fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            delays: Mutex::new(delays.into_iter().collect()),
            fixture: MockHistorySource::new(Duration::ZERO),
        }
    }
}

#[async_trait::async_trait]
impl HistorySource for DelayedSource {
    async fn fetch(&self) -> AppResult<Vec<AccessLogEntry>> {
        let delay = self.delays.lock().await.pop_front().unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.fixture.fetch().await
    }
}

#[tokio::test]
async fn test_health() {
    let app = router(create_test_app(true, true).state);
    let (status, body) = send(&app, Method::GET, "/health", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "healthy");
}

#[tokio::test]
async fn test_dashboard_greets_signed_in_user() {
    let app = router(create_test_app(true, true).state);
    let (status, body) = send(&app, Method::GET, "/dashboard", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);

    let body = json(&body);
    assert!(body["greeting"].as_str().unwrap().ends_with(", Priya"));
    assert_eq!(body["sections"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_history_filtering() {
    let app = router(create_test_app(true, true).state);

    let (status, body) = send(&app, Method::GET, "/history", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["rows"].as_array().unwrap().len(), 5);

    let (status, body) = send(&app, Method::GET, "/history?filter=buildingAccess", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["filter"], "buildingAccess");
    let titles: Vec<&str> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Building Entry", "Building Exit"]);
    assert_eq!(body["rows"][0]["style"]["icon"], "building.2.fill");
}

#[tokio::test]
async fn test_history_rejects_unknown_filter() {
    let app = router(create_test_app(true, true).state);
    let (status, _) = send(&app, Method::GET, "/history?filter=retina", Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_failure_is_degraded_not_fatal() {
    let app = router(create_test_app_with_source(Arc::new(FailingSource), true, true).state);
    let (status, body) = send(&app, Method::GET, "/history", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);

    let body = json(&body);
    assert!(body["rows"].as_array().unwrap().is_empty());
    assert!(body["errorMessage"].as_str().is_some());
}

#[tokio::test]
async fn test_overlapping_history_requests_both_return_rows() {
    let source = DelayedSource::new([Duration::from_millis(200), Duration::from_millis(400)]);
    let app = router(create_test_app_with_source(Arc::new(source), true, true).state);

    let (first, second) = tokio::join!(send(&app, Method::GET, "/history", Body::empty()), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        send(&app, Method::GET, "/history", Body::empty()).await
    });

    for (status, body) in [first, second] {
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["rows"].as_array().unwrap().len(), 5);
        assert!(body["errorMessage"].is_null());
    }
}

#[tokio::test]
async fn test_profile_image_lifecycle() {
    let test_app = create_test_app(true, true);
    let blobs = test_app.blobs.clone();
    let app = router(test_app.state);

    let (status, body) = send(&app, Method::GET, "/profile/image", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["status"], "default");

    let (status, body) = send(&app, Method::PUT, "/profile/image", Body::from("fake-jpeg")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "saved");
    assert_eq!(blobs.len().await, 1);

    let (status, body) = send(&app, Method::GET, "/profile/image", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"fake-jpeg");

    let (status, _) = send(&app, Method::DELETE, "/profile/image", Body::empty()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(blobs.is_empty().await);

    let (status, _) = send(&app, Method::GET, "/profile/image", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_image_validation() {
    let app = router(create_test_app(true, true).state);

    let (status, _) = send(&app, Method::PUT, "/profile/image", Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let oversized = vec![0u8; 2048];
    let (status, _) = send(&app, Method::PUT, "/profile/image", Body::from(oversized)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_requires_sign_in() {
    let app = router(create_test_app(false, true).state);
    let (status, _) = send(&app, Method::GET, "/profile/image", Body::empty()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/dashboard", Body::empty()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notification_preferences() {
    let app = router(create_test_app(true, true).state);

    let (status, body) = send(&app, Method::GET, "/notifications/status", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["permissionGranted"], false);
    assert_eq!(body["notificationStatus"], "Not Determined");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/notifications/preferences/accessAlerts",
        Body::from(r#"{"enabled":true}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["result"], "enabled");
    assert_eq!(body["enabled"], true);

    let (_, body) = send(&app, Method::GET, "/notifications/preferences", Body::empty()).await;
    let body = json(&body);
    assert_eq!(body["preferences"]["accessAlerts"], true);
    assert_eq!(body["preferences"]["temperatureAlerts"], false);
}

#[tokio::test]
async fn test_denied_permission_keeps_preference_off() {
    let app = router(create_test_app(true, false).state);
    let (status, body) = send(
        &app,
        Method::PUT,
        "/notifications/preferences/temperatureAlerts",
        Body::from(r#"{"enabled":true}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["result"], "permissionDenied");
    assert_eq!(body["enabled"], false);
}

#[tokio::test]
async fn test_unknown_notification_category() {
    let app = router(create_test_app(true, true).state);
    let (status, _) = send(
        &app,
        Method::PUT,
        "/notifications/preferences/spam",
        Body::from(r#"{"enabled":true}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
