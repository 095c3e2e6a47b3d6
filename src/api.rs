//! HTTP API
//!
//! JSON endpoints over the screen controllers, wired to a shared `AppState`.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Local, Timelike, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::dashboard::{greeting_for, sections};
use crate::error::AppError;
use crate::history::{classify, AccessFilter, AccessHistoryController, DisplayRow};
use crate::notifications::{NotificationCategory, NotificationSettings, NotificationStatusReport};
use crate::services::{AuthProvider, UserStore};
use crate::storage::{ProfileImage, ProfileImageManager};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub users: Arc<dyn UserStore>,
    pub history: Arc<AccessHistoryController>,
    pub profile_images: Arc<ProfileImageManager>,
    pub notifications: Arc<NotificationSettings>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::FileIo(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = json!({
            "status": "error",
            "message": self.user_message(),
        });
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/history", get(history))
        .route(
            "/profile/image",
            get(get_profile_image)
                .put(put_profile_image)
                .delete(delete_profile_image),
        )
        .route("/notifications/status", get(notification_status))
        .route("/notifications/preferences", get(notification_preferences))
        .route(
            "/notifications/preferences/:category",
            axum::routing::put(set_notification_preference),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "building-companion",
        "timestamp": Utc::now()
    }))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let user = state.auth.require_user().await?;
    let profile = state.users.profile(&user).await;
    let name = profile.as_ref().and_then(|p| p.first_name());

    Ok(Json(json!({
        "greeting": greeting_for(Local::now().hour(), name),
        "sections": sections(),
    })))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    filter: Option<String>,
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse::<AccessFilter>()?,
        None => AccessFilter::All,
    };

    let snapshot = state.history.refresh_and_wait().await;
    let now = Utc::now();
    let rows: Vec<DisplayRow> = classify(&snapshot.entries, filter)
        .into_iter()
        .map(|entry| DisplayRow::from_entry(entry, now))
        .collect();

    Ok(Json(json!({
        "filter": filter,
        "rows": rows,
        "errorMessage": snapshot.error_message,
    })))
}

async fn get_profile_image(State(state): State<AppState>) -> Result<Response, AppError> {
    let user = state.auth.require_user().await?;
    let response = match state.profile_images.load(&user).await {
        ProfileImage::Custom { bytes, etag } => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (header::ETAG, format!("\"{}\"", etag)),
            ],
            bytes,
        )
            .into_response(),
        ProfileImage::Default => (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "default", "avatar": "person.crop.circle.fill" })),
        )
            .into_response(),
    };
    Ok(response)
}

async fn put_profile_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = state.auth.require_user().await?;
    let handle = state.profile_images.save(&user, &body).await?;
    Ok(Json(json!({ "status": "saved", "handle": handle })))
}

async fn delete_profile_image(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let user = state.auth.require_user().await?;
    state.profile_images.remove(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn notification_status(State(state): State<AppState>) -> Json<NotificationStatusReport> {
    Json(state.notifications.status_report().await)
}

async fn notification_preferences(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "preferences": state.notifications.preferences().await }))
}

#[derive(Debug, Deserialize)]
struct PreferenceUpdate {
    enabled: bool,
}

async fn set_notification_preference(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(update): Json<PreferenceUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let category: NotificationCategory = category.parse()?;
    let change = state
        .notifications
        .set_enabled(category, update.enabled)
        .await?;
    Ok(Json(json!({
        "category": category,
        "result": change,
        "enabled": state.notifications.is_enabled(category).await,
    })))
}
