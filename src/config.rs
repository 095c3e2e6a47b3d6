//! Application configuration
//!
//! Layers built-in defaults, an optional `building-companion.toml` and
//! `BUILDING_COMPANION__*` environment variables.

use ::config::builder::{ConfigBuilder, DefaultState};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::error::{AppError, AppResult};

pub const DEFAULT_CONFIG_FILE: &str = "building-companion.toml";
const ENV_PREFIX: &str = "BUILDING_COMPANION";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub storage: StorageConfig,
    pub notifications: NotificationsConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySourceKind {
    Mock,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub source: HistorySourceKind,
    /// Artificial latency of the mock source.
    pub mock_latency_ms: u64,
    pub endpoint: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub blob_dir: PathBuf,
    pub max_image_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Whether the OS-level permission is already granted at startup.
    pub permission_granted: bool,
    /// Whether a permission request would be granted.
    pub grant_on_request: bool,
    pub background_refresh_available: bool,
}

/// Resident signed in when the app starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

impl AppConfig {
    /// Load configuration from `building-companion.toml` (if present) and the environment
    pub fn load() -> AppResult<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> AppResult<Self> {
        let builder = Self::file_layers(path)?.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );
        Self::from_builder(builder)
    }

    /// Built-in defaults overlaid with the optional TOML file at `path`
    fn file_layers(path: &str) -> AppResult<ConfigBuilder<DefaultState>> {
        Ok(::config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("history.source", "mock")?
            .set_default("history.mock_latency_ms", 500)?
            .set_default("history.request_timeout_secs", 10)?
            .set_default("storage.blob_dir", "data/blobs")?
            .set_default("storage.max_image_bytes", 5 * 1024 * 1024)?
            .set_default("notifications.permission_granted", false)?
            .set_default("notifications.grant_on_request", true)?
            .set_default("notifications.background_refresh_available", true)?
            .set_default("session.user_id", "resident-1")?
            .set_default("session.display_name", "Building Resident")?
            .set_default("session.email", "resident@example.com")?
            .add_source(::config::File::with_name(path).required(false)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> AppResult<Self> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        info!("Configuration loaded (history source: {:?})", config.history.source);
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.storage.blob_dir.as_os_str().is_empty() {
            return Err(AppError::Config("storage.blob_dir must not be empty".to_string()));
        }

        if self.session.user_id.trim().is_empty() {
            return Err(AppError::Config("session.user_id must not be empty".to_string()));
        }

        if self.storage.max_image_bytes == 0 {
            return Err(AppError::Config(
                "storage.max_image_bytes must be positive".to_string(),
            ));
        }

        if self.history.source == HistorySourceKind::Http {
            let has_endpoint = self
                .history
                .endpoint
                .as_deref()
                .map(|e| !e.trim().is_empty())
                .unwrap_or(false);
            if !has_endpoint {
                return Err(AppError::Config(
                    "history.endpoint is required when history.source = \"http\"".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
