//! History Sources
//!
//! Where access history comes from. Every source hands back entries sorted
//! newest-first so consumers never re-sort.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::history::entry::{sort_newest_first, AccessLogEntry};

#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch the full access history, newest first
    async fn fetch(&self) -> AppResult<Vec<AccessLogEntry>>;
}

/// Stub source returning a fixed set of five records after an artificial delay
#[derive(Debug, Clone)]
pub struct MockHistorySource {
    latency: StdDuration,
    anchor: Option<DateTime<Utc>>,
}

impl MockHistorySource {
    pub fn new(latency: StdDuration) -> Self {
        Self {
            latency,
            anchor: None,
        }
    }

    /// Pin the instant the fixture offsets are measured from
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    fn fixture(now: DateTime<Utc>) -> Vec<AccessLogEntry> {
        // Deliberately not in timestamp order.
        vec![
            AccessLogEntry::new(
                "3",
                "password_login",
                now - Duration::seconds(14_400),
                "10.0.0.24",
            )
            .with_metadata("device", "ios"),
            AccessLogEntry::new(
                "5",
                "biometric_login",
                now - Duration::seconds(86_400),
                "10.0.0.24",
            )
            .with_metadata("confidence", "0.88")
            .with_metadata("verificationId", "bio_3c77d0"),
            AccessLogEntry::new(
                "1",
                "biometric_login",
                now - Duration::seconds(3_600),
                "192.168.1.100",
            )
            .with_metadata("confidence", "0.95")
            .with_metadata("verificationId", "bio_8f2a91"),
            AccessLogEntry::new(
                "4",
                "building_access_exit",
                now - Duration::seconds(43_200),
                "192.168.1.100",
            )
            .with_metadata("zoneId", "parking garage")
            .with_metadata("method", "badge"),
            AccessLogEntry::new(
                "2",
                "building_access_entry",
                now - Duration::seconds(7_200),
                "192.168.1.100",
            )
            .with_metadata("zoneId", "main lobby")
            .with_metadata("method", "nfc"),
        ]
    }
}

#[async_trait]
impl HistorySource for MockHistorySource {
    async fn fetch(&self) -> AppResult<Vec<AccessLogEntry>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let now = self.anchor.unwrap_or_else(Utc::now);
        let mut entries = Self::fixture(now);
        sort_newest_first(&mut entries);

        debug!("Mock history source returned {} entries", entries.len());
        Ok(entries)
    }
}

/// Source backed by an access-log service returning a JSON array of entries
#[derive(Debug, Clone)]
pub struct HttpHistorySource {
    client: Client,
    endpoint: String,
}

impl HttpHistorySource {
    pub fn new(endpoint: impl Into<String>, timeout: StdDuration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl HistorySource for HttpHistorySource {
    async fn fetch(&self) -> AppResult<Vec<AccessLogEntry>> {
        info!("Fetching access history from {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Access-log service responded with {}", status);
            return Err(AppError::Fetch(format!(
                "access-log service responded with {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let mut entries: Vec<AccessLogEntry> = serde_json::from_slice(&body)?;
        sort_newest_first(&mut entries);

        debug!("Fetched {} access history entries", entries.len());
        Ok(entries)
    }
}
