//! Access Log Entry
//!
//! A single record of the signed-in user's access history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Access history record as delivered by the access-log service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    pub id: String,
    pub login_type: String,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl AccessLogEntry {
    pub fn new(
        id: impl Into<String>,
        login_type: impl Into<String>,
        timestamp: DateTime<Utc>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            login_type: login_type.into(),
            timestamp,
            ip_address: ip_address.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Order entries most recent first. Equal timestamps keep their relative order.
pub fn sort_newest_first(entries: &mut [AccessLogEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
