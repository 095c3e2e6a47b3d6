//! Presentation Formatter
//!
//! Turns access log entries into the strings and style keys a list row shows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::history::entry::AccessLogEntry;
use crate::history::filter::{BIOMETRIC_MARKER, BUILDING_ACCESS_MARKER, PASSWORD_MARKER};

pub const MAX_PILLS: usize = 2;
pub const HIDDEN_METADATA_KEY: &str = "verificationId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryIcon {
    #[serde(rename = "faceid")]
    FaceId,
    #[serde(rename = "key.fill")]
    Key,
    #[serde(rename = "building.2.fill")]
    Building,
    #[serde(rename = "clock.fill")]
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryTint {
    Blue,
    Green,
    Orange,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryStyle {
    pub icon: EntryIcon,
    pub tint: EntryTint,
}

pub fn title_for(login_type: &str) -> &'static str {
    match login_type {
        "biometric_login" => "Biometric Login",
        "password_login" => "Password Login",
        "building_access_entry" => "Building Entry",
        "building_access_exit" => "Building Exit",
        other if other.contains(BIOMETRIC_MARKER) => "Biometric Action",
        _ => "Access Event",
    }
}

/// First match wins: biometric, password, building access, then the generic style.
pub fn style_for(login_type: &str) -> EntryStyle {
    if login_type.contains(BIOMETRIC_MARKER) {
        EntryStyle {
            icon: EntryIcon::FaceId,
            tint: EntryTint::Blue,
        }
    } else if login_type.contains(PASSWORD_MARKER) {
        EntryStyle {
            icon: EntryIcon::Key,
            tint: EntryTint::Green,
        }
    } else if login_type.contains(BUILDING_ACCESS_MARKER) {
        EntryStyle {
            icon: EntryIcon::Building,
            tint: EntryTint::Orange,
        }
    } else {
        EntryStyle {
            icon: EntryIcon::Clock,
            tint: EntryTint::Gray,
        }
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
/// Whitespace, `-` and `_` separate words and are kept as-is.
pub fn capitalize_words(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

pub fn format_confidence(value: &str) -> String {
    let fraction = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    format!("Confidence: {}%", (fraction * 100.0).round() as i64)
}

pub fn format_zone(value: &str) -> String {
    format!("Zone: {}", capitalize_words(value))
}

pub fn format_method(value: &str) -> String {
    format!("Method: {}", capitalize_words(value))
}

pub fn format_pill(key: &str, value: &str) -> String {
    match key {
        "confidence" => format_confidence(value),
        "zoneId" => format_zone(value),
        "method" => format_method(value),
        other => format!("{}: {}", capitalize_words(other), value),
    }
}

/// Labels for the first two metadata entries, skipping the verification id
pub fn metadata_pills(entry: &AccessLogEntry) -> Vec<String> {
    entry
        .metadata
        .iter()
        .filter(|(key, _)| key.as_str() != HIDDEN_METADATA_KEY)
        .take(MAX_PILLS)
        .map(|(key, value)| format_pill(key, value))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    JustNow,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

/// Coarse age of a timestamp. Ordering compares the unit first, so an older
/// timestamp never produces a smaller age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelativeAge {
    pub unit: AgeUnit,
    pub amount: i64,
}

impl PartialOrd for RelativeAge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativeAge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.unit
            .cmp(&other.unit)
            .then_with(|| self.amount.cmp(&other.amount))
    }
}

impl RelativeAge {
    pub fn between(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let seconds = (now - timestamp).num_seconds().max(0);
        let minutes = seconds / 60;
        let hours = minutes / 60;
        let days = hours / 24;

        let (unit, amount) = if minutes == 0 {
            (AgeUnit::JustNow, 0)
        } else if hours == 0 {
            (AgeUnit::Minutes, minutes)
        } else if days == 0 {
            (AgeUnit::Hours, hours)
        } else if days < 7 {
            (AgeUnit::Days, days)
        } else if days < 35 {
            (AgeUnit::Weeks, days / 7)
        } else if days < 365 {
            (AgeUnit::Months, (days / 30).max(1))
        } else {
            (AgeUnit::Years, days / 365)
        };

        Self { unit, amount }
    }

    pub fn phrase(&self) -> String {
        let noun = match self.unit {
            AgeUnit::JustNow => return "just now".to_string(),
            AgeUnit::Minutes => "minute",
            AgeUnit::Hours => "hour",
            AgeUnit::Days => "day",
            AgeUnit::Weeks => "week",
            AgeUnit::Months => "month",
            AgeUnit::Years => "year",
        };
        let plural = if self.amount == 1 { "" } else { "s" };
        format!("{} {}{} ago", self.amount, noun, plural)
    }
}

pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    RelativeAge::between(timestamp, now).phrase()
}

/// Everything a history list row displays for one entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub id: String,
    pub title: String,
    pub style: EntryStyle,
    pub relative_time: String,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub pills: Vec<String>,
}

impl DisplayRow {
    pub fn from_entry(entry: &AccessLogEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: entry.id.clone(),
            title: title_for(&entry.login_type).to_string(),
            style: style_for(&entry.login_type),
            relative_time: relative_time(entry.timestamp, now),
            timestamp: entry.timestamp,
            ip_address: entry.ip_address.clone(),
            pills: metadata_pills(entry),
        }
    }
}
