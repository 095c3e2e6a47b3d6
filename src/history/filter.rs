//! Filter Engine
//!
//! Coarse categories used to narrow the access history list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::history::entry::AccessLogEntry;

pub const BIOMETRIC_MARKER: &str = "biometric";
pub const PASSWORD_MARKER: &str = "password";
pub const BUILDING_ACCESS_MARKER: &str = "building_access";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessFilter {
    #[default]
    All,
    Biometric,
    Password,
    BuildingAccess,
}

impl AccessFilter {
    pub const ALL: [AccessFilter; 4] = [
        AccessFilter::All,
        AccessFilter::Biometric,
        AccessFilter::Password,
        AccessFilter::BuildingAccess,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccessFilter::All => "All",
            AccessFilter::Biometric => "Biometric",
            AccessFilter::Password => "Password",
            AccessFilter::BuildingAccess => "Building Access",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessFilter::All => "all",
            AccessFilter::Biometric => "biometric",
            AccessFilter::Password => "password",
            AccessFilter::BuildingAccess => "buildingAccess",
        }
    }

    /// Case-sensitive substring test on the entry's login type
    pub fn matches(self, entry: &AccessLogEntry) -> bool {
        match self {
            AccessFilter::All => true,
            AccessFilter::Biometric => entry.login_type.contains(BIOMETRIC_MARKER),
            AccessFilter::Password => entry.login_type.contains(PASSWORD_MARKER),
            AccessFilter::BuildingAccess => entry.login_type.contains(BUILDING_ACCESS_MARKER),
        }
    }
}

impl fmt::Display for AccessFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(AccessFilter::All),
            "biometric" => Ok(AccessFilter::Biometric),
            "password" => Ok(AccessFilter::Password),
            "buildingAccess" | "building_access" => Ok(AccessFilter::BuildingAccess),
            other => Err(AppError::unknown_filter(other)),
        }
    }
}

/// Entries matching `filter`, in input order
pub fn classify(entries: &[AccessLogEntry], filter: AccessFilter) -> Vec<&AccessLogEntry> {
    entries.iter().filter(|entry| filter.matches(entry)).collect()
}
