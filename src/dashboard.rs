//! Dashboard
//!
//! Home screen content: a time-of-day greeting and the navigation sections.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardSection {
    AccessHistory,
    Notifications,
    Profile,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 3] = [
        DashboardSection::AccessHistory,
        DashboardSection::Notifications,
        DashboardSection::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardSection::AccessHistory => "Access History",
            DashboardSection::Notifications => "Notifications",
            DashboardSection::Profile => "Profile",
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            DashboardSection::AccessHistory => "/history",
            DashboardSection::Notifications => "/notifications/preferences",
            DashboardSection::Profile => "/profile/image",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            DashboardSection::AccessHistory => "clock.arrow.circlepath",
            DashboardSection::Notifications => "bell.fill",
            DashboardSection::Profile => "person.crop.circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionTile {
    pub section: DashboardSection,
    pub title: &'static str,
    pub route: &'static str,
    pub icon: &'static str,
}

pub fn sections() -> Vec<SectionTile> {
    DashboardSection::ALL
        .into_iter()
        .map(|section| SectionTile {
            section,
            title: section.title(),
            route: section.route(),
            icon: section.icon(),
        })
        .collect()
}

/// Greeting for a local hour (0-23), personalised when a name is known
pub fn greeting_for(hour: u32, name: Option<&str>) -> String {
    let salutation = match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{}, {}", salutation, name),
        None => salutation.to_string(),
    }
}
