//! Service Boundaries
//!
//! Collaborators the screens depend on, expressed as traits so the
//! composition root decides which implementation each screen gets.

pub mod auth;
pub mod notifications;
pub mod user;

pub use auth::{AuthProvider, SessionAuth, UserId};
pub use notifications::{
    BackgroundRefreshStatus, NotificationGateway, NotificationStatus, StaticNotificationGateway,
};
pub use user::{MemoryUserStore, UserProfile, UserStore};
