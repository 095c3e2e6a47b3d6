pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod notifications;
pub mod services;
pub mod storage;

pub use error::{AppError, AppResult};
