use thiserror::Error;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::FileIo(format!("I/O error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(format!("Request error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Fetch(format!("JSON decode error: {}", err))
    }
}

impl From<::config::ConfigError> for AppError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch access history: {0}")]
    Fetch(String),

    #[error("File storage error: {0}")]
    FileIo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not signed in")]
    Unauthorized,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn unknown_filter(raw: &str) -> Self {
        Self::Validation(format!(
            "Unknown access filter: {}. Expected one of all, biometric, password, buildingAccess",
            raw
        ))
    }

    pub fn invalid_blob_handle(raw: &str) -> Self {
        Self::Validation(format!("Invalid blob handle: {:?}", raw))
    }

    pub fn image_too_large(size: usize, max: usize) -> Self {
        Self::Validation(format!(
            "Image too large: {} bytes (maximum {} allowed)",
            size, max
        ))
    }

    /// Message suitable for showing to the user when a screen degrades.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(_) => "Unable to load access history. Pull to refresh.".to_string(),
            Self::FileIo(_) => "Unable to update your profile photo.".to_string(),
            Self::Unauthorized => "Please sign in to continue.".to_string(),
            other => other.to_string(),
        }
    }
}
