//! Error types for the E2E harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Authentication failed with HTTP status {status}")]
    Auth { status: u16 },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Browser session failed to start: {0}")]
    SessionStartup(String),

    #[error("Storage state error: {0}")]
    StorageState(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
