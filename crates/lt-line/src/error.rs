//! Error types for lt-line

use thiserror::Error;

/// lt-line error type
#[derive(Error, Debug)]
pub enum LineError {
    #[error("LINE API error: {0}")]
    ApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Azure client error: {0}")]
    Azure(#[from] lt_azure::AzureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LineError>;
