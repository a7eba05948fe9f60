//! Error types for lt-azure

use thiserror::Error;

/// lt-azure error type
#[derive(Error, Debug)]
pub enum AzureError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Audio decoding error: {0}")]
    AudioError(#[from] hound::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AzureError>;

impl AzureError {
    /// Build an API error from a failed response, consuming its body
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Self::ApiError { status, message }
    }
}
