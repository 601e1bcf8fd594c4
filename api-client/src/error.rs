//! Error types for the API client

use thiserror::Error;

/// Errors that can occur while talking to the scheduling server
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot carry API paths
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Network or transport error before a response was received
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The server answered with a non-success HTTP status
    #[error("Server returned HTTP status {0}")]
    Status(u16),

    /// The response body could not be decoded
    #[error("Response parsing error: {0}")]
    Parse(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<ureq::Error> for ApiError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(code, _) => ApiError::Status(code),
            ureq::Error::Transport(transport) => ApiError::Network(transport.to_string()),
        }
    }
}
