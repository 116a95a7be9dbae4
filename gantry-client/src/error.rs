//! Error types for the Jenkins client

use gantry_core::LookupError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the build server
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }
}

impl From<ClientError> for LookupError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::RequestFailed(e) if e.is_decode() => LookupError::Malformed(e.to_string()),
            ClientError::RequestFailed(e) => LookupError::Transport(e.to_string()),
            ClientError::ApiError { status, message } => LookupError::Status { status, message },
            ClientError::ParseError(msg) => LookupError::Malformed(msg),
            ClientError::InvalidConfig(msg) => LookupError::Transport(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_status() {
        let lookup: LookupError = ClientError::api_error(503, "maintenance").into();
        assert!(matches!(lookup, LookupError::Status { status: 503, .. }));
        assert!(lookup.is_transient());
    }

    #[test]
    fn test_parse_error_is_permanent() {
        let lookup: LookupError = ClientError::ParseError("missing field".into()).into();
        assert!(!lookup.is_transient());
    }
}
