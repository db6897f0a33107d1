use thiserror::Error;

use crate::wizard::validation::ValidationError;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const AUTHORIZATION_ERROR_MESSAGE: &str = "You are not authorized to edit this job.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const REQUEST_ERROR_MESSAGE: &str = "The request could not be prepared. Please check the attached files.";
pub const DECODE_ERROR_MESSAGE: &str = "Received an unexpected response from the server.";

/// Client-level error type.
/// Every fallible operation in the crate returns `Result<T, ClientError>`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authorized")]
    Authorization,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request could not be built locally: bad base URL, bad content type.
    #[error("Request error: {0}")]
    Request(String),

    #[error("Server error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Session expired")]
    SessionExpired,

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl ClientError {
    /// Stable machine-readable code, mirrored in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Authorization => "AUTHORIZATION_ERROR",
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Request(_) => "REQUEST_ERROR",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::SessionExpired => "SESSION_EXPIRED",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }

    /// The text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Authorization => AUTHORIZATION_ERROR_MESSAGE.to_string(),
            ClientError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ClientError::Request(_) => REQUEST_ERROR_MESSAGE.to_string(),
            ClientError::Server { status, message } => match message {
                Some(msg) if !msg.trim().is_empty() => msg.clone(),
                _ => format!("Request failed with status {status}"),
            },
            ClientError::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            ClientError::Decode(_) => DECODE_ERROR_MESSAGE.to_string(),
        }
    }

    /// Session expiry is owned by the global handler; call sites must not surface it themselves.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }
}
