use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No wallet provider is configured")]
    ProviderUnavailable,

    #[error("Provider returned no accounts")]
    NoAccounts,

    #[error("Another session operation is already in flight")]
    OperationInProgress,

    #[error("Operation resolved after the session was reset; result discarded")]
    Superseded,

    #[error("Provider request timed out after {0}s")]
    RequestTimeout(u64),

    #[error("Network switch rejected: {0}")]
    ChainSwitchRejected(ProviderError),

    #[error("Adding the target network failed: {0}")]
    ChainAddFailed(ProviderError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Error object reported by a wallet provider (EIP-1193 shape).
#[derive(Error, Debug, Clone)]
#[error("code {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            SessionError::ProviderUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            SessionError::NoAccounts => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::OperationInProgress => (StatusCode::CONFLICT, self.to_string()),
            SessionError::Superseded => (StatusCode::CONFLICT, self.to_string()),
            SessionError::RequestTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            SessionError::ChainSwitchRejected(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::ChainAddFailed(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            SessionError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            SessionError::Provider(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            SessionError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
