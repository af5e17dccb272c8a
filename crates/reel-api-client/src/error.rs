//! API client error types.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("rejected by the service: {0}")]
    Validation(String),

    #[error("a reel generation job is already running for this video")]
    Busy,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Transient failures the caller (or the built-in retry) may repeat.
    ///
    /// Busy conflicts and validation rejections are deliberately not
    /// retryable: repeating them without a state change cannot succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
