//! Session error types.

use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API error: {0}")]
    Api(#[from] reel_api_client::ApiError),

    #[error("curation error: {0}")]
    Core(#[from] reel_core::CoreError),

    #[error("session event channel closed")]
    ChannelClosed,

    #[error("highlights are not loaded yet")]
    NotLoaded,
}

impl SessionError {
    /// Transient failures the user may simply retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Api(e) if e.is_retryable())
    }
}
