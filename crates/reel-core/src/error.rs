//! Core error types.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid highlight {id}: {reason}")]
    InvalidHighlight { id: String, reason: String },

    #[error("unknown highlight id: {0}")]
    UnknownHighlight(String),

    #[error("reorder sequence is not a permutation of the current highlights: {0}")]
    NotAPermutation(String),

    #[error("a reel generation request is already in flight")]
    GenerationInFlight,

    #[error("no highlights are selected for the reel")]
    EmptySelection,
}

impl CoreError {
    pub fn invalid_highlight(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHighlight {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
