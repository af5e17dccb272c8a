//! Shared data models for the highlight reel curation client.
//!
//! This crate provides Serde-serializable types for:
//! - Videos and their processing lifecycle
//! - Detected highlight segments
//! - WebSocket message schemas for the push channel

pub mod highlight;
pub mod video;
pub mod ws;

// Re-export common types
pub use highlight::{Highlight, HighlightId, DURATION_TOLERANCE};
pub use video::{ProcessingState, Video, VideoId, VideoType};
pub use ws::{ClientMessage, ServerMessage};

use thiserror::Error;

/// Errors produced while validating model data.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid highlight {id}: {reason}")]
    InvalidHighlight { id: String, reason: String },
}
