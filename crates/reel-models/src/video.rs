//! Video metadata models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a video, assigned by the processing service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// How the video entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    #[default]
    Upload,
    Youtube,
    Url,
}

/// Processing pipeline state for a video.
///
/// Non-terminal states advance through the canonical sequence
/// `queued -> downloading -> transcribing -> analyzing -> generating`.
/// `completed` and `failed` are terminal; `failed` is reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    /// Accepted, waiting for a worker. `pending` is the legacy wire value.
    #[default]
    #[serde(alias = "pending")]
    Queued,
    /// Source video is being fetched
    Downloading,
    /// Audio extraction and speech-to-text
    Transcribing,
    /// AI highlight detection
    Analyzing,
    /// Reel assembly from selected highlights
    Generating,
    /// Pipeline finished successfully
    Completed,
    /// Pipeline failed
    Failed,
}

impl ProcessingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingState::Queued => "queued",
            ProcessingState::Downloading => "downloading",
            ProcessingState::Transcribing => "transcribing",
            ProcessingState::Analyzing => "analyzing",
            ProcessingState::Generating => "generating",
            ProcessingState::Completed => "completed",
            ProcessingState::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingState::Completed | ProcessingState::Failed)
    }

    /// Position in the canonical non-terminal sequence.
    ///
    /// Terminal states compare above every stage so a stale stage event can
    /// never displace them, but ordering between the two terminals is
    /// meaningless and must not be relied on.
    pub fn stage_rank(&self) -> u8 {
        match self {
            ProcessingState::Queued => 0,
            ProcessingState::Downloading => 1,
            ProcessingState::Transcribing => 2,
            ProcessingState::Analyzing => 3,
            ProcessingState::Generating => 4,
            ProcessingState::Completed | ProcessingState::Failed => 5,
        }
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A video as returned by the processing service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Video {
    /// Unique video ID
    pub id: VideoId,

    /// Video title
    pub title: String,

    /// Sport type hint used during analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<String>,

    /// How the video entered the system
    #[serde(default)]
    pub video_type: VideoType,

    /// Current processing state
    #[serde(default)]
    pub status: ProcessingState,

    /// Processing progress (0-100)
    #[serde(default)]
    pub processing_progress: u8,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Source video duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Completion timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&ProcessingState::Transcribing).unwrap();
        assert_eq!(json, "\"transcribing\"");
    }

    #[test]
    fn test_legacy_pending_alias() {
        let state: ProcessingState = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(state, ProcessingState::Queued);
        // Canonical value is always emitted
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"queued\"");
    }

    #[test]
    fn test_stage_rank_ordering() {
        let sequence = [
            ProcessingState::Queued,
            ProcessingState::Downloading,
            ProcessingState::Transcribing,
            ProcessingState::Analyzing,
            ProcessingState::Generating,
        ];
        for pair in sequence.windows(2) {
            assert!(pair[0].stage_rank() < pair[1].stage_rank());
        }
        assert!(ProcessingState::Completed.stage_rank() > ProcessingState::Generating.stage_rank());
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProcessingState::Completed.is_terminal());
        assert!(ProcessingState::Failed.is_terminal());
        assert!(!ProcessingState::Generating.is_terminal());
    }

    #[test]
    fn test_video_deserialization_defaults() {
        let video: Video = serde_json::from_str(
            r#"{"id":"vid-1","title":"Finals game 3"}"#,
        )
        .unwrap();
        assert_eq!(video.status, ProcessingState::Queued);
        assert_eq!(video.processing_progress, 0);
        assert!(video.error_message.is_none());
    }
}
