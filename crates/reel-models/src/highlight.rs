//! Highlight segment models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ModelError;

/// Tolerance when checking that `duration == end_time - start_time`.
pub const DURATION_TOLERANCE: f64 = 1e-6;

/// Unique identifier for a highlight, stable within its video.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HighlightId(pub String);

impl HighlightId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for HighlightId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HighlightId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A scored, time-bounded segment detected in the video.
///
/// The full set is produced by the analysis service once per video.
/// `is_included` and `order_index` are the only client-mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Highlight {
    /// Unique ID within the video
    pub id: HighlightId,

    /// Segment start in seconds
    pub start_time: f64,

    /// Segment end in seconds (must be after start)
    pub end_time: f64,

    /// Segment length in seconds (`end_time - start_time`)
    pub duration: f64,

    /// Importance score assigned by the analyzer (0-100 in practice)
    pub score: f64,

    /// Category label (goal, save, foul, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Analyzer's description of the moment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Transcript excerpt the segment was detected from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_segment: Option<String>,

    /// Whether the segment is part of the reel
    #[serde(default)]
    pub is_included: bool,

    /// Position in the reel sequence (dense, 0-based, unique per video)
    pub order_index: u32,
}

impl Highlight {
    /// Duration derived from the time bounds.
    pub fn span_duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Validate the time bounds, repairing a drifted `duration`.
    ///
    /// A `duration` that disagrees with `end_time - start_time` beyond
    /// [`DURATION_TOLERANCE`] is recomputed rather than rejected. A segment
    /// with `end_time <= start_time` cannot be repaired and is an error.
    pub fn validated(mut self) -> Result<Self, ModelError> {
        if self.end_time <= self.start_time {
            return Err(ModelError::InvalidHighlight {
                id: self.id.to_string(),
                reason: format!(
                    "end_time {} is not after start_time {}",
                    self.end_time, self.start_time
                ),
            });
        }

        if (self.duration - self.span_duration()).abs() > DURATION_TOLERANCE {
            self.duration = self.span_duration();
        }

        Ok(self)
    }
}
