//! Request/response payloads for the processing service.

use serde::{Deserialize, Serialize};

use reel_models::{HighlightId, ProcessingState, VideoId};

/// Submit a video by URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FromUrlRequest {
    /// Source URL (YouTube or direct)
    pub url: String,
    /// Title override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Sport type hint for the analyzer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<String>,
}

/// Response from `GET /videos/{id}/status` (the poll fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStatusResponse {
    pub status: ProcessingState,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Partial highlight update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighlightPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_included: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

impl HighlightPatch {
    /// Patch that only flips the inclusion flag.
    pub fn inclusion(is_included: bool) -> Self {
        Self {
            is_included: Some(is_included),
            ..Self::default()
        }
    }
}

/// Persist a full display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub highlight_order: Vec<HighlightId>,
}

/// Server-side mirror of the automatic selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoSelectRequest {
    pub target_duration: u32,
    pub min_score: f64,
}

/// Server-side auto-select result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoSelectResponse {
    pub selected_count: u32,
    pub total_duration: f64,
    pub highlight_ids: Vec<HighlightId>,
}

/// Start reel generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReelRequest {
    pub highlight_ids: Vec<HighlightId>,
    pub max_duration: u32,
    pub include_transitions: bool,
}

/// Acknowledgement that a generation job was started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelJobHandle {
    pub message: String,
    pub video_id: VideoId,
}
