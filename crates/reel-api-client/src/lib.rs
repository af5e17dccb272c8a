//! Client for the video processing service.
//!
//! This crate wraps the service's REST surface: video submission, status
//! polling, highlight fetch and mutation, reorder persistence, server-side
//! auto-select, and reel generation. The push channel lives in
//! `reel-session`; this client is plain request/response.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, ApiClientConfig};
pub use error::{ApiError, ApiResult};
pub use types::{
    AutoSelectRequest, AutoSelectResponse, FromUrlRequest, GenerateReelRequest, HighlightPatch,
    ReelJobHandle, ReorderRequest, VideoStatusResponse,
};
