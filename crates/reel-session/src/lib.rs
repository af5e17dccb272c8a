//! Per-video curation session.
//!
//! A [`CurationSession`] owns the in-memory state for one open video: the
//! merged processing status and the highlight working set. Two background
//! tasks feed it (the WebSocket push channel and the fixed-interval poll
//! fallback) and all their events funnel through one mpsc receiver, so
//! the curation logic never runs concurrently with itself.

pub mod config;
pub mod error;
pub mod push;
pub mod session;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use session::{CurationSession, SessionEvent};
