//! Session configuration.

use std::time::Duration;

/// Configuration for a curation session.
///
/// Components receive this explicitly; nothing in the session layer reads
/// the environment directly except [`SessionConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint base (a per-session client ID is appended)
    pub ws_url: String,
    /// Poll fallback cadence; active regardless of push-channel health
    pub poll_interval: Duration,
    /// Pause between reaching `completed` and fetching highlights, so the
    /// confirmation is visible. A UX policy, not a correctness requirement.
    pub completed_grace: Duration,
    /// Default reel duration budget in seconds
    pub reel_max_duration: u32,
    /// Whether generated reels include transitions
    pub include_transitions: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8000/ws".to_string(),
            poll_interval: Duration::from_secs(5),
            completed_grace: Duration::from_millis(1500),
            reel_max_duration: 180,
            include_transitions: true,
        }
    }
}

impl SessionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ws_url: std::env::var("REEL_WS_URL").unwrap_or(defaults.ws_url),
            poll_interval: std::env::var("REEL_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            completed_grace: std::env::var("REEL_COMPLETED_GRACE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.completed_grace),
            reel_max_duration: std::env::var("REEL_MAX_DURATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reel_max_duration),
            include_transitions: defaults.include_transitions,
        }
    }
}
