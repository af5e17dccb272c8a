//! Processing-status reconciliation.
//!
//! Status updates arrive from two independent channels: the WebSocket push
//! channel and the polling fallback. The channels are unordered relative to
//! each other and both may repeat, so all merging goes through a single
//! pure transition function instead of two writers racing on shared state.

use serde::{Deserialize, Serialize};

use reel_models::ProcessingState;

/// Which channel delivered a status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusChannel {
    Push,
    Poll,
}

/// A status update from either channel, normalized to one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Delivering channel
    pub channel: StatusChannel,
    /// Reported processing state
    pub status: ProcessingState,
    /// Reported progress (0-100; clamped on apply)
    pub progress: u8,
    /// Stage description or failure message
    pub message: Option<String>,
}

impl StatusEvent {
    /// Create an event from the push channel.
    pub fn push(status: ProcessingState, progress: u8, message: Option<String>) -> Self {
        Self {
            channel: StatusChannel::Push,
            status,
            progress,
            message,
        }
    }

    /// Create an event from the poll fallback.
    pub fn poll(status: ProcessingState, progress: u8, message: Option<String>) -> Self {
        Self {
            channel: StatusChannel::Poll,
            status,
            progress,
            message,
        }
    }
}

/// The authoritative merged view of a video's processing status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackedStatus {
    /// Current state
    pub state: ProcessingState,
    /// Visible progress within the current stage (0-100)
    pub progress: u8,
    /// Latest stage description from the push channel
    pub detail: Option<String>,
    /// Failure message, set once `failed` is reached
    pub error_message: Option<String>,
}

/// What applying an event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The tracked state moved forward (possibly to a terminal state)
    State,
    /// Only the visible progress or stage detail changed
    Progress,
    /// Only the failure message changed
    Message,
    /// Stale or duplicate event; nothing changed
    NoOp,
}

impl Applied {
    pub fn is_noop(&self) -> bool {
        matches!(self, Applied::NoOp)
    }
}

/// Merges status events from both channels into one [`TrackedStatus`].
///
/// Rules:
/// - terminal states dominate: once `completed` or `failed` is entered, no
///   later event reverts the tracked state;
/// - among non-terminal states, an event strictly earlier in the canonical
///   sequence is dropped (a cached poll snapshot must not rewind the push
///   channel);
/// - progress is clamped to `[0, 100]` and only moves backwards on a
///   forward state transition, which resets the stage baseline;
/// - applying the same event twice is a no-op the second time.
#[derive(Debug, Clone, Default)]
pub struct StatusReconciler {
    current: TrackedStatus,
    error_from_push: bool,
}

impl StatusReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The merged status as of the last applied event.
    pub fn current(&self) -> &TrackedStatus {
        &self.current
    }

    /// Whether no further state transitions are possible.
    pub fn is_terminal(&self) -> bool {
        self.current.state.is_terminal()
    }

    /// Apply one event from either channel.
    pub fn apply(&mut self, event: StatusEvent) -> Applied {
        if self.current.state.is_terminal() {
            return self.apply_after_terminal(event);
        }

        let progress = event.progress.min(100);

        match event.status {
            ProcessingState::Completed => {
                self.current.state = ProcessingState::Completed;
                self.current.progress = 100;
                Applied::State
            }
            ProcessingState::Failed => {
                self.current.state = ProcessingState::Failed;
                self.current.error_message = event.message;
                self.error_from_push = event.channel == StatusChannel::Push
                    && self.current.error_message.is_some();
                Applied::State
            }
            incoming => {
                let current_rank = self.current.state.stage_rank();
                let incoming_rank = incoming.stage_rank();

                if incoming_rank < current_rank {
                    // Stale snapshot from the slower channel
                    return Applied::NoOp;
                }

                if incoming_rank > current_rank {
                    // Forward transition resets the progress baseline
                    self.current.state = incoming;
                    self.current.progress = progress;
                    if event.message.is_some() {
                        self.current.detail = event.message;
                    }
                    return Applied::State;
                }

                // Same stage: progress only moves forward
                let mut applied = Applied::NoOp;
                if progress > self.current.progress {
                    self.current.progress = progress;
                    applied = Applied::Progress;
                }
                if event.message.is_some() && event.message != self.current.detail {
                    self.current.detail = event.message;
                    applied = Applied::Progress;
                }
                applied
            }
        }
    }

    /// Once terminal, the only admissible change is filling in or upgrading
    /// the failure message. A missing message is taken from whichever
    /// channel supplies one first; an already-set poll message is upgraded
    /// to the push channel's wording, never the reverse.
    fn apply_after_terminal(&mut self, event: StatusEvent) -> Applied {
        if self.current.state != ProcessingState::Failed
            || event.status != ProcessingState::Failed
        {
            return Applied::NoOp;
        }
        let message = match event.message {
            Some(message) => message,
            None => return Applied::NoOp,
        };

        match event.channel {
            StatusChannel::Push if !self.error_from_push => {
                self.error_from_push = true;
                if self.current.error_message.as_deref() != Some(message.as_str()) {
                    self.current.error_message = Some(message);
                    return Applied::Message;
                }
            }
            StatusChannel::Poll if self.current.error_message.is_none() => {
                self.current.error_message = Some(message);
                return Applied::Message;
            }
            _ => {}
        }
        Applied::NoOp
    }
}
