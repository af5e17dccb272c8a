//! Optimistic reorder persistence protocol.
//!
//! During an active editing session the client's local order is the source
//! of truth for display. Persistence runs behind it: at most one attempt is
//! in flight, a newer local order supersedes an older attempt's response,
//! and a failed attempt never rolls the local order back.

use reel_models::HighlightId;

/// A persistence attempt handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderAttempt {
    /// Monotonic attempt number; responses are matched against the latest
    pub epoch: u64,
    /// The order to send
    pub order: Vec<HighlightId>,
}

/// How a completed attempt was accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The attempt's order is now the persisted watermark
    Persisted,
    /// Persistence failed; local order stays presented, watermark unchanged
    Failed,
    /// A newer attempt was issued meanwhile; this response is ignored
    Superseded,
}

/// Tracks the local order against the last order known to be persisted.
#[derive(Debug, Clone)]
pub struct ReorderProtocol {
    local: Vec<HighlightId>,
    persisted: Vec<HighlightId>,
    next_epoch: u64,
    in_flight: Option<ReorderAttempt>,
}

impl ReorderProtocol {
    /// Start tracking from an order already known to both sides.
    pub fn new(initial: Vec<HighlightId>) -> Self {
        Self {
            local: initial.clone(),
            persisted: initial,
            next_epoch: 0,
            in_flight: None,
        }
    }

    /// Record a locally applied order (already validated by the store).
    pub fn apply_local(&mut self, order: Vec<HighlightId>) {
        self.local = order;
    }

    /// Begin a persistence attempt for the current local order.
    ///
    /// A still-outstanding earlier attempt is not cancelled, but its
    /// response will be reported as [`AttemptOutcome::Superseded`].
    pub fn begin_attempt(&mut self) -> ReorderAttempt {
        let attempt = ReorderAttempt {
            epoch: self.next_epoch,
            order: self.local.clone(),
        };
        self.next_epoch += 1;
        self.in_flight = Some(attempt.clone());
        attempt
    }

    /// Account for a finished attempt.
    pub fn complete_attempt(&mut self, epoch: u64, success: bool) -> AttemptOutcome {
        match &self.in_flight {
            Some(attempt) if attempt.epoch == epoch => {
                let attempt = self.in_flight.take().unwrap_or(ReorderAttempt {
                    epoch,
                    order: self.local.clone(),
                });
                if success {
                    self.persisted = attempt.order;
                    AttemptOutcome::Persisted
                } else {
                    AttemptOutcome::Failed
                }
            }
            _ => AttemptOutcome::Superseded,
        }
    }

    /// Whether the local order has diverged from the persisted watermark.
    ///
    /// A reconnect handler uses this to re-issue the local order
    /// (last-local-order-wins) instead of adopting the server's copy.
    pub fn is_dirty(&self) -> bool {
        self.local != self.persisted
    }

    /// Whether an attempt is awaiting its response.
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn local_order(&self) -> &[HighlightId] {
        &self.local
    }

    pub fn persisted_order(&self) -> &[HighlightId] {
        &self.persisted
    }
}
