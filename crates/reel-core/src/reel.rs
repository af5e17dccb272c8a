//! Final reel generation request assembly.

use reel_models::HighlightId;

use crate::error::{CoreError, CoreResult};
use crate::store::HighlightStore;

/// The assembled generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelRequest {
    /// Included highlight IDs in reel order
    pub highlight_ids: Vec<HighlightId>,
    /// Target reel duration in seconds
    pub max_duration: u32,
    /// Whether to render transitions between clips
    pub include_transitions: bool,
}

/// Assembles generation requests and enforces the single-flight rule.
///
/// The processing service runs one reel-generation job per video at a time,
/// so a second build while one request is outstanding is rejected with a
/// distinct busy error instead of being queued.
#[derive(Debug, Clone)]
pub struct ReelRequestBuilder {
    max_duration: u32,
    include_transitions: bool,
    in_flight: bool,
}

impl ReelRequestBuilder {
    pub fn new(max_duration: u32) -> Self {
        Self {
            max_duration,
            include_transitions: true,
            in_flight: false,
        }
    }

    pub fn include_transitions(mut self, include: bool) -> Self {
        self.include_transitions = include;
        self
    }

    pub fn max_duration(&self) -> u32 {
        self.max_duration
    }

    /// Assemble a request from the store's current selection and mark it
    /// in flight.
    pub fn build(&mut self, store: &HighlightStore) -> CoreResult<ReelRequest> {
        if self.in_flight {
            return Err(CoreError::GenerationInFlight);
        }

        let highlight_ids = store.included_ids_in_order();
        if highlight_ids.is_empty() {
            return Err(CoreError::EmptySelection);
        }

        self.in_flight = true;
        Ok(ReelRequest {
            highlight_ids,
            max_duration: self.max_duration,
            include_transitions: self.include_transitions,
        })
    }

    /// Mark the outstanding request finished (success or failure).
    pub fn complete(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
