//! Automatic budget-constrained highlight selection.

use std::collections::HashSet;

use reel_models::{Highlight, HighlightId};

/// Deterministic greedy selection under a duration budget.
///
/// Candidates are ranked by score descending, then start time ascending
/// (earlier moments win among equal scores), then ID as the final
/// tie-break so the result is reproducible for any input. A candidate that
/// would exceed the remaining budget is skipped but scanning continues, so
/// a shorter, lower-scored segment can still fit after a long one did not.
#[derive(Debug, Clone, Copy)]
pub struct AutoSelector {
    /// Duration budget in seconds
    pub target_duration: f64,
    /// Drop candidates scoring below this floor before the greedy pass
    pub min_score: Option<f64>,
}

impl AutoSelector {
    pub fn new(target_duration: f64) -> Self {
        Self {
            target_duration,
            min_score: None,
        }
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Compute the set of highlight IDs to include.
    ///
    /// This is a full re-derivation: the caller overwrites any manual
    /// selection with the result. A non-positive budget, or a budget no
    /// candidate fits, yields an empty set rather than an error.
    pub fn select(&self, highlights: &[Highlight]) -> HashSet<HighlightId> {
        let mut selected = HashSet::new();
        if self.target_duration <= 0.0 {
            return selected;
        }

        let mut candidates: Vec<&Highlight> = highlights
            .iter()
            .filter(|h| self.min_score.map_or(true, |floor| h.score >= floor))
            .collect();
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.start_time.total_cmp(&b.start_time))
                .then(a.id.cmp(&b.id))
        });

        let mut running = 0.0;
        for candidate in candidates {
            if running + candidate.duration <= self.target_duration {
                running += candidate.duration;
                selected.insert(candidate.id.clone());
            }
        }

        selected
    }
}
