//! In-memory ordered highlight collection for one video.

use std::collections::HashSet;

use reel_models::{Highlight, HighlightId};

use crate::error::{CoreError, CoreResult};

/// Owns the working highlight list for the currently open video.
///
/// The list is kept sorted by `order_index`, and `order_index` values are
/// dense (`0..n-1`, no gaps or duplicates) after every mutation. Aggregates
/// are derived from the list on demand and never stored separately.
#[derive(Debug, Clone, Default)]
pub struct HighlightStore {
    highlights: Vec<Highlight>,
}

impl HighlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working set with the collaborator's response.
    ///
    /// Each highlight is validated (duration repaired from its time bounds
    /// where drifted); a sparse or duplicated `order_index` assignment is
    /// repaired by re-densifying in the given order rather than rejected.
    /// A highlight with inverted time bounds rejects the whole load so the
    /// store is never left partially applied.
    pub fn load(&mut self, highlights: Vec<Highlight>) -> CoreResult<()> {
        let mut validated = Vec::with_capacity(highlights.len());
        for h in highlights {
            let h = h
                .validated()
                .map_err(|e| CoreError::invalid_highlight("load", e.to_string()))?;
            validated.push(h);
        }

        // Sort by the collaborator's order, then re-densify. The sort is
        // stable so duplicate indices keep their relative response order.
        validated.sort_by_key(|h| h.order_index);
        for (index, h) in validated.iter_mut().enumerate() {
            h.order_index = index as u32;
        }

        self.highlights = validated;
        Ok(())
    }

    /// All highlights in reel order.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn get(&self, id: &HighlightId) -> Option<&Highlight> {
        self.highlights.iter().find(|h| &h.id == id)
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    /// Flip a highlight's inclusion flag. Order is unaffected.
    ///
    /// Returns the new flag value.
    pub fn toggle_inclusion(&mut self, id: &HighlightId) -> CoreResult<bool> {
        let h = self
            .highlights
            .iter_mut()
            .find(|h| &h.id == id)
            .ok_or_else(|| CoreError::UnknownHighlight(id.to_string()))?;

        h.is_included = !h.is_included;
        Ok(h.is_included)
    }

    /// Reassign `order_index` to match the given full permutation of IDs.
    ///
    /// Rejects without touching the list when the sequence is not an exact
    /// permutation of the current ID set (missing, extra, or duplicate IDs).
    pub fn reorder(&mut self, new_order: &[HighlightId]) -> CoreResult<()> {
        if new_order.len() != self.highlights.len() {
            return Err(CoreError::NotAPermutation(format!(
                "expected {} ids, got {}",
                self.highlights.len(),
                new_order.len()
            )));
        }

        let mut seen = HashSet::with_capacity(new_order.len());
        for id in new_order {
            if !seen.insert(id) {
                return Err(CoreError::NotAPermutation(format!("duplicate id {id}")));
            }
            if self.get(id).is_none() {
                return Err(CoreError::NotAPermutation(format!("unknown id {id}")));
            }
        }

        for h in &mut self.highlights {
            // Position lookup cannot fail: sizes match and every id was found.
            if let Some(position) = new_order.iter().position(|id| id == &h.id) {
                h.order_index = position as u32;
            }
        }
        self.highlights.sort_by_key(|h| h.order_index);
        Ok(())
    }

    /// Overwrite inclusion flags from an auto-selection result.
    pub fn apply_selection(&mut self, selected: &HashSet<HighlightId>) {
        for h in &mut self.highlights {
            h.is_included = selected.contains(&h.id);
        }
    }

    /// Number of highlights currently included in the reel.
    pub fn selected_count(&self) -> usize {
        self.highlights.iter().filter(|h| h.is_included).count()
    }

    /// Summed duration of the included highlights, in seconds.
    pub fn selected_total_duration(&self) -> f64 {
        self.highlights
            .iter()
            .filter(|h| h.is_included)
            .map(|h| h.duration)
            .sum()
    }

    /// All IDs in reel order.
    pub fn ordered_ids(&self) -> Vec<HighlightId> {
        self.highlights.iter().map(|h| h.id.clone()).collect()
    }

    /// Included IDs in reel order.
    pub fn included_ids_in_order(&self) -> Vec<HighlightId> {
        self.highlights
            .iter()
            .filter(|h| h.is_included)
            .map(|h| h.id.clone())
            .collect()
    }
}
