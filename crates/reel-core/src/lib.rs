//! Highlight curation and processing-status reconciliation.
//!
//! Everything in this crate is pure, single-threaded state: the session
//! layer feeds it events and persists its decisions, but no I/O happens
//! here. This keeps the invariants (dense ordering, duration budgets,
//! terminal-state dominance) testable without any network.

pub mod error;
pub mod reconcile;
pub mod reel;
pub mod reorder;
pub mod select;
pub mod store;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use reconcile::{Applied, StatusChannel, StatusEvent, StatusReconciler, TrackedStatus};
pub use reel::{ReelRequest, ReelRequestBuilder};
pub use reorder::{AttemptOutcome, ReorderAttempt, ReorderProtocol};
pub use select::AutoSelector;
pub use store::HighlightStore;
