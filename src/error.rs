//! # Error Module
//!
//! Typed failures for the detection engine. The set is deliberately closed:
//! detection itself performs no I/O, so the only ways to fail are malformed
//! input intervals, malformed configuration, or a bad lookup on the
//! apply-suggestion surface. Optional fields an event lacks never error;
//! rules simply exclude the event from the checks that need them.

use crate::temporal::Instant;
use thiserror::Error;

/// All errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An event's time range is empty or inverted. Detection refuses to run
    /// over an invalid set rather than produce partial results.
    #[error("invalid interval: start ({start}) must be less than end ({end})")]
    InvalidInterval { start: Instant, end: Instant },

    /// A blackout window or travel buffer setting is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// The conflict id passed to `apply_suggestion` is not in the given list.
    #[error("unknown conflict id: {0}")]
    UnknownConflict(String),

    /// The suggestion index passed to `apply_suggestion` is out of range.
    #[error("conflict {conflict_id} has no suggestion at index {index}")]
    UnknownSuggestion { conflict_id: String, index: usize },
}
