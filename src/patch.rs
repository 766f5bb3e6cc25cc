//! # Patch Module
//!
//! Turns a chosen suggestion into a concrete mutation proposal for the
//! external event store. The engine never writes anywhere itself: applying a
//! patch and re-running detection is the only way a conflict is confirmed
//! resolved. If the mutated events still satisfy a rule's trigger, the same
//! conflict kind reappears (possibly under a new id, since participant
//! identity changed).

use crate::conflicts::{Conflict, ConflictId, EventRef, SuggestionKind};
use crate::error::EngineError;
use crate::model::EventId;
use crate::temporal::Instant;
use serde::{Deserialize, Serialize};

/// A proposed mutation for the external event store to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum EventPatch {
    /// Move an event, preserving its duration
    Reschedule {
        event_id: EventId,
        new_start: Instant,
        new_end: Instant,
    },
    /// Pull an event's end time forward
    AdjustEnd { event_id: EventId, new_end: Instant },
    /// Hand an event to a different organizer; the caller picks the target
    /// from its own user directory
    Delegate { event_id: EventId },
    /// Fold the absorbed event into the kept one
    Merge { keep: EventId, absorb: EventId },
}

/// Resolve `(conflict_id, suggestion_index)` against a detection result into
/// an [`EventPatch`].
///
/// # Errors
/// `UnknownConflict` if the id is not in `conflicts`; `UnknownSuggestion` if
/// the index is out of range or the suggestion cannot be materialized for the
/// conflict's participants.
pub fn apply_suggestion(
    conflicts: &[Conflict],
    conflict_id: &ConflictId,
    index: usize,
) -> Result<EventPatch, EngineError> {
    let conflict = conflicts
        .iter()
        .find(|c| &c.id == conflict_id)
        .ok_or_else(|| EngineError::UnknownConflict(conflict_id.0.clone()))?;

    let bad_suggestion = || EngineError::UnknownSuggestion {
        conflict_id: conflict_id.0.clone(),
        index,
    };
    let suggestion = conflict.suggestions.get(index).ok_or_else(bad_suggestion)?;

    // participants are ordered by (start, id); "later" is the reschedule and
    // delegate target, "earlier" is the one a duration adjustment shortens
    let earlier: &EventRef = conflict.events.first().ok_or_else(bad_suggestion)?;
    let later: &EventRef = conflict.events.last().ok_or_else(bad_suggestion)?;

    match suggestion.kind {
        SuggestionKind::Reschedule => {
            let new_start = suggestion.proposed_time.ok_or_else(bad_suggestion)?;
            Ok(EventPatch::Reschedule {
                event_id: later.id.clone(),
                new_start,
                new_end: new_start + later.window.duration(),
            })
        }
        SuggestionKind::AdjustDuration => {
            if conflict.events.len() < 2 {
                return Err(bad_suggestion());
            }
            Ok(EventPatch::AdjustEnd {
                event_id: earlier.id.clone(),
                new_end: later.window.start,
            })
        }
        SuggestionKind::Delegate => Ok(EventPatch::Delegate {
            event_id: later.id.clone(),
        }),
        SuggestionKind::Merge => {
            if conflict.events.len() < 2 {
                return Err(bad_suggestion());
            }
            Ok(EventPatch::Merge {
                keep: earlier.id.clone(),
                absorb: later.id.clone(),
            })
        }
    }
}
