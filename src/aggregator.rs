//! # Conflict Aggregator
//!
//! Orchestrates the four detector rules and produces the caller-facing
//! conflict list: concatenate rule output, drop duplicates and dismissed ids,
//! and order the survivors stably. The whole pipeline is a pure function of
//! `(events, config, dismissals)`; recomputation after any input change is
//! the caller's responsibility and always yields the same list for the same
//! inputs.

use crate::config::DetectionConfig;
use crate::conflicts::{Conflict, ConflictId};
use crate::model::Event;
use crate::rules;
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use tracing::debug;

/// Run every rule against the event snapshot and assemble the final list.
///
/// Conflicts whose id appears in `dismissed` are removed; nothing else is
/// ever silently dropped. Output ordering is severity descending, then
/// earliest participant start, then conflict id, which makes the order total
/// and reproducible.
pub fn detect_conflicts(
    events: &[Event],
    config: &DetectionConfig,
    dismissed: &FxHashSet<ConflictId>,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    conflicts.extend(rules::detect_time_overlaps(events, config));
    conflicts.extend(rules::detect_resource_conflicts(events, config));
    conflicts.extend(rules::detect_environmental_constraints(events, config));
    conflicts.extend(rules::detect_travel_gaps(events, config));
    let raw = conflicts.len();

    let mut seen: FxHashSet<ConflictId> = FxHashSet::default();
    conflicts.retain(|c| !dismissed.contains(&c.id) && seen.insert(c.id.clone()));

    conflicts.sort_by(|a, b| {
        Reverse(a.severity)
            .cmp(&Reverse(b.severity))
            .then_with(|| a.earliest_start().cmp(&b.earliest_start()))
            .then_with(|| a.id.cmp(&b.id))
    });

    debug!(
        events = events.len(),
        raw,
        dismissed = raw - conflicts.len(),
        returned = conflicts.len(),
        "conflict detection pass complete"
    );
    conflicts
}
