//! # Calguard
//!
//! A temporal-first schedule conflict detection engine for property
//! management calendars.
//!
//! Given a snapshot of calendar events (maintenance visits, inspections,
//! showings, tenant meetings) the engine finds every scheduling problem in
//! the set: temporal overlaps, double-booked units, appointments inside
//! environmental blackout windows, and insufficient travel time between
//! properties. Each conflict carries a deterministic id (the basis for stable
//! dismissal), a severity derived from the events involved, and concrete
//! remediation suggestions that can be turned into mutation proposals for the
//! external event store.
//!
//! Detection is a pure, synchronous computation with no I/O: the caller
//! re-invokes [`ConflictEngine::detect`] whenever its event set or
//! configuration changes, and identical inputs always produce identical
//! output.

pub mod aggregator;
pub mod config;
pub mod conflicts;
pub mod error;
pub mod model;
pub mod patch;
pub mod rules;
pub mod temporal;

// Re-export main types for convenience
pub use config::{BlackoutWindow, ConfigOverrides, DetectionConfig};
pub use conflicts::{
    Conflict, ConflictId, ConflictKind, EventRef, Severity, Suggestion, SuggestionKind,
};
pub use error::EngineError;
pub use model::{
    Attendee, Event, EventId, EventStatus, EventType, Priority, PropertyId, UnitId, UserId,
};
pub use patch::EventPatch;
pub use temporal::{Instant, Interval};

use rustc_hash::FxHashSet;

/// Main API for schedule conflict detection.
///
/// Holds only validated configuration; every detection pass is a pure
/// function over the event snapshot the caller supplies, so one engine can
/// serve any number of concurrent callers without locking.
pub struct ConflictEngine {
    config: DetectionConfig,
}

impl ConflictEngine {
    /// Create an engine from validated configuration
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` when a blackout window is out of range
    /// or the travel buffer is negative
    pub fn new(config: DetectionConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine with default configuration (no blackout windows,
    /// 30 minute travel buffer, UTC locale)
    pub fn with_defaults() -> Self {
        Self {
            config: DetectionConfig::default(),
        }
    }

    /// The engine's configuration
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run all detector rules over an event snapshot.
    ///
    /// Every event interval is re-validated first; detection refuses to run
    /// over an invalid set rather than produce partial results. Conflicts
    /// whose id is in `dismissed` are excluded from the output.
    pub fn detect(
        &self,
        events: &[Event],
        dismissed: &FxHashSet<ConflictId>,
    ) -> Result<Vec<Conflict>, EngineError> {
        for event in events {
            event.validate()?;
        }
        Ok(aggregator::detect_conflicts(events, &self.config, dismissed))
    }

    /// Resolve a chosen suggestion into a mutation proposal for the external
    /// event store. See [`patch::apply_suggestion`].
    pub fn apply_suggestion(
        &self,
        conflicts: &[Conflict],
        conflict_id: &ConflictId,
        index: usize,
    ) -> Result<EventPatch, EngineError> {
        patch::apply_suggestion(conflicts, conflict_id, index)
    }
}
