//! # Conflicts Module
//!
//! The caller-facing conflict types and the deterministic identity scheme
//! that makes dismissals stable. A conflict id is a pure function of the
//! conflict kind and the identity-relevant fields of its participant events,
//! so the same scheduling problem always carries the same id across runs,
//! and any mutation of a participant retires the old id (and with it any
//! dismissal of that id).

use crate::model::{Event, EventId, Priority, PropertyId, UnitId, UserId};
use crate::temporal::{Instant, Interval};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which detector rule produced a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    TimeOverlap,
    ResourceConflict,
    EnvironmentalConstraint,
    TravelBuffer,
}

impl ConflictKind {
    /// Stable tag used in id derivation and display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeOverlap => "time_overlap",
            Self::ResourceConflict => "resource_conflict",
            Self::EnvironmentalConstraint => "environmental_constraint",
            Self::TravelBuffer => "travel_buffer",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious a conflict is (low < medium < high < critical)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Classify a priority weight: >=4 critical, >=3 high, >=2 medium, else low
    pub fn from_weight(weight: u8) -> Self {
        match weight {
            w if w >= 4 => Self::Critical,
            3 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Severity of a two-event conflict: max-priority-wins, then thresholds
    pub fn from_priority_pair(a: Priority, b: Priority) -> Self {
        Self::from_weight(a.weight().max(b.weight()))
    }
}

/// Snapshot of the participant fields a conflict needs: enough to render a
/// message, order the output, and derive the conflict's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRef {
    pub id: EventId,
    pub title: String,
    pub window: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    pub organizer_id: UserId,
}

impl EventRef {
    /// The identity-relevant fields, serialized into the id hash input.
    /// Title, status, and priority are display concerns and deliberately
    /// excluded: retitling an event does not retire its dismissals.
    fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.id,
            self.window.start,
            self.window.end,
            self.property_id.as_ref().map(|p| p.0.as_str()).unwrap_or(""),
            self.unit_id.as_ref().map(|u| u.0.as_str()).unwrap_or(""),
            self.organizer_id,
        )
    }
}

impl From<&Event> for EventRef {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            window: event.window,
            property_id: event.property_id.clone(),
            unit_id: event.unit_id.clone(),
            organizer_id: event.organizer_id.clone(),
        }
    }
}

/// Deterministic identifier for a conflict
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConflictId(pub String);

impl ConflictId {
    /// Derive the id from the conflict kind and its participants.
    ///
    /// Participants are sorted by event id before hashing so the id does not
    /// depend on the order a rule happened to enumerate the pair in.
    pub fn derive(kind: ConflictKind, participants: &[EventRef]) -> Self {
        let mut fingerprints: Vec<String> =
            participants.iter().map(EventRef::fingerprint).collect();
        fingerprints.sort();

        let mut input = String::from(kind.as_str());
        for fingerprint in &fingerprints {
            input.push('\n');
            input.push_str(fingerprint);
        }
        Self(short_hash(&input))
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a suggestion proposes doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Reschedule,
    AdjustDuration,
    Delegate,
    Merge,
}

/// A proposed, not-yet-applied remediation for a conflict
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    /// A concrete new start time; populated only for `Reschedule`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_time: Option<Instant>,
}

impl Suggestion {
    /// Propose moving an event to a concrete new start time
    pub fn reschedule(message: impl Into<String>, proposed_time: Instant) -> Self {
        Self {
            kind: SuggestionKind::Reschedule,
            message: message.into(),
            proposed_time: Some(proposed_time),
        }
    }

    /// Propose shortening an event
    pub fn adjust_duration(message: impl Into<String>) -> Self {
        Self {
            kind: SuggestionKind::AdjustDuration,
            message: message.into(),
            proposed_time: None,
        }
    }

    /// Propose handing an event to a different organizer
    pub fn delegate(message: impl Into<String>) -> Self {
        Self {
            kind: SuggestionKind::Delegate,
            message: message.into(),
            proposed_time: None,
        }
    }

    /// Propose merging two compatible events into one appointment
    pub fn merge(message: impl Into<String>) -> Self {
        Self {
            kind: SuggestionKind::Merge,
            message: message.into(),
            proposed_time: None,
        }
    }
}

/// A detected scheduling problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: ConflictId,
    pub kind: ConflictKind,
    pub severity: Severity,
    /// The 1-2 events involved, ordered by (start, id)
    pub events: Vec<EventRef>,
    pub message: String,
    pub suggestions: Vec<Suggestion>,
}

impl Conflict {
    /// Create a new conflict, deriving its deterministic id
    pub fn new(
        kind: ConflictKind,
        severity: Severity,
        mut events: Vec<EventRef>,
        message: impl Into<String>,
        suggestions: Vec<Suggestion>,
    ) -> Self {
        // same (start, id) order the rules use to pick earlier/later, so the
        // apply surface can address participants positionally
        events.sort_by(|a, b| {
            a.window
                .start
                .cmp(&b.window.start)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self {
            id: ConflictId::derive(kind, &events),
            kind,
            severity,
            events,
            message: message.into(),
            suggestions,
        }
    }

    /// The earliest participant start time, used for output ordering
    pub fn earliest_start(&self) -> Instant {
        self.events
            .iter()
            .map(|e| e.window.start)
            .min()
            .unwrap_or(i64::MAX)
    }
}

/// FNV-1a 64 over the id input, rendered as 13 base32 characters
fn short_hash(input: &str) -> String {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    encode_base32(hash)
}

fn encode_base32(value: u64) -> String {
    const ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
    let mut chars = Vec::with_capacity(13);
    let mut remaining = value;
    for _ in 0..13 {
        let idx = (remaining & 31) as usize;
        chars.push(ALPHABET[idx] as char);
        remaining >>= 5;
    }
    chars.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventStatus, EventType};

    fn event_ref(id: &str, start: Instant, end: Instant) -> EventRef {
        EventRef::from(
            &Event::new(
                id,
                format!("Event {id}"),
                EventType::Meeting,
                EventStatus::Scheduled,
                Priority::Medium,
                start,
                end,
                "mgr-1",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_id_is_deterministic() {
        let a = event_ref("evt-a", 100, 200);
        let b = event_ref("evt-b", 150, 250);

        let first = ConflictId::derive(ConflictKind::TimeOverlap, &[a.clone(), b.clone()]);
        let second = ConflictId::derive(ConflictKind::TimeOverlap, &[a, b]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_id_ignores_participant_order() {
        let a = event_ref("evt-a", 100, 200);
        let b = event_ref("evt-b", 150, 250);

        let forward = ConflictId::derive(ConflictKind::TimeOverlap, &[a.clone(), b.clone()]);
        let reversed = ConflictId::derive(ConflictKind::TimeOverlap, &[b, a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_id_varies_by_kind() {
        let a = event_ref("evt-a", 100, 200);
        let b = event_ref("evt-b", 150, 250);

        let overlap = ConflictId::derive(ConflictKind::TimeOverlap, &[a.clone(), b.clone()]);
        let resource = ConflictId::derive(ConflictKind::ResourceConflict, &[a, b]);
        assert_ne!(overlap, resource);
    }

    #[test]
    fn test_id_retired_by_identity_mutation() {
        let a = event_ref("evt-a", 100, 200);
        let b = event_ref("evt-b", 150, 250);
        let before = ConflictId::derive(ConflictKind::TimeOverlap, &[a.clone(), b.clone()]);

        let mut moved = b;
        moved.window = Interval::new(300, 400).unwrap();
        let after = ConflictId::derive(ConflictKind::TimeOverlap, &[a, moved]);
        assert_ne!(before, after);
    }

    #[test]
    fn test_id_survives_retitle() {
        let a = event_ref("evt-a", 100, 200);
        let mut retitled = a.clone();
        retitled.title = "Renamed".to_string();

        let before = ConflictId::derive(ConflictKind::EnvironmentalConstraint, &[a]);
        let after = ConflictId::derive(ConflictKind::EnvironmentalConstraint, &[retitled]);
        assert_eq!(before, after);
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::from_weight(4), Severity::Critical);
        assert_eq!(Severity::from_weight(3), Severity::High);
        assert_eq!(Severity::from_weight(2), Severity::Medium);
        assert_eq!(Severity::from_weight(1), Severity::Low);
    }

    #[test]
    fn test_severity_takes_pair_max() {
        assert_eq!(
            Severity::from_priority_pair(Priority::Low, Priority::Critical),
            Severity::Critical
        );
        assert_eq!(
            Severity::from_priority_pair(Priority::Medium, Priority::Low),
            Severity::Medium
        );
    }

    #[test]
    fn test_conflict_orders_participants() {
        let later = event_ref("evt-a", 150, 250);
        let earlier = event_ref("evt-b", 100, 200);
        let conflict = Conflict::new(
            ConflictKind::TimeOverlap,
            Severity::Medium,
            vec![later, earlier],
            "overlap",
            vec![],
        );
        assert_eq!(conflict.events[0].id, EventId::from("evt-b"));
        assert_eq!(conflict.earliest_start(), 100);
    }

    #[test]
    fn test_equal_start_participants_ordered_by_id() {
        // ends in the opposite order of the ids; the id must break the tie,
        // not the end time
        let short = event_ref("z", 100, 200);
        let long = event_ref("a", 100, 300);
        let conflict = Conflict::new(
            ConflictKind::TimeOverlap,
            Severity::Medium,
            vec![short, long],
            "overlap",
            vec![],
        );
        assert_eq!(conflict.events[0].id, EventId::from("a"));
        assert_eq!(conflict.events[1].id, EventId::from("z"));
    }
}
