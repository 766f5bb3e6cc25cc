//! # Data Model
//!
//! Core data structures for schedule conflict detection: calendar events,
//! their classification enums, and the identifiers that bind events to
//! people and physical resources. Events are validated at this boundary so
//! the detector rules never see a malformed interval.

use crate::error::EngineError;
use crate::temporal::{Instant, Interval};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a calendar event, assigned by the external event store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier for a person (organizer or attendee)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier for a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyId(pub String);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PropertyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier for a unit within a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub String);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UnitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UnitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What kind of appointment an event represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Maintenance,
    Inspection,
    TenantVisit,
    PropertyShowing,
    LeaseSigning,
    RentCollection,
    PropertyEvaluation,
    Meeting,
    Reminder,
    Other,
}

impl EventType {
    /// Whether this event type takes place on site at a property.
    ///
    /// Two overlapping site visits of the same type can be merged into one
    /// appointment; office work and reminders cannot.
    pub fn is_site_visit(&self) -> bool {
        matches!(
            self,
            Self::Maintenance | Self::Inspection | Self::PropertyShowing | Self::PropertyEvaluation
        )
    }
}

/// Lifecycle status of an event, owned by the external scheduling surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

/// Priority of an event, used to derive conflict severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Numeric weight used by the severity mapping (critical=4 down to low=1)
    pub fn weight(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

/// A person attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attendee {
    pub id: UserId,
    pub name: String,
    pub role: String,
}

impl Attendee {
    /// Create a new attendee
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
        }
    }
}

impl From<&str> for Attendee {
    fn from(value: &str) -> Self {
        Self::new(UserId(value.to_string()), value, "attendee")
    }
}

/// A single calendar occurrence
///
/// `property_id` and `unit_id` are optional: events without them are excluded
/// from the resource and travel checks but still participate in overlap checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: EventType,
    pub status: EventStatus,
    pub priority: Priority,
    /// The event's time range [start, end)
    pub window: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    /// The person whose calendar this occupies
    pub organizer_id: UserId,
    pub attendees: Vec<Attendee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Event {
    /// Create a new event with interval validation
    ///
    /// # Errors
    /// Returns `InvalidInterval` if `end <= start`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        kind: EventType,
        status: EventStatus,
        priority: Priority,
        start: Instant,
        end: Instant,
        organizer_id: impl Into<UserId>,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            id: id.into(),
            title: title.into(),
            description: None,
            kind,
            status,
            priority,
            window: Interval::new(start, end)?,
            property_id: None,
            unit_id: None,
            organizer_id: organizer_id.into(),
            attendees: Vec::new(),
            estimated_cost: None,
            notes: None,
        })
    }

    /// Bind the event to a property
    pub fn with_property(mut self, property_id: impl Into<PropertyId>) -> Self {
        self.property_id = Some(property_id.into());
        self
    }

    /// Bind the event to a unit within its property
    pub fn with_unit(mut self, unit_id: impl Into<UnitId>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach attendees
    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = attendees;
        self
    }

    /// Attach an estimated cost
    pub fn with_estimated_cost(mut self, cost: f64) -> Self {
        self.estimated_cost = Some(cost);
        self
    }

    /// Attach free-form notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Re-check the interval invariant.
    ///
    /// `Event::new` already enforces it, but events arriving through serde
    /// bypass the constructor, so the engine re-validates every snapshot
    /// before running detection.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.window.start >= self.window.end {
            return Err(EngineError::InvalidInterval {
                start: self.window.start,
                end: self.window.end,
            });
        }
        Ok(())
    }
}
