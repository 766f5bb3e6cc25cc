//! Shared helpers for integration tests: a fixed calendar day and terse
//! event builders.

#![allow(dead_code)]

use calguard::{Event, EventStatus, EventType, Instant, Priority};
use time::macros::datetime;

/// All scenario times are laid out on one fixed day.
pub fn day_start() -> Instant {
    datetime!(2026-03-02 00:00 UTC).unix_timestamp()
}

/// An instant at `hour:minute` on the fixed day
pub fn at(hour: i64, minute: i64) -> Instant {
    day_start() + (hour * 60 + minute) * 60
}

/// A medium-priority meeting between two clock times
pub fn meeting(id: &str, start: Instant, end: Instant) -> Event {
    Event::new(
        id,
        format!("Event {id}"),
        EventType::Meeting,
        EventStatus::Scheduled,
        Priority::Medium,
        start,
        end,
        "mgr-1",
    )
    .unwrap()
}

/// Same as [`meeting`] but with an explicit type and priority
pub fn typed_event(
    id: &str,
    kind: EventType,
    priority: Priority,
    start: Instant,
    end: Instant,
) -> Event {
    Event::new(
        id,
        format!("Event {id}"),
        kind,
        EventStatus::Scheduled,
        priority,
        start,
        end,
        "mgr-1",
    )
    .unwrap()
}
