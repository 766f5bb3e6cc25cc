//! # Temporal Module
//!
//! Provides the interval arithmetic the detector rules are built on.
//! All times are normalized to UTC epoch seconds for consistency and correctness.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use time::{OffsetDateTime, UtcOffset};

/// Represents a temporal instant as UTC epoch seconds
/// Using i64 to support both past and future times, and to avoid floating point issues
pub type Instant = i64;

/// A temporal interval [start, end) where start < end
///
/// Intervals are half-open: the start time is inclusive, the end time is exclusive.
/// This ensures that back-to-back appointments [t0, t1) and [t1, t2) never count
/// as overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Start time (inclusive)
    pub start: Instant,
    /// End time (exclusive)
    pub end: Instant,
}

impl Interval {
    /// Create a new interval with validation
    ///
    /// # Errors
    /// Returns `InvalidInterval` if start >= end (zero-length intervals are not allowed)
    pub fn new(start: Instant, end: Instant) -> Result<Self, EngineError> {
        if start >= end {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create an interval from UTC OffsetDateTime instances
    pub fn from_utc_datetimes(
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Self, EngineError> {
        Self::new(start.unix_timestamp(), end.unix_timestamp())
    }

    /// Check if this interval contains a specific instant
    pub fn contains(&self, instant: Instant) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Get the duration of this interval in seconds
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Calculate the overlap duration between this interval and another.
    /// Returns 0 if the intervals don't overlap.
    #[inline]
    pub fn overlap_duration(&self, other: &Interval) -> i64 {
        let overlap_start = self.start.max(other.start);
        let overlap_end = self.end.min(other.end);
        if overlap_start < overlap_end {
            overlap_end - overlap_start
        } else {
            0
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ordering => ordering,
        }
    }
}

/// Check if two intervals overlap
#[inline]
pub fn is_overlapping(a: &Interval, b: &Interval) -> bool {
    // Half-open intervals overlap unless one ends at or before the other's start.
    a.start < b.end && b.start < a.end
}

/// Check if two intervals are adjacent (meet)
#[inline]
pub fn is_adjacent(a: &Interval, b: &Interval) -> bool {
    a.end == b.start || b.end == a.start
}

/// Compute the intersection of two intervals
/// Returns None if the intervals don't overlap
pub fn intersect(a: &Interval, b: &Interval) -> Option<Interval> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);

    if start < end {
        Some(Interval { start, end })
    } else {
        None
    }
}

/// The free time in seconds between two intervals, in calendar order.
/// Negative when the intervals overlap.
#[inline]
pub fn gap_between(prev: &Interval, next: &Interval) -> i64 {
    next.start - prev.end
}

/// Extract the local hour of day (0-23) for an instant at a fixed UTC offset.
///
/// The offset comes from configuration (the calendar's locale); instants
/// outside the representable datetime range fall back to hour 0 rather than
/// erroring, since they cannot match any sane blackout window anyway.
pub fn hour_of_day(instant: Instant, utc_offset_minutes: i32) -> u8 {
    let offset =
        UtcOffset::from_whole_seconds(utc_offset_minutes * 60).unwrap_or(UtcOffset::UTC);
    match OffsetDateTime::from_unix_timestamp(instant) {
        Ok(dt) => dt.to_offset(offset).hour(),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_interval_creation() {
        let interval = Interval::new(100, 200).unwrap();
        assert_eq!(interval.start, 100);
        assert_eq!(interval.end, 200);
    }

    #[test]
    fn test_interval_validation() {
        assert!(Interval::new(100, 100).is_err());
        assert!(Interval::new(200, 100).is_err());
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(100, 200).unwrap();
        assert!(interval.contains(150));
        assert!(interval.contains(100)); // 100 is included in [100, 200)
        assert!(!interval.contains(200)); // 200 is excluded from [100, 200)
        assert!(!interval.contains(50));
    }

    #[test]
    fn test_overlapping_intervals() {
        let a = Interval::new(100, 200).unwrap();
        let b = Interval::new(150, 250).unwrap();
        let c = Interval::new(200, 300).unwrap();
        let d = Interval::new(300, 400).unwrap();

        assert!(is_overlapping(&a, &b));
        assert!(!is_overlapping(&a, &c)); // adjacent, not overlapping
        assert!(!is_overlapping(&a, &d));
    }

    #[test]
    fn test_intersection() {
        let a = Interval::new(100, 200).unwrap();
        let b = Interval::new(150, 250).unwrap();
        let c = Interval::new(300, 400).unwrap();

        let intersection = intersect(&a, &b).unwrap();
        assert_eq!(intersection.start, 150);
        assert_eq!(intersection.end, 200);

        assert!(intersect(&a, &c).is_none());
    }

    #[test]
    fn test_gap_between() {
        let a = Interval::new(100, 200).unwrap();
        let b = Interval::new(260, 300).unwrap();
        let c = Interval::new(150, 250).unwrap();

        assert_eq!(gap_between(&a, &b), 60);
        assert_eq!(gap_between(&a, &c), -50);
    }

    #[test]
    fn test_from_utc_datetimes() {
        let interval = Interval::from_utc_datetimes(
            datetime!(2026-03-02 09:00 UTC),
            datetime!(2026-03-02 10:00 UTC),
        )
        .unwrap();
        assert_eq!(interval.duration(), 3600);
    }

    #[test]
    fn test_hour_of_day() {
        let eleven = datetime!(2026-03-02 11:00 UTC).unix_timestamp();
        assert_eq!(hour_of_day(eleven, 0), 11);
        assert_eq!(hour_of_day(eleven, 120), 13);
        assert_eq!(hour_of_day(eleven, -720), 23);
    }
}
