//! Default constants for calguard configuration.
//!
//! All magic numbers are centralized here with documentation.

// =============================================================================
// Travel Defaults
// =============================================================================

/// Default minimum gap required between appointments at different properties
/// assigned to the same organizer.
pub const DEFAULT_TRAVEL_BUFFER_MINUTES: i64 = 30;

// =============================================================================
// Suggestion Defaults
// =============================================================================

/// Gap inserted when proposing to reschedule the later event of an
/// overlapping pair after the earlier one ends.
pub const RESCHEDULE_GAP_SECONDS: i64 = 30 * 60;

// =============================================================================
// Time Constants
// =============================================================================

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3600;
pub const HOURS_PER_DAY: u8 = 24;

/// Largest UTC offset a locale can configure, in minutes (UTC+14).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

// =============================================================================
// Detection Tuning
// =============================================================================

/// Event-set size above which overlap detection switches from the O(n^2)
/// reference scan to the sort-and-sweep path. Both paths produce identical
/// pair lists; the threshold only trades constant factors.
pub const SWEEP_THRESHOLD: usize = 64;
