//! # Detector Rules
//!
//! The four conflict detectors. Each rule is a pure function
//! `(events, config) -> Vec<Conflict>` with no shared state, so rules can run
//! in any order. Every rule is total: zero or one events yield an empty list,
//! and events missing an optional field are excluded from the checks that
//! need it rather than causing an error.

use crate::config::{
    DetectionConfig, RESCHEDULE_GAP_SECONDS, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
    SWEEP_THRESHOLD,
};
use crate::conflicts::{Conflict, ConflictKind, EventRef, Severity, Suggestion};
use crate::model::{Event, EventType, PropertyId, UserId};
use crate::temporal::{gap_between, hour_of_day, intersect, is_overlapping, Instant, Interval};
use hashbrown::HashMap;

/// Find every pair of events whose time ranges overlap.
///
/// Severity is derived from the pair's priorities (max-priority-wins), and
/// each conflict carries a reschedule and a shorten suggestion.
pub fn detect_time_overlaps(events: &[Event], _config: &DetectionConfig) -> Vec<Conflict> {
    let windows: Vec<Interval> = events.iter().map(|e| e.window).collect();
    let mut conflicts = Vec::new();

    for (i, j) in overlapping_pairs(&windows) {
        let (a, b) = (&events[i], &events[j]);
        if a.id == b.id {
            continue;
        }
        conflicts.push(overlap_conflict(a, b));
    }
    conflicts
}

fn overlap_conflict(a: &Event, b: &Event) -> Conflict {
    let (earlier, later) = in_calendar_order(a, b);
    let shared = intersect(&earlier.window, &later.window)
        .map(|i| i.duration())
        .unwrap_or(0);
    let proposed = earlier.window.end + RESCHEDULE_GAP_SECONDS;

    let mut suggestions = vec![Suggestion::reschedule(
        format!(
            "Reschedule '{}' to start {} minutes after '{}' ends",
            later.title,
            RESCHEDULE_GAP_SECONDS / SECONDS_PER_MINUTE,
            earlier.title
        ),
        proposed,
    )];
    // shortening only makes sense when the later event actually starts
    // later; with equal starts the shortened interval would be empty
    if earlier.window.start < later.window.start {
        suggestions.push(Suggestion::adjust_duration(format!(
            "Shorten '{}' to end before '{}' starts",
            earlier.title, later.title
        )));
    }

    Conflict::new(
        ConflictKind::TimeOverlap,
        Severity::from_priority_pair(a.priority, b.priority),
        vec![EventRef::from(earlier), EventRef::from(later)],
        format!(
            "'{}' and '{}' overlap for {} minutes",
            earlier.title,
            later.title,
            shared / SECONDS_PER_MINUTE
        ),
        suggestions,
    )
}

/// Find pairs of overlapping events double-booking the same unit of the same
/// property.
///
/// A double-booked physical unit is always serious, so severity is fixed at
/// `High` regardless of the events' priorities.
pub fn detect_resource_conflicts(events: &[Event], _config: &DetectionConfig) -> Vec<Conflict> {
    let mut by_property: HashMap<&PropertyId, Vec<&Event>> = HashMap::new();
    for event in events {
        if let Some(property) = &event.property_id {
            by_property.entry(property).or_default().push(event);
        }
    }

    let mut conflicts = Vec::new();
    for (property, group) in by_property {
        let windows: Vec<Interval> = group.iter().map(|e| e.window).collect();
        for (i, j) in overlapping_pairs(&windows) {
            let (a, b) = (group[i], group[j]);
            if a.id == b.id || a.unit_id.is_none() || a.unit_id != b.unit_id {
                continue;
            }
            conflicts.push(resource_conflict(property, a, b));
        }
    }
    conflicts
}

fn resource_conflict(property: &PropertyId, a: &Event, b: &Event) -> Conflict {
    let (earlier, later) = in_calendar_order(a, b);
    let unit = earlier
        .unit_id
        .as_ref()
        .map(|u| u.0.as_str())
        .unwrap_or("?");

    let mut suggestions = vec![Suggestion::reschedule(
        format!(
            "Reschedule '{}' to a free slot after '{}' ends",
            later.title, earlier.title
        ),
        earlier.window.end,
    )];
    if mergeable(earlier, later) {
        suggestions.push(Suggestion::merge(format!(
            "Combine '{}' and '{}' into a single visit",
            earlier.title, later.title
        )));
    }

    Conflict::new(
        ConflictKind::ResourceConflict,
        Severity::High,
        vec![EventRef::from(earlier), EventRef::from(later)],
        format!(
            "Unit {} at property {} is double-booked by '{}' and '{}'",
            unit, property, earlier.title, later.title
        ),
        suggestions,
    )
}

/// Two events can be merged into one appointment when they are the same kind
/// of on-site work (e.g. two inspections of the same unit).
fn mergeable(a: &Event, b: &Event) -> bool {
    a.kind == b.kind && a.kind.is_site_visit()
}

/// Flag events whose local start hour falls inside a configured blackout
/// window.
///
/// Maintenance needs continuous power and water, so it is flagged `High`;
/// everything else is `Medium`.
pub fn detect_environmental_constraints(
    events: &[Event],
    config: &DetectionConfig,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for event in events {
        let hour = hour_of_day(event.window.start, config.utc_offset_minutes);
        let Some(window) = config
            .environmental_windows
            .iter()
            .find(|w| w.contains_hour(hour))
        else {
            continue;
        };

        let severity = if event.kind == EventType::Maintenance {
            Severity::High
        } else {
            Severity::Medium
        };

        let mut suggestions = Vec::new();
        if let Some((clear_hour, proposed)) = next_clear_start(event.window.start, hour, config) {
            suggestions.push(Suggestion::reschedule(
                format!(
                    "Reschedule '{}' to {:02}:00 local time, outside all blackout windows",
                    event.title, clear_hour
                ),
                proposed,
            ));
        }

        conflicts.push(Conflict::new(
            ConflictKind::EnvironmentalConstraint,
            severity,
            vec![EventRef::from(event)],
            format!(
                "'{}' starts at {:02}:00 local time, inside the {:02}:00-{:02}:00 blackout window",
                event.title, hour, window.start_hour, window.end_hour
            ),
            suggestions,
        ));
    }
    conflicts
}

/// Scan forward from the event's start for the first hour boundary clear of
/// every configured window. Returns None when all 24 hours are blacked out.
fn next_clear_start(
    start: Instant,
    start_hour: u8,
    config: &DetectionConfig,
) -> Option<(u8, Instant)> {
    let offset_seconds = config.utc_offset_minutes as i64 * SECONDS_PER_MINUTE;
    let local = start + offset_seconds;
    // the instant of the local hour boundary the event starts in
    let hour_base = start - local.rem_euclid(SECONDS_PER_HOUR);

    for step in 1..=24i64 {
        let candidate = ((start_hour as i64 + step) % 24) as u8;
        if !config
            .environmental_windows
            .iter()
            .any(|w| w.contains_hour(candidate))
        {
            return Some((candidate, hour_base + step * SECONDS_PER_HOUR));
        }
    }
    None
}

/// Flag consecutive same-organizer appointments at different properties with
/// less than the configured travel buffer between them.
pub fn detect_travel_gaps(events: &[Event], config: &DetectionConfig) -> Vec<Conflict> {
    let buffer = config.travel_buffer_seconds();
    let mut by_organizer: HashMap<&UserId, Vec<&Event>> = HashMap::new();
    for event in events {
        by_organizer.entry(&event.organizer_id).or_default().push(event);
    }

    let mut conflicts = Vec::new();
    for (_, mut itinerary) in by_organizer {
        itinerary.sort_by(|a, b| {
            a.window
                .start
                .cmp(&b.window.start)
                .then_with(|| a.id.cmp(&b.id))
        });

        for pair in itinerary.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let (Some(prev_property), Some(next_property)) =
                (&prev.property_id, &next.property_id)
            else {
                continue;
            };
            if prev_property == next_property || prev.id == next.id {
                continue;
            }
            let gap = gap_between(&prev.window, &next.window);
            if gap < buffer {
                conflicts.push(travel_conflict(prev, next, gap, buffer));
            }
        }
    }
    conflicts
}

fn travel_conflict(prev: &Event, next: &Event, gap: i64, buffer: i64) -> Conflict {
    Conflict::new(
        ConflictKind::TravelBuffer,
        Severity::Medium,
        vec![EventRef::from(prev), EventRef::from(next)],
        format!(
            "Only {} minutes between '{}' and '{}' at different properties; {} minutes of travel time required",
            gap.max(0) / SECONDS_PER_MINUTE,
            prev.title,
            next.title,
            buffer / SECONDS_PER_MINUTE
        ),
        vec![
            Suggestion::reschedule(
                format!(
                    "Shift '{}' to {} minutes after '{}' ends",
                    next.title,
                    buffer / SECONDS_PER_MINUTE,
                    prev.title
                ),
                prev.window.end + buffer,
            ),
            Suggestion::delegate(format!(
                "Delegate '{}' to an organizer without commitments at that time",
                next.title
            )),
        ],
    )
}

/// Order a pair by (start, id); the participant lists and suggestion targets
/// always refer to the earlier/later event in this order.
fn in_calendar_order<'a>(a: &'a Event, b: &'a Event) -> (&'a Event, &'a Event) {
    if (a.window.start, &a.id) <= (b.window.start, &b.id) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Enumerate indices of overlapping interval pairs, each pair as (i, j) with
/// i < j, sorted lexicographically.
///
/// The O(n^2) scan is the reference semantics; the sort-and-sweep path is an
/// optimization for large working sets and must produce the identical pair
/// list (checked by property tests).
pub fn overlapping_pairs(windows: &[Interval]) -> Vec<(usize, usize)> {
    if windows.len() >= SWEEP_THRESHOLD {
        overlapping_pairs_sweep(windows)
    } else {
        overlapping_pairs_naive(windows)
    }
}

/// Reference O(n^2) pairwise overlap scan.
pub fn overlapping_pairs_naive(windows: &[Interval]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..windows.len() {
        for j in i + 1..windows.len() {
            if is_overlapping(&windows[i], &windows[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// O(n log n + k) sweep over start-sorted intervals.
///
/// An interval joins the active set when the sweep reaches its start; every
/// active interval whose end is past that start overlaps it.
pub fn overlapping_pairs_sweep(windows: &[Interval]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..windows.len()).collect();
    order.sort_by_key(|&i| (windows[i].start, windows[i].end, i));

    let mut active: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();
    for &current in &order {
        active.retain(|&held| windows[held].end > windows[current].start);
        for &held in &active {
            pairs.push((held.min(current), held.max(current)));
        }
        active.push(current);
    }

    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlackoutWindow;
    use crate::model::{EventStatus, Priority};

    fn event(id: &str, start: Instant, end: Instant, priority: Priority) -> Event {
        Event::new(
            id,
            format!("Event {id}"),
            EventType::Meeting,
            EventStatus::Scheduled,
            priority,
            start,
            end,
            "mgr-1",
        )
        .unwrap()
    }

    fn hours(h: i64) -> Instant {
        h * SECONDS_PER_HOUR
    }

    #[test]
    fn test_overlap_rule_flags_overlapping_pair() {
        let events = vec![
            event("a", 100, 200, Priority::High),
            event("b", 150, 250, Priority::Low),
        ];
        let conflicts = detect_time_overlaps(&events, &DetectionConfig::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::TimeOverlap);
        assert_eq!(conflicts[0].severity, Severity::High);
        assert_eq!(conflicts[0].events[0].id.0, "a");
        assert_eq!(
            conflicts[0].suggestions[0].proposed_time,
            Some(200 + RESCHEDULE_GAP_SECONDS)
        );
    }

    #[test]
    fn test_overlap_rule_equal_starts_omit_shorten_suggestion() {
        let events = vec![
            event("z", 100, 200, Priority::Medium),
            event("a", 100, 300, Priority::Medium),
        ];
        let conflicts = detect_time_overlaps(&events, &DetectionConfig::default());
        assert_eq!(conflicts.len(), 1);
        // shortening the earlier event to the later one's start would leave
        // an empty interval, so only the reschedule remains
        assert_eq!(conflicts[0].suggestions.len(), 1);
        assert_eq!(
            conflicts[0].suggestions[0].kind,
            crate::conflicts::SuggestionKind::Reschedule
        );
    }

    #[test]
    fn test_overlap_rule_ignores_adjacent_events() {
        let events = vec![
            event("a", 100, 200, Priority::Medium),
            event("b", 200, 300, Priority::Medium),
        ];
        assert!(detect_time_overlaps(&events, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn test_rules_are_total_on_empty_and_singleton() {
        let config = DetectionConfig::default();
        for events in [vec![], vec![event("a", 100, 200, Priority::Low)]] {
            assert!(detect_time_overlaps(&events, &config).is_empty());
            assert!(detect_resource_conflicts(&events, &config).is_empty());
            assert!(detect_travel_gaps(&events, &config).is_empty());
        }
    }

    #[test]
    fn test_resource_rule_needs_shared_unit() {
        let base = |id: &str| {
            event(id, 100, 200, Priority::Low)
                .with_property("p1")
                .with_unit("u1")
        };
        let config = DetectionConfig::default();

        let shared = vec![base("a"), base("b")];
        let conflicts = detect_resource_conflicts(&shared, &config);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].severity, Severity::High);

        let different_units = vec![base("a"), base("b").with_unit("u2")];
        assert!(detect_resource_conflicts(&different_units, &config).is_empty());

        // events without resource bindings are excluded, not errors
        let unbound = vec![event("a", 100, 200, Priority::Low), base("b")];
        assert!(detect_resource_conflicts(&unbound, &config).is_empty());
    }

    #[test]
    fn test_resource_rule_merge_suggestion_for_matching_site_visits() {
        let inspection = |id: &str| {
            Event::new(
                id,
                format!("Inspection {id}"),
                EventType::Inspection,
                EventStatus::Scheduled,
                Priority::Medium,
                100,
                200,
                "mgr-1",
            )
            .unwrap()
            .with_property("p1")
            .with_unit("u1")
        };
        let conflicts = detect_resource_conflicts(
            &[inspection("a"), inspection("b")],
            &DetectionConfig::default(),
        );
        assert!(conflicts[0]
            .suggestions
            .iter()
            .any(|s| s.kind == crate::conflicts::SuggestionKind::Merge));
    }

    #[test]
    fn test_environmental_rule_severity_by_type() {
        let config = DetectionConfig {
            environmental_windows: vec![BlackoutWindow::new(10, 14).unwrap()],
            ..Default::default()
        };
        let maintenance = Event::new(
            "m",
            "Boiler service",
            EventType::Maintenance,
            EventStatus::Scheduled,
            Priority::Low,
            hours(11),
            hours(12),
            "mgr-1",
        )
        .unwrap();
        let meeting = event("mt", hours(11), hours(12), Priority::Low);

        let conflicts = detect_environmental_constraints(&[maintenance, meeting], &config);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].severity, Severity::High);
        assert_eq!(conflicts[1].severity, Severity::Medium);
        // proposed start lands on the first clear hour boundary (14:00)
        assert_eq!(conflicts[0].suggestions[0].proposed_time, Some(hours(14)));
    }

    #[test]
    fn test_environmental_rule_respects_locale_offset() {
        let config = DetectionConfig {
            environmental_windows: vec![BlackoutWindow::new(10, 14).unwrap()],
            utc_offset_minutes: 120,
            ..Default::default()
        };
        // 09:00 UTC is 11:00 local at UTC+2
        let conflicts = detect_environmental_constraints(
            &[event("a", hours(9), hours(10), Priority::Low)],
            &config,
        );
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn test_travel_rule_flags_tight_gap() {
        let events = vec![
            event("a", hours(8), hours(9), Priority::Low).with_property("p1"),
            event("b", hours(9) + 600, hours(10), Priority::Low).with_property("p2"),
        ];
        let conflicts = detect_travel_gaps(&events, &DetectionConfig::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::TravelBuffer);
        assert_eq!(conflicts[0].severity, Severity::Medium);
        assert_eq!(
            conflicts[0].suggestions[0].proposed_time,
            Some(hours(9) + 30 * SECONDS_PER_MINUTE)
        );
    }

    #[test]
    fn test_travel_rule_same_property_or_missing_property_excluded() {
        let config = DetectionConfig::default();
        let same = vec![
            event("a", hours(8), hours(9), Priority::Low).with_property("p1"),
            event("b", hours(9) + 600, hours(10), Priority::Low).with_property("p1"),
        ];
        assert!(detect_travel_gaps(&same, &config).is_empty());

        let missing = vec![
            event("a", hours(8), hours(9), Priority::Low).with_property("p1"),
            event("b", hours(9) + 600, hours(10), Priority::Low),
        ];
        assert!(detect_travel_gaps(&missing, &config).is_empty());
    }

    #[test]
    fn test_travel_rule_only_consecutive_pairs() {
        // a -> b is tight, a -> c is not consecutive
        let events = vec![
            event("a", hours(8), hours(9), Priority::Low).with_property("p1"),
            event("b", hours(9) + 600, hours(10), Priority::Low).with_property("p2"),
            event("c", hours(12), hours(13), Priority::Low).with_property("p3"),
        ];
        let conflicts = detect_travel_gaps(&events, &DetectionConfig::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].events[1].id.0, "b");
    }

    #[test]
    fn test_sweep_matches_naive_on_known_layout() {
        let windows: Vec<Interval> = [(0, 10), (5, 15), (10, 20), (12, 13), (30, 40)]
            .iter()
            .map(|&(s, e)| Interval::new(s, e).unwrap())
            .collect();
        assert_eq!(
            overlapping_pairs_naive(&windows),
            overlapping_pairs_sweep(&windows)
        );
    }
}
