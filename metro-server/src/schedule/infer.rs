//! Travel time inference.
//!
//! The feed only lists departure times per station and direction. The time
//! it takes to get from A to B is recovered by matching A's departure towards
//! B against B's departures back towards A: the first train documented at B
//! after A's first departure is taken to be the same run.
//!
//! Travel time is assumed symmetric, so a duration is stored once per
//! unordered station pair. Segments that cannot be matched on their own
//! (several reciprocals, none at all, or no later departure) are left pending
//! and adopt the pair's duration in a second pass once the opposite direction
//! has resolved. A pair that never resolves in either direction is an error.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::domain::{Seconds, StationId};

use super::error::ScheduleError;
use super::segment::{ResolvedSegment, Segment};

/// Unordered pair of stations identifying one stretch of track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(StationId, StationId);

impl PairKey {
    /// Key for the track between `a` and `b`, in either direction.
    pub fn new(a: &StationId, b: &StationId) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }

    fn of(segment: &Segment) -> Self {
        Self::new(&segment.from, &segment.next)
    }
}

/// Durations resolved so far within one inference pass.
#[derive(Debug, Default)]
pub struct DurationCache {
    durations: HashMap<PairKey, Seconds>,
}

impl DurationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PairKey) -> Option<Seconds> {
        self.durations.get(key).copied()
    }

    pub fn insert(&mut self, key: PairKey, duration: Seconds) {
        self.durations.insert(key, duration);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

/// Resolve the travel time of every segment of one regime.
///
/// `segments` must hold every segment of the regime, since reciprocals are
/// looked up among them. The output keeps the input order. Matching visits
/// segments in a canonical order (by origin, then neighbour, then schedule),
/// so the result does not depend on how the input was ordered.
///
/// # Errors
///
/// Returns [`ScheduleError::UnresolvedSegment`] for the first segment (in
/// input order) whose pair could not be resolved from either direction.
pub fn infer_durations(mut segments: Vec<Segment>) -> Result<Vec<ResolvedSegment>, ScheduleError> {
    let mut cache = DurationCache::new();

    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&segments[a], &segments[b]);
        (&a.from, &a.next, a.schedule()).cmp(&(&b.from, &b.next, b.schedule()))
    });

    // First pass: fast path through the cache, otherwise match the reciprocal.
    for i in order {
        let key = PairKey::of(&segments[i]);

        if let Some(duration) = cache.get(&key) {
            segments[i].resolve(duration);
            continue;
        }

        match match_reciprocal(&segments, i) {
            Some(duration) => {
                trace!(
                    from = %segments[i].from,
                    to = %segments[i].next,
                    duration,
                    "resolved segment"
                );
                cache.insert(key, duration);
                segments[i].resolve(duration);
            }
            None => {
                debug!(
                    from = %segments[i].from,
                    to = %segments[i].next,
                    "segment pending, no unambiguous reciprocal"
                );
            }
        }
    }

    // Second pass: pending segments adopt whatever the opposite direction found.
    let mut resolved = Vec::with_capacity(segments.len());
    for mut segment in segments {
        if segment.duration().is_none() {
            let Some(duration) = cache.get(&PairKey::of(&segment)) else {
                return Err(ScheduleError::UnresolvedSegment {
                    from: segment.from,
                    to: segment.next,
                });
            };
            segment.resolve(duration);
        }
        resolved.extend(segment.into_resolved());
    }

    debug!(
        segments = resolved.len(),
        pairs = cache.len(),
        "inferred travel times"
    );

    Ok(resolved)
}

/// Match segment `i` against its unique reciprocal.
///
/// Returns `None` unless exactly one other segment departs `next` towards
/// `from` and lists a departure strictly after this segment's first one.
/// The reciprocal's times are scanned in feed order.
fn match_reciprocal(segments: &[Segment], i: usize) -> Option<Seconds> {
    let segment = &segments[i];

    let mut candidates = segments
        .iter()
        .enumerate()
        .filter(|&(j, r)| j != i && r.from == segment.next && r.next == segment.from)
        .map(|(_, r)| r);

    let reciprocal = candidates.next()?;
    if candidates.next().is_some() {
        return None;
    }

    let departure = segment.first_departure();
    let arrival = reciprocal
        .schedule()
        .iter()
        .copied()
        .find(|&t| t > departure)?;

    Some(arrival - departure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn seg(from: &str, next: &str, times: &[Seconds]) -> Segment {
        Segment::pending(id(from), id(next), times.to_vec()).unwrap()
    }

    fn duration_of(resolved: &[ResolvedSegment], from: &str, next: &str) -> Seconds {
        resolved
            .iter()
            .find(|r| r.id.as_str() == from && r.next_id.as_str() == next)
            .map(|r| r.duration)
            .unwrap()
    }

    const H8: Seconds = 8 * 3600;

    #[test]
    fn pair_key_is_unordered() {
        assert_eq!(PairKey::new(&id("A"), &id("B")), PairKey::new(&id("B"), &id("A")));
        assert_ne!(PairKey::new(&id("A"), &id("B")), PairKey::new(&id("A"), &id("C")));
    }

    #[test]
    fn cache_roundtrip() {
        let mut cache = DurationCache::new();
        assert!(cache.is_empty());

        cache.insert(PairKey::new(&id("A"), &id("B")), 120);
        assert_eq!(cache.get(&PairKey::new(&id("B"), &id("A"))), Some(120));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn first_arrival_strictly_after_departure() {
        // A leaves towards B at 08:00:00; B lists 08:03:00 and 08:20:00 towards A.
        let segments = vec![
            seg("A", "B", &[H8]),
            seg("B", "A", &[H8 + 180, H8 + 1200]),
        ];

        let resolved = infer_durations(segments).unwrap();

        assert_eq!(duration_of(&resolved, "A", "B"), 180);
        assert_eq!(duration_of(&resolved, "B", "A"), 180);
    }

    #[test]
    fn equal_time_does_not_match() {
        let segments = vec![seg("A", "B", &[H8]), seg("B", "A", &[H8, H8 + 240])];

        let resolved = infer_durations(segments).unwrap();
        assert_eq!(duration_of(&resolved, "A", "B"), 240);
    }

    #[test]
    fn reciprocal_is_scanned_in_feed_order() {
        // Unsorted feed: the first later time in feed order wins, not the smallest.
        let segments = vec![
            seg("A", "B", &[H8]),
            seg("B", "A", &[H8 + 600, H8 + 120]),
        ];

        let resolved = infer_durations(segments).unwrap();
        assert_eq!(duration_of(&resolved, "A", "B"), 600);
    }

    #[test]
    fn output_keeps_input_order() {
        let segments = vec![
            seg("C", "B", &[H8]),
            seg("A", "B", &[H8]),
            seg("B", "A", &[H8 + 60]),
            seg("B", "C", &[H8 + 90]),
        ];

        let resolved = infer_durations(segments).unwrap();
        let order: Vec<(&str, &str)> = resolved
            .iter()
            .map(|r| (r.id.as_str(), r.next_id.as_str()))
            .collect();

        assert_eq!(order, vec![("C", "B"), ("A", "B"), ("B", "A"), ("B", "C")]);
    }

    #[test]
    fn ambiguous_direction_resolves_in_second_pass() {
        // Two segments leave B towards A, so A→B is ambiguous. Each B→A has a
        // single reciprocal (A→B) and resolves, seeding the pair.
        let segments = vec![
            seg("A", "B", &[H8, H8 + 900]),
            seg("B", "A", &[H8 + 300]),
            seg("B", "A", &[H8 + 400]),
        ];

        let resolved = infer_durations(segments).unwrap();

        // B→A at 08:05:00 matches A's 08:15:00 departure.
        assert!(resolved.iter().all(|r| r.duration == 600));
    }

    #[test]
    fn wrap_past_midnight_falls_back_to_reverse() {
        // A's first departure is after every B departure, so A→B has no match.
        let segments = vec![
            seg("A", "B", &[23 * 3600]),
            seg("B", "A", &[H8, H8 + 600]),
        ];

        let resolved = infer_durations(segments).unwrap();

        // B→A at 08:00:00 matches A's 23:00:00 departure.
        assert_eq!(duration_of(&resolved, "A", "B"), 15 * 3600);
        assert_eq!(duration_of(&resolved, "B", "A"), 15 * 3600);
    }

    #[test]
    fn unresolvable_pair_is_an_error() {
        // Two reciprocals each way: nothing is ever unambiguous.
        let segments = vec![
            seg("A", "B", &[H8]),
            seg("A", "B", &[H8 + 60]),
            seg("B", "A", &[H8 + 120]),
            seg("B", "A", &[H8 + 180]),
        ];

        let err = infer_durations(segments).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnresolvedSegment {
                from: id("A"),
                to: id("B"),
            }
        );
    }

    #[test]
    fn missing_reciprocal_is_an_error() {
        let segments = vec![seg("A", "B", &[H8])];

        assert!(matches!(
            infer_durations(segments),
            Err(ScheduleError::UnresolvedSegment { .. })
        ));
    }

    #[test]
    fn no_later_departure_either_way_is_an_error() {
        let segments = vec![seg("A", "B", &[H8 + 600]), seg("B", "A", &[H8 + 900])];
        assert!(infer_durations(segments).is_ok());

        let segments = vec![seg("A", "B", &[H8 + 600]), seg("B", "A", &[H8 + 600])];
        assert!(infer_durations(segments).is_err());
    }

    #[test]
    fn empty_input() {
        assert!(infer_durations(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn three_station_line() {
        let segments = vec![
            seg("1", "2", &[H8, H8 + 600]),
            seg("2", "1", &[H8 + 120, H8 + 720]),
            seg("2", "3", &[H8 + 150, H8 + 750]),
            seg("3", "2", &[H8 + 330, H8 + 930]),
        ];

        let resolved = infer_durations(segments).unwrap();

        assert_eq!(duration_of(&resolved, "1", "2"), 120);
        assert_eq!(duration_of(&resolved, "2", "1"), 120);
        assert_eq!(duration_of(&resolved, "2", "3"), 180);
        assert_eq!(duration_of(&resolved, "3", "2"), 180);
    }
}
