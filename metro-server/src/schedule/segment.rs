//! Segment descriptors.
//!
//! A segment is one directional hop observed at one station: trains leave
//! `from` heading towards `next` at the listed times. The travel time is not
//! in the feed; it starts out pending and is filled in by inference.

use serde::{Deserialize, Serialize};

use crate::domain::{Seconds, StationId};

/// A segment whose travel time may not be known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub from: StationId,
    pub next: StationId,
    schedule: Vec<Seconds>,
    duration: Option<Seconds>,
}

impl Segment {
    /// Create a pending segment.
    ///
    /// Returns `None` if `schedule` is empty: a direction with no departures
    /// is not a segment.
    pub fn pending(from: StationId, next: StationId, schedule: Vec<Seconds>) -> Option<Self> {
        if schedule.is_empty() {
            return None;
        }

        Some(Self {
            from,
            next,
            schedule,
            duration: None,
        })
    }

    /// Departure times in feed order. Never empty.
    pub fn schedule(&self) -> &[Seconds] {
        &self.schedule
    }

    /// The first listed departure.
    pub fn first_departure(&self) -> Seconds {
        // Non-empty by construction
        self.schedule[0]
    }

    /// Inferred travel time, if resolved.
    pub fn duration(&self) -> Option<Seconds> {
        self.duration
    }

    pub(super) fn resolve(&mut self, duration: Seconds) {
        self.duration = Some(duration);
    }

    /// Convert into a resolved segment, if the duration is known.
    pub fn into_resolved(self) -> Option<ResolvedSegment> {
        let duration = self.duration?;
        Some(ResolvedSegment {
            id: self.from,
            next_id: self.next,
            duration,
            schedule: self.schedule,
        })
    }
}

/// A segment with a known travel time, as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSegment {
    /// The station the trains depart from.
    pub id: StationId,
    /// The station the trains head to.
    pub next_id: StationId,
    /// Travel time to `next_id` in seconds.
    pub duration: Seconds,
    /// Departure times in seconds since midnight.
    pub schedule: Vec<Seconds>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    #[test]
    fn empty_schedule_is_not_a_segment() {
        assert!(Segment::pending(id("A"), id("B"), vec![]).is_none());
    }

    #[test]
    fn pending_until_resolved() {
        let mut seg = Segment::pending(id("A"), id("B"), vec![28800, 29700]).unwrap();
        assert_eq!(seg.duration(), None);
        assert_eq!(seg.first_departure(), 28800);
        assert!(seg.clone().into_resolved().is_none());

        seg.resolve(180);
        let resolved = seg.into_resolved().unwrap();
        assert_eq!(resolved.duration, 180);
        assert_eq!(resolved.schedule, vec![28800, 29700]);
    }

    #[test]
    fn resolved_serializes_camel_case() {
        let resolved = ResolvedSegment {
            id: id("1"),
            next_id: id("2"),
            duration: 120,
            schedule: vec![21600],
        };

        let json = serde_json::to_string(&resolved).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","nextId":"2","duration":120,"schedule":[21600]}"#
        );
    }
}
