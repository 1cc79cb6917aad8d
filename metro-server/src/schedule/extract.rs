//! Segment extraction from station records.

use crate::domain::{Regime, Station};

use super::error::ScheduleError;
use super::parse::parse_schedule;
use super::segment::Segment;

/// The two raw directional strings of one timetable column pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionalSchedules {
    /// Departures towards the previous station on the line.
    pub prev: String,
    /// Departures towards the next station on the line.
    pub next: String,
}

/// Raw timetables for one station, as published by the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTimetable {
    pub workday: DirectionalSchedules,
    pub holiday: DirectionalSchedules,
}

impl RawTimetable {
    /// The feed columns that carry a regime.
    pub fn for_regime(&self, regime: Regime) -> &DirectionalSchedules {
        match regime {
            Regime::Normal => &self.workday,
            Regime::Holiday => &self.holiday,
        }
    }
}

/// A station together with its raw timetable strings.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station: Station,
    pub timetable: RawTimetable,
}

/// Extract the pending segments a station contributes to a regime.
///
/// Directions are emitted prev first, then next. A blank raw string means the
/// station has no neighbour that way (a terminal) and is skipped without
/// parsing. A neighbour listed with no departures is dropped.
pub fn extract_segments(
    record: &StationRecord,
    regime: Regime,
) -> Result<Vec<Segment>, ScheduleError> {
    let columns = record.timetable.for_regime(regime);
    let mut segments = Vec::with_capacity(2);

    for raw in [&columns.prev, &columns.next] {
        if raw.trim().is_empty() {
            continue;
        }

        let parsed = parse_schedule(raw)?;
        if let Some(segment) =
            Segment::pending(record.station.id.clone(), parsed.neighbour, parsed.times)
        {
            segments.push(segment);
        }
    }

    Ok(segments)
}
