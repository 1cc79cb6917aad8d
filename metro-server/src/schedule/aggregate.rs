//! Assembling resolved schedules into the served data model.
//!
//! The subway has exactly one line, so the line entity is hard-coded. Maps
//! are ordered so that the same snapshot always serializes to the same bytes.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Regime, ScheduleEvent, Station, StationId, regime_on};

use super::error::BuildError;
use super::extract::{StationRecord, extract_segments};
use super::infer::infer_durations;
use super::segment::ResolvedSegment;

/// Id of the single line.
pub const LINE_ID: &str = "0";

/// Name of the single line.
pub const LINE_NAME: &str = "default";

/// One immutable fetch of the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub stations: Vec<StationRecord>,
    pub events: Vec<ScheduleEvent>,
}

/// Resolved segments for each regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSchedule {
    pub normal: Vec<ResolvedSegment>,
    pub holiday: Vec<ResolvedSegment>,
}

impl LineSchedule {
    pub fn get(&self, regime: Regime) -> &[ResolvedSegment] {
        match regime {
            Regime::Normal => &self.normal,
            Regime::Holiday => &self.holiday,
        }
    }
}

/// A line: stations in physical order plus their schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub name: String,
    pub stations: Vec<StationId>,
    pub schedules: LineSchedule,
}

/// Everything clients need about the subway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubwayData {
    pub stations: BTreeMap<StationId, Station>,
    pub lines: BTreeMap<String, Line>,
    pub events: Vec<ScheduleEvent>,
}

impl SubwayData {
    /// The regime in effect on `date`.
    pub fn regime_on(&self, date: NaiveDate) -> Regime {
        regime_on(&self.events, date)
    }

    /// The single line.
    pub fn line(&self) -> Option<&Line> {
        self.lines.get(LINE_ID)
    }
}

/// Run the full schedule pipeline over one feed snapshot.
///
/// Stations are ordered by rank. Each regime is extracted and inferred on its
/// own; a fault in either aborts the build and names the regime.
pub fn build_subway_data(snapshot: &FeedSnapshot) -> Result<SubwayData, BuildError> {
    let mut records: Vec<&StationRecord> = snapshot.stations.iter().collect();
    records.sort_by_key(|r| r.station.order);

    check_unique(&records)?;

    let normal = build_regime(&records, Regime::Normal)?;
    let holiday = build_regime(&records, Regime::Holiday)?;

    let line = Line {
        id: LINE_ID.to_string(),
        name: LINE_NAME.to_string(),
        stations: records.iter().map(|r| r.station.id.clone()).collect(),
        schedules: LineSchedule { normal, holiday },
    };

    let stations = records
        .iter()
        .map(|r| (r.station.id.clone(), r.station.clone()))
        .collect();

    Ok(SubwayData {
        stations,
        lines: BTreeMap::from([(line.id.clone(), line)]),
        events: snapshot.events.clone(),
    })
}

/// Extract and infer one regime across all stations, in rank order.
fn build_regime(
    records: &[&StationRecord],
    regime: Regime,
) -> Result<Vec<ResolvedSegment>, BuildError> {
    let attach = |source| BuildError::Regime { regime, source };

    let mut segments = Vec::with_capacity(records.len() * 2);
    for record in records {
        segments.extend(extract_segments(record, regime).map_err(attach)?);
    }

    let resolved = infer_durations(segments).map_err(attach)?;
    debug!(%regime, segments = resolved.len(), "built regime schedule");

    Ok(resolved)
}

/// Station ids and ranks must both be unique.
fn check_unique(records: &[&StationRecord]) -> Result<(), BuildError> {
    let mut ids = HashSet::new();
    let mut ranks = HashSet::new();

    for record in records {
        let station = &record.station;
        if !ids.insert(&station.id) || !ranks.insert(station.order) {
            return Err(BuildError::DuplicateStation {
                id: station.id.clone(),
            });
        }
    }

    Ok(())
}
