//! Schedule pipeline: raw timetable strings to resolved travel times.
//!
//! The feed publishes departure lists per station and direction but never
//! the travel time between stations. This module parses those lists into
//! segments, infers each segment's travel time by matching it against the
//! opposite direction, and assembles the result onto the line.
//!
//! Everything here is synchronous and pure: one snapshot in, one
//! [`SubwayData`] out.

mod aggregate;
mod error;
mod extract;
mod infer;
mod parse;
mod segment;

pub use aggregate::{
    FeedSnapshot, LINE_ID, LINE_NAME, Line, LineSchedule, SubwayData, build_subway_data,
};
pub use error::{BuildError, ScheduleError};
pub use extract::{DirectionalSchedules, RawTimetable, StationRecord, extract_segments};
pub use infer::{DurationCache, PairKey, infer_durations};
pub use parse::{RawDepartures, parse_schedule};
pub use segment::{ResolvedSegment, Segment};
