//! Schedule pipeline error types.
//!
//! These errors describe faults in the feed data itself. They are distinct
//! from transport errors, which live in the feed module.

use crate::domain::{MalformedTime, Regime, StationId};

/// Errors raised while turning raw schedule strings into resolved segments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A departure time could not be encoded
    #[error(transparent)]
    MalformedTime(#[from] MalformedTime),

    /// A schedule string has no neighbour field
    #[error("empty schedule string {input:?}")]
    EmptySchedule { input: String },

    /// A neighbour id is not a valid station id
    #[error("invalid neighbour id in schedule string {input:?}")]
    InvalidNeighbour { input: String },

    /// No direction of a segment could be matched against its reciprocal
    #[error("no travel time could be inferred between {from} and {to}")]
    UnresolvedSegment { from: StationId, to: StationId },
}

/// Errors raised while building the served data from a feed snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A regime's pass was aborted
    #[error("{regime} schedule: {source}")]
    Regime {
        regime: Regime,
        #[source]
        source: ScheduleError,
    },

    /// Two stations share an id or a rank
    #[error("duplicate station {id} in feed")]
    DuplicateStation { id: StationId },
}
