//! Domain types for the subway schedule.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod regime;
mod station;
mod time;

pub use regime::{Regime, ScheduleEvent, regime_on};
pub use station::{InvalidStationId, Position, Station, StationId};
pub use time::{MalformedTime, Seconds, encode_time};
