//! Response bodies that are not plain domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Regime;
use crate::schedule::ResolvedSegment;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The timetable in effect on a given day.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub regime: Regime,
    pub segments: Vec<ResolvedSegment>,
}
