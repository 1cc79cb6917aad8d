//! Schedule regimes and the calendar events that select them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which timetable variant is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Regular workday service.
    Normal,
    /// Weekend and public holiday service.
    Holiday,
}

impl Regime {
    /// Every regime, in output order.
    pub const ALL: [Regime; 2] = [Regime::Normal, Regime::Holiday];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Normal => "normal",
            Regime::Holiday => "holiday",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dated event forcing a regime, e.g. a public holiday.
///
/// If today's date matches `date`, the line runs on `regime`; otherwise it
/// runs on [`Regime::Normal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub regime: Regime,
}

impl ScheduleEvent {
    /// A holiday on the given date.
    pub fn holiday(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            regime: Regime::Holiday,
        }
    }
}

/// The regime in effect on `date` given a list of events.
pub fn regime_on(events: &[ScheduleEvent], date: NaiveDate) -> Regime {
    events
        .iter()
        .find(|e| e.date == date)
        .map(|e| e.regime)
        .unwrap_or(Regime::Normal)
}
