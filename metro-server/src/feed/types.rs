//! Metro API response DTOs.
//!
//! These types map directly to the metro API JSON. Every station field is
//! published as a string, numbers included. Schedule columns are sometimes
//! omitted for terminal stations, so they default to empty.

use serde::{Deserialize, Serialize};

/// Response from the `all` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroResponse {
    pub stations: Vec<MetroStation>,

    #[serde(default)]
    pub holidays: Vec<MetroHoliday>,

    /// Free-form station notices. Not used by the schedule.
    #[serde(default)]
    pub info: Vec<MetroInfo>,
}

/// One station record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroStation {
    /// Station id referenced by schedule strings.
    pub id: String,

    /// Secondary id used by the upstream app. Not referenced by schedules.
    #[serde(default)]
    pub station_id: String,

    /// Russian name.
    #[serde(default)]
    pub name: String,

    /// English name.
    #[serde(default)]
    pub name_eng: String,

    /// Kazakh name.
    #[serde(default)]
    pub name_kaz: String,

    pub latitude: String,
    pub longitude: String,

    /// Position along the line, as a decimal string.
    pub station_order: String,

    #[serde(default)]
    pub next_station_schedule_workday: String,
    #[serde(default)]
    pub prev_station_schedule_workday: String,
    #[serde(default)]
    pub next_station_schedule_holiday: String,
    #[serde(default)]
    pub prev_station_schedule_holiday: String,
}

/// A public holiday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroHoliday {
    pub name: String,

    /// "YYYY-MM-DD", sometimes followed by a time part.
    pub date: String,

    #[serde(default, rename = "type")]
    pub kind: String,
}

/// A station notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub station_id: String,
    #[serde(default)]
    pub type_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_kaz: String,
    #[serde(default)]
    pub content_eng: String,
}
