//! Conversion from metro API DTOs to the schedule pipeline's input.
//!
//! Parsing failures become [`FeedError::InvalidRecord`] naming the record.
//! Schedule strings are passed through untouched; they are parsed by the
//! schedule pipeline so that their faults are attributed to a regime.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Position, ScheduleEvent, Station, StationId};
use crate::schedule::{DirectionalSchedules, FeedSnapshot, RawTimetable, StationRecord};

use super::error::FeedError;
use super::types::{MetroHoliday, MetroResponse, MetroStation};

/// Convert a full API response into a feed snapshot.
pub fn convert_response(response: &MetroResponse) -> Result<FeedSnapshot, FeedError> {
    let stations = response
        .stations
        .iter()
        .map(convert_station)
        .collect::<Result<Vec<_>, _>>()?;

    let events = response
        .holidays
        .iter()
        .map(convert_holiday)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeedSnapshot { stations, events })
}

/// Convert one station DTO.
pub fn convert_station(dto: &MetroStation) -> Result<StationRecord, FeedError> {
    let invalid = |message: String| FeedError::InvalidRecord {
        record: "station",
        id: dto.id.clone(),
        message,
    };

    let id = StationId::parse(dto.id.trim()).map_err(|e| invalid(e.to_string()))?;

    let order = dto
        .station_order
        .trim()
        .parse::<i64>()
        .map_err(|_| {
            invalid(format!(
                "station_order {:?} is not an integer",
                dto.station_order
            ))
        })?;

    let latitude = parse_coordinate(&dto.latitude).ok_or_else(|| {
        invalid(format!("latitude {:?} is not a finite number", dto.latitude))
    })?;
    let longitude = parse_coordinate(&dto.longitude).ok_or_else(|| {
        invalid(format!("longitude {:?} is not a finite number", dto.longitude))
    })?;

    let name: BTreeMap<String, String> = [
        ("ru", &dto.name),
        ("en", &dto.name_eng),
        ("kk", &dto.name_kaz),
    ]
    .into_iter()
    .filter(|(_, name)| !name.trim().is_empty())
    .map(|(lang, name)| (lang.to_string(), name.trim().to_string()))
    .collect();

    if name.is_empty() {
        return Err(invalid("station has no name in any language".to_string()));
    }

    Ok(StationRecord {
        station: Station {
            id,
            order,
            name,
            position: Position {
                latitude,
                longitude,
            },
        },
        timetable: RawTimetable {
            workday: DirectionalSchedules {
                prev: dto.prev_station_schedule_workday.clone(),
                next: dto.next_station_schedule_workday.clone(),
            },
            holiday: DirectionalSchedules {
                prev: dto.prev_station_schedule_holiday.clone(),
                next: dto.next_station_schedule_holiday.clone(),
            },
        },
    })
}

/// Convert one holiday DTO. Any time part of the date is ignored.
pub fn convert_holiday(dto: &MetroHoliday) -> Result<ScheduleEvent, FeedError> {
    let day = dto
        .date
        .trim()
        .split(['T', ' '])
        .next()
        .unwrap_or_default();

    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| FeedError::InvalidRecord {
        record: "holiday",
        id: dto.name.clone(),
        message: format!("date {:?}: {}", dto.date, e),
    })?;

    Ok(ScheduleEvent::holiday(dto.name.trim(), date))
}

fn parse_coordinate(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
