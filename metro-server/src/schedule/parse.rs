//! Raw schedule string parsing.
//!
//! The feed encodes one direction of service at one station as
//! `<neighbourId>,<HH:MM:SS>,<HH:MM:SS>,...`. The first field names the
//! station the trains are heading to; the rest are departure times.

use crate::domain::{Seconds, StationId, encode_time};

use super::error::ScheduleError;

/// One parsed directional schedule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDepartures {
    /// The neighbour the departures head towards.
    pub neighbour: StationId,
    /// Departure times in feed order. Not sorted.
    pub times: Vec<Seconds>,
}

/// Parse a raw schedule string.
///
/// A neighbour with no times is a valid result: the station simply has no
/// service in that direction. Callers are expected to drop such entries.
///
/// # Examples
///
/// ```
/// use metro_server::schedule::parse_schedule;
///
/// let parsed = parse_schedule("B,08:00:00,08:15:00").unwrap();
/// assert_eq!(parsed.neighbour.as_str(), "B");
/// assert_eq!(parsed.times, vec![28800, 29700]);
///
/// let parsed = parse_schedule("B").unwrap();
/// assert!(parsed.times.is_empty());
///
/// assert!(parse_schedule("").is_err());
/// ```
pub fn parse_schedule(input: &str) -> Result<RawDepartures, ScheduleError> {
    let mut fields = input.split(',').map(str::trim);

    let neighbour = match fields.next() {
        Some(first) if !first.is_empty() => first,
        _ => {
            return Err(ScheduleError::EmptySchedule {
                input: input.to_string(),
            });
        }
    };

    let neighbour = StationId::parse(neighbour).map_err(|_| ScheduleError::InvalidNeighbour {
        input: input.to_string(),
    })?;

    let times = fields.map(encode_time).collect::<Result<Vec<_>, _>>()?;

    Ok(RawDepartures { neighbour, times })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_neighbour_and_times() {
        let parsed = parse_schedule("B,08:00:00,08:15:00").unwrap();
        assert_eq!(parsed.neighbour.as_str(), "B");
        assert_eq!(parsed.times, vec![28800, 29700]);
    }

    #[test]
    fn neighbour_without_times() {
        let parsed = parse_schedule("B").unwrap();
        assert_eq!(parsed.neighbour.as_str(), "B");
        assert!(parsed.times.is_empty());
    }

    #[test]
    fn feed_order_is_preserved() {
        let parsed = parse_schedule("7,09:00:00,08:00:00,08:30:00").unwrap();
        assert_eq!(parsed.times, vec![32400, 28800, 30600]);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let parsed = parse_schedule(" 7 , 06:00:00,\t06:10:00 ").unwrap();
        assert_eq!(parsed.neighbour.as_str(), "7");
        assert_eq!(parsed.times, vec![21600, 22200]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            parse_schedule(""),
            Err(ScheduleError::EmptySchedule { .. })
        ));
        assert!(matches!(
            parse_schedule("   "),
            Err(ScheduleError::EmptySchedule { .. })
        ));
    }

    #[test]
    fn missing_neighbour_is_rejected() {
        assert!(matches!(
            parse_schedule(",08:00:00"),
            Err(ScheduleError::EmptySchedule { .. })
        ));
    }

    #[test]
    fn malformed_time_is_rejected() {
        assert!(matches!(
            parse_schedule("B,08:00"),
            Err(ScheduleError::MalformedTime(_))
        ));
        assert!(matches!(
            parse_schedule("B,08:00:00,"),
            Err(ScheduleError::MalformedTime(_))
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn hhmmss() -> impl Strategy<Value = (String, Seconds)> {
        (0u32..26, 0u32..60, 0u32..60)
            .prop_map(|(h, m, s)| (format!("{:02}:{:02}:{:02}", h, m, s), h * 3600 + m * 60 + s))
    }

    proptest! {
        /// Times come back in the order they were written
        #[test]
        fn preserves_times(
            neighbour in "[0-9]{1,3}",
            times in prop::collection::vec(hhmmss(), 0..20)
        ) {
            let mut input = neighbour.clone();
            for (text, _) in &times {
                input.push(',');
                input.push_str(text);
            }

            let parsed = parse_schedule(&input).unwrap();
            let expected: Vec<Seconds> = times.iter().map(|(_, secs)| *secs).collect();
            prop_assert_eq!(parsed.neighbour.as_str(), neighbour.as_str());
            prop_assert_eq!(parsed.times, expected);
        }
    }
}
