//! Timetable time codec.
//!
//! The feed writes departure times as "HH:MM:SS" strings. The schedule engine
//! works on plain seconds since midnight, so this module only needs to go in
//! one direction.
//!
//! Post-midnight service may be written with hours past 23 ("25:10:00").
//! Such values are kept as-is: no modulo, no date rollover.

/// Seconds since midnight of the service day.
pub type Seconds = u32;

/// Error returned when a time field cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed time {input:?}: {reason}")]
pub struct MalformedTime {
    input: String,
    reason: &'static str,
}

impl MalformedTime {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The text that failed to encode.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Encode an "HH:MM:SS" string as seconds since midnight.
///
/// # Examples
///
/// ```
/// use metro_server::domain::encode_time;
///
/// assert_eq!(encode_time("01:02:03").unwrap(), 3723);
/// assert_eq!(encode_time("00:00:00").unwrap(), 0);
/// assert_eq!(encode_time("25:10:00").unwrap(), 90600);
///
/// assert!(encode_time("1:2").is_err());
/// assert!(encode_time("aa:00:00").is_err());
/// ```
pub fn encode_time(text: &str) -> Result<Seconds, MalformedTime> {
    let mut fields = text.split(':');

    let (Some(h), Some(m), Some(s), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(MalformedTime::new(text, "expected exactly three fields"));
    };

    let hours = parse_field(h).ok_or_else(|| MalformedTime::new(text, "invalid hours"))?;
    let minutes = parse_field(m).ok_or_else(|| MalformedTime::new(text, "invalid minutes"))?;
    let seconds = parse_field(s).ok_or_else(|| MalformedTime::new(text, "invalid seconds"))?;

    hours
        .checked_mul(3600)
        .and_then(|t| t.checked_add(minutes.checked_mul(60)?))
        .and_then(|t| t.checked_add(seconds))
        .ok_or_else(|| MalformedTime::new(text, "value out of range"))
}

/// Parse a field made only of ASCII digits.
fn parse_field(field: &str) -> Option<Seconds> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
