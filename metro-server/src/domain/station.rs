//! Station identity and metadata.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// Opaque station identifier assigned by the feed.
///
/// Ids are compared and ordered as plain strings. The only requirement is
/// that they are non-empty and carry no surrounding whitespace, since the
/// schedule strings reference neighbours by this exact text.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationId;
///
/// let id = StationId::parse("12").unwrap();
/// assert_eq!(id.as_str(), "12");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse(" 12").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.trim() != s {
            return Err(InvalidStationId {
                reason: "must not have surrounding whitespace",
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// A station on the line.
///
/// `order` is the feed-assigned rank: ascending order is the physical order
/// of stations along the line. `name` is keyed by language code and always
/// has at least one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub order: i64,
    pub name: BTreeMap<String, String>,
    pub position: Position,
}

impl Station {
    /// Display name in the given language, if the feed provided one.
    pub fn name_in(&self, language: &str) -> Option<&str> {
        self.name.get(language).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StationId::parse("1").is_ok());
        assert!(StationId::parse("42").is_ok());
        assert!(StationId::parse("alatau").is_ok());
    }

    #[test]
    fn reject_empty_and_padded() {
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse(" 1").is_err());
        assert!(StationId::parse("1 ").is_err());
        assert!(StationId::parse("\t").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = StationId::parse("10").unwrap();
        let b = StationId::parse("9").unwrap();
        assert!(a < b);
    }

    #[test]
    fn debug_and_display() {
        let id = StationId::parse("7").unwrap();
        assert_eq!(format!("{id}"), "7");
        assert_eq!(format!("{id:?}"), "StationId(7)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = StationId::parse("7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn name_lookup() {
        let station = Station {
            id: StationId::parse("1").unwrap(),
            order: 1,
            name: BTreeMap::from([("en".to_string(), "Raiymbek Batyr".to_string())]),
            position: Position {
                latitude: 43.27,
                longitude: 76.94,
            },
        };

        assert_eq!(station.name_in("en"), Some("Raiymbek Batyr"));
        assert_eq!(station.name_in("kk"), None);
    }
}
