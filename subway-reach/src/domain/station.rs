//! Station, line and platform identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// The unique name of a station.
///
/// Names are the identity of a station throughout the graph document, so
/// they are kept verbatim (no trimming or case folding). Synthetic curve
/// shaping points use names of the form `aux_{x}_{y}`.
///
/// # Examples
///
/// ```
/// use subway_reach::domain::StationName;
///
/// let name = StationName::parse("Xizhimen").unwrap();
/// assert_eq!(name.as_str(), "Xizhimen");
///
/// // Empty names are rejected
/// assert!(StationName::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationName(String);

impl TryFrom<String> for StationName {
    type Error = InvalidStationName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Err(InvalidStationName {
                reason: "must not be empty",
            });
        }
        Ok(StationName(s))
    }
}

impl From<StationName> for String {
    fn from(name: StationName) -> Self {
        name.0
    }
}

impl StationName {
    /// Parse a station name, rejecting empty input.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        Self::try_from(s.to_string())
    }

    /// Name of the synthetic point at the given map coordinates.
    pub fn aux(x: f64, y: f64) -> Self {
        StationName(format!("aux_{x}_{y}"))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric identifier of a line.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u32);

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line-specific access point at a station (a "substation").
///
/// A station served by three lines has three platforms. Ordering is by
/// station name first, then line, which gives edge keys a canonical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Platform {
    pub station: StationName,
    pub line: LineId,
}

impl Platform {
    pub fn new(station: StationName, line: LineId) -> Self {
        Self { station, line }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.station, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    #[test]
    fn parse_valid_names() {
        assert!(StationName::parse("A").is_ok());
        assert!(StationName::parse("Dongzhimen").is_ok());
        assert!(StationName::parse("3号航站楼").is_ok());
    }

    #[test]
    fn reject_empty() {
        let err = StationName::parse("").unwrap_err();
        assert_eq!(err.to_string(), "invalid station name: must not be empty");
    }

    #[test]
    fn aux_names() {
        assert_eq!(StationName::aux(12.0, 40.5).as_str(), "aux_12_40.5");
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(format!("{}", name("PAD")), "PAD");
        assert_eq!(format!("{:?}", name("PAD")), "StationName(PAD)");
        assert_eq!(format!("{}", LineId(15)), "15");
        assert_eq!(format!("{:?}", LineId(15)), "LineId(15)");
    }

    #[test]
    fn platform_ordering_is_station_then_line() {
        let a2 = Platform::new(name("A"), LineId(2));
        let b1 = Platform::new(name("B"), LineId(1));
        let a1 = Platform::new(name("A"), LineId(1));
        let mut platforms = vec![b1.clone(), a2.clone(), a1.clone()];
        platforms.sort();
        assert_eq!(platforms, vec![a1, a2, b1]);
    }

    #[test]
    fn name_serde_validates() {
        assert_eq!(serde_json::to_string(&name("A")).unwrap(), r#""A""#);
        assert_eq!(serde_json::from_str::<StationName>(r#""A""#).unwrap(), name("A"));
        assert!(serde_json::from_str::<StationName>(r#""""#).is_err());
    }

    #[test]
    fn line_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&LineId(7)).unwrap(), "7");
        assert_eq!(serde_json::from_str::<LineId>("7").unwrap(), LineId(7));
    }
}
