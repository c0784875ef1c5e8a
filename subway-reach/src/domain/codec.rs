//! String wire form for platform and segment keys.
//!
//! Inside the crate keys are the structured [`Platform`], [`Segment`] and
//! [`EdgeKey`] types. The render layer addresses platforms and segments with
//! compact JSON strings, and this module converts between the two.
//!
//! Decoding never fails hard: a malformed key decodes to an empty record
//! (or `None`) and a warning is logged, so a bad label degrades the map
//! instead of ending the session.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{EdgeKey, LineId, Platform, Segment, StationName};

/// Decoded substation key, as it appears on the wire.
///
/// `st` is a transient status flag used by the render layer; it takes no
/// part in platform identity. Absent fields are omitted when encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<StationName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pl: Option<LineId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st: Option<bool>,
}

impl SubstationRecord {
    /// The platform this record names, if both parts are present.
    pub fn platform(&self) -> Option<Platform> {
        match (&self.name, self.pl) {
            (Some(name), Some(pl)) => Some(Platform::new(name.clone(), pl)),
            _ => None,
        }
    }

    /// Whether this is the empty record produced by a failed decode.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.pl.is_none() && self.st.is_none()
    }
}

#[derive(Serialize, Deserialize)]
struct SegmentRecord {
    #[serde(rename = "lineId")]
    line_id: LineId,
    from: StationName,
    to: StationName,
}

#[derive(Serialize)]
struct PlatformRef<'a> {
    name: &'a StationName,
    pl: LineId,
}

/// Encode a platform key, with an optional status flag.
///
/// ```
/// use subway_reach::domain::{LineId, StationName, encode_substation};
///
/// let name = StationName::parse("A").unwrap();
/// assert_eq!(encode_substation(&name, LineId(1), None), r#"{"name":"A","pl":1}"#);
/// assert_eq!(
///     encode_substation(&name, LineId(1), Some(true)),
///     r#"{"name":"A","pl":1,"st":true}"#
/// );
/// ```
pub fn encode_substation(name: &StationName, line: LineId, status: Option<bool>) -> String {
    let record = SubstationRecord {
        name: Some(name.clone()),
        pl: Some(line),
        st: status,
    };
    // Plain strings and integers cannot fail to serialize.
    serde_json::to_string(&record).unwrap_or_default()
}

/// Encode a platform key without status.
pub fn encode_platform(platform: &Platform) -> String {
    encode_substation(&platform.station, platform.line, None)
}

/// Decode a platform key.
///
/// Returns an empty record (and logs) if the key is malformed.
pub fn decode_substation(key: &str) -> SubstationRecord {
    match serde_json::from_str(key) {
        Ok(record) => record,
        Err(e) => {
            warn!(key, error = %e, "Cannot decode substation");
            SubstationRecord::default()
        }
    }
}

/// Determines if two encoded keys name the same platform.
///
/// Status is ignored; only the station name and line are compared.
pub fn are_the_same_platform(key1: &str, key2: &str) -> bool {
    let (a, b) = (decode_substation(key1), decode_substation(key2));
    a.name == b.name && a.pl == b.pl
}

/// Encode a segment. A segment and its reverse encode identically.
pub fn encode_segment(segment: &Segment) -> String {
    let record = SegmentRecord {
        line_id: segment.line(),
        from: segment.from().clone(),
        to: segment.to().clone(),
    };
    serde_json::to_string(&record).unwrap_or_default()
}

/// Decode a segment key, re-normalising its endpoints.
///
/// Returns `None` (and logs) if the key is malformed.
pub fn decode_segment(key: &str) -> Option<Segment> {
    match serde_json::from_str::<SegmentRecord>(key) {
        Ok(record) => Some(Segment::new(record.line_id, record.from, record.to)),
        Err(e) => {
            warn!(key, error = %e, "Cannot decode segment");
            None
        }
    }
}

/// Encode the bidirectional identity of the edge between two platforms.
pub fn encode_segment_by_substations(a: &Platform, b: &Platform) -> String {
    let key = EdgeKey::new(a, b);
    let (low, high) = key.endpoints();
    let pair = [
        PlatformRef {
            name: &low.station,
            pl: low.line,
        },
        PlatformRef {
            name: &high.station,
            pl: high.line,
        },
    ];
    serde_json::to_string(&pair).unwrap_or_default()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn station_name() -> impl Strategy<Value = StationName> {
        "[A-Za-z\u{4e00}-\u{4e2f}]{1,8}".prop_map(|s| StationName::parse(&s).unwrap())
    }

    proptest! {
        /// decode(encode(n, l, s)) returns exactly the encoded parts
        #[test]
        fn substation_roundtrip(n in station_name(), l in 0u32..30, s in proptest::option::of(any::<bool>())) {
            let record = decode_substation(&encode_substation(&n, LineId(l), s));
            prop_assert_eq!(record, SubstationRecord { name: Some(n), pl: Some(LineId(l)), st: s });
        }

        /// Reversing a segment never changes its encoding
        #[test]
        fn segment_commutative(a in station_name(), b in station_name(), l in 0u32..30) {
            prop_assert_eq!(
                encode_segment(&Segment::new(LineId(l), a.clone(), b.clone())),
                encode_segment(&Segment::new(LineId(l), b, a))
            );
        }
    }
}
