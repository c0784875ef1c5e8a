//! Line segments and edge identities.
//!
//! Both key types are undirected: constructing one from either end yields
//! the same value, so a segment drawn from A to B and one drawn from B to A
//! collide in sets and maps.

use std::fmt;

use super::{LineId, Platform, StationName};

/// An undirected, line-scoped edge between two adjacent stations.
///
/// The unit of line drawing. `from` is always the lexicographically smaller
/// station name; the fields are private so that invariant cannot be broken.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    line: LineId,
    from: StationName,
    to: StationName,
}

impl Segment {
    /// Create a segment, normalising endpoint order.
    pub fn new(line: LineId, a: StationName, b: StationName) -> Self {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Self { line, from, to }
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    /// The lexicographically smaller endpoint.
    pub fn from(&self) -> &StationName {
        &self.from
    }

    /// The lexicographically larger endpoint.
    pub fn to(&self) -> &StationName {
        &self.to
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.line, self.from, self.to)
    }
}

/// Physical identity of a traversed edge between two platforms.
///
/// Unlike [`Segment`] this keeps the line of each endpoint, so a transfer
/// edge between two platforms of the same station has its own identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    low: Platform,
    high: Platform,
}

impl EdgeKey {
    /// Create an edge key, ordering the two platforms canonically.
    pub fn new(a: &Platform, b: &Platform) -> Self {
        let (low, high) = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        Self { low, high }
    }

    /// Both endpoints, in canonical order.
    pub fn endpoints(&self) -> (&Platform, &Platform) {
        (&self.low, &self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    #[test]
    fn segment_normalises_endpoints() {
        let seg = Segment::new(LineId(1), name("Z"), name("A"));
        assert_eq!(seg.from().as_str(), "A");
        assert_eq!(seg.to().as_str(), "Z");
        assert_eq!(seg.line(), LineId(1));
    }

    #[test]
    fn segment_reverse_is_equal() {
        let ab = Segment::new(LineId(1), name("A"), name("B"));
        let ba = Segment::new(LineId(1), name("B"), name("A"));
        assert_eq!(ab, ba);
    }

    #[test]
    fn segments_on_different_lines_differ() {
        let l1 = Segment::new(LineId(1), name("A"), name("B"));
        let l2 = Segment::new(LineId(2), name("A"), name("B"));
        assert_ne!(l1, l2);
    }

    #[test]
    fn edge_key_is_direction_independent() {
        let a = Platform::new(name("A"), LineId(1));
        let b = Platform::new(name("A"), LineId(2));
        assert_eq!(EdgeKey::new(&a, &b), EdgeKey::new(&b, &a));
    }

    #[test]
    fn edge_key_endpoints_are_ordered() {
        let a = Platform::new(name("B"), LineId(1));
        let b = Platform::new(name("A"), LineId(1));
        let key = EdgeKey::new(&a, &b);
        let (low, high) = key.endpoints();
        assert_eq!(low.station.as_str(), "A");
        assert_eq!(high.station.as_str(), "B");
    }
}
