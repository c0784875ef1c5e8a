//! Domain types for the transit reachability map.
//!
//! Structured keys for stations, platforms, segments and edges, and the
//! string codec used where those keys cross the wire. Key types normalise
//! at construction time, so an undirected key built from either end is the
//! same value.

mod codec;
mod segment;
mod station;

pub use codec::{
    SubstationRecord, are_the_same_platform, decode_segment, decode_substation, encode_platform,
    encode_segment, encode_segment_by_substations, encode_substation,
};
pub use segment::{EdgeKey, Segment};
pub use station::{InvalidStationName, LineId, Platform, StationName};
