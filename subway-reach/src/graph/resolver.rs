//! Station sequences for drawing a segment of a line.
//!
//! Given a line and two of its stations, resolve the contiguous run of
//! stations between them. The render layer draws a curve through that run,
//! optionally with one extra station at each end so the curve leaves the
//! visible part with the right tangent.
//!
//! Loop lines (and the airport express, which is drawn as a loop) are
//! resolved by searching both directions around a doubled copy of the
//! station cycle and keeping the shorter arc.

use crate::domain::{LineId, Segment, StationName};

use super::error::ResolveError;
use super::model::Graph;

/// A pair of indices into a station sequence and the span between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosestPair {
    pub start: usize,
    pub end: usize,
}

impl ClosestPair {
    pub fn distance(&self) -> usize {
        self.end - self.start
    }
}

/// Duplicate the first and last entries of a sequence.
///
/// `[A, B, C]` becomes `[A, A, B, C, C]`; an empty sequence stays empty.
pub fn pad_stations(stations: &[StationName]) -> Vec<StationName> {
    let (Some(first), Some(last)) = (stations.first(), stations.last()) else {
        return Vec::new();
    };
    let mut padded = Vec::with_capacity(stations.len() + 2);
    padded.push(first.clone());
    padded.extend_from_slice(stations);
    padded.push(last.clone());
    padded
}

/// Find the closest occurrence of `start` preceding an occurrence of `end`.
///
/// Two-pointer scan: for each occurrence of `end` (at `q`), advance `p`
/// over the occurrences of `start` before it, keeping the pair with the
/// smallest `q - p`. Earlier pairs win ties.
pub fn find_closest_pair(
    stations: &[StationName],
    start: &StationName,
    end: &StationName,
) -> Option<ClosestPair> {
    let mut best: Option<ClosestPair> = None;
    let mut p = 0;

    for (q, station) in stations.iter().enumerate() {
        if station != end {
            continue;
        }
        while p < q {
            if &stations[p] == start {
                let pair = ClosestPair { start: p, end: q };
                if best.is_none_or(|b| pair.distance() < b.distance()) {
                    best = Some(pair);
                }
            }
            p += 1;
        }
    }

    best
}

/// Closest pair in either direction (`from` before `to`, or `to` before
/// `from`). The `from` → `to` direction wins ties.
pub fn find_closest_pair_bidirectional(
    stations: &[StationName],
    from: &StationName,
    to: &StationName,
) -> Option<ClosestPair> {
    let forward = find_closest_pair(stations, from, to);
    let backward = find_closest_pair(stations, to, from);

    match (forward, backward) {
        (Some(f), Some(b)) if b.distance() < f.distance() => Some(b),
        (Some(f), _) => Some(f),
        (None, b) => b,
    }
}

/// Resolve the stations between the two endpoints of a segment.
///
/// With `with_padding`, one neighbouring station is added at each end. The
/// padded window is clipped to the line's real stations, so at a terminus
/// the boundary station is not repeated.
///
/// `airport_line` names a line that is drawn as a loop even though it is
/// not flagged as one.
pub fn stations_from_segment(
    graph: &Graph,
    segment: &Segment,
    with_padding: bool,
    airport_line: Option<LineId>,
) -> Result<Vec<StationName>, ResolveError> {
    let line_id = segment.line();
    let line = graph
        .line(line_id)
        .ok_or(ResolveError::UnknownLine(line_id))?;

    let not_on_line = |station: &StationName| ResolveError::StationNotOnLine {
        station: station.clone(),
        line: line_id,
    };

    let (from, to) = (segment.from(), segment.to());
    for endpoint in [from, to] {
        if !line.stations.contains(endpoint) {
            return Err(not_on_line(endpoint));
        }
    }

    let (stations, i_from, i_to) = if line.is_loop || airport_line == Some(line_id) {
        let mut doubled = line.stations.clone();
        doubled.extend_from_slice(&line.stations);
        let stations = pad_stations(&doubled);
        let pair = find_closest_pair_bidirectional(&stations, from, to)
            .ok_or_else(|| not_on_line(from))?;
        (stations, pair.start, pair.end)
    } else {
        let stations = pad_stations(&line.stations);
        let first = |s: &StationName| stations.iter().position(|x| x == s);
        let (mut from, mut to) = (from, to);
        if first(from) > first(to) {
            std::mem::swap(&mut from, &mut to);
        }
        let i_to = first(to).ok_or_else(|| not_on_line(to))?;
        // Last occurrence of `from` up to `to`: the head padding duplicates
        // the first station.
        let i_from = stations[..=i_to]
            .iter()
            .rposition(|x| x == from)
            .ok_or_else(|| not_on_line(from))?;
        (stations, i_from, i_to)
    };

    let (lo, hi) = if with_padding {
        // Indices 0 and len - 1 are the duplicated padding entries.
        let lo = i_from.saturating_sub(1).max(1);
        let hi = (i_to + 1).min(stations.len() - 2);
        (lo, hi)
    } else {
        (i_from, i_to)
    };

    Ok(stations[lo..=hi].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::{name, names, simple_graph};

    fn seg(line: u32, a: &str, b: &str) -> Segment {
        Segment::new(LineId(line), name(a), name(b))
    }

    #[test]
    fn pad_duplicates_ends() {
        assert_eq!(pad_stations(&names(&["A", "B", "C"])), names(&["A", "A", "B", "C", "C"]));
        assert_eq!(pad_stations(&names(&["A"])), names(&["A", "A", "A"]));
        assert!(pad_stations(&[]).is_empty());
    }

    #[test]
    fn closest_pair_scans_all_occurrences() {
        let arr = names(&["A", "A", "B", "C", "A", "B", "C", "C"]);
        assert_eq!(
            find_closest_pair(&arr, &name("C"), &name("A")),
            Some(ClosestPair { start: 3, end: 4 })
        );
        assert_eq!(
            find_closest_pair(&arr, &name("A"), &name("C")),
            Some(ClosestPair { start: 1, end: 3 })
        );
        assert_eq!(find_closest_pair(&arr, &name("A"), &name("Q")), None);
    }

    #[test]
    fn bidirectional_prefers_shorter_span() {
        let arr = names(&["A", "A", "B", "C", "A", "B", "C", "C"]);
        let pair = find_closest_pair_bidirectional(&arr, &name("A"), &name("C")).unwrap();
        assert_eq!(pair, ClosestPair { start: 3, end: 4 });
    }

    #[test]
    fn bidirectional_ties_keep_first_direction() {
        // Both arcs between A and C span two stations.
        let arr = names(&["A", "A", "B", "C", "D", "A", "B", "C", "D", "D"]);
        let forward = find_closest_pair(&arr, &name("A"), &name("C")).unwrap();
        let backward = find_closest_pair(&arr, &name("C"), &name("A")).unwrap();
        assert_eq!(forward.distance(), backward.distance());

        let pair = find_closest_pair_bidirectional(&arr, &name("A"), &name("C")).unwrap();
        assert_eq!(pair, forward);
    }

    #[test]
    fn linear_segment_without_padding() {
        let graph = simple_graph(&[(1, false, &["A", "B", "C", "D"])], &[]);
        let stations = stations_from_segment(&graph, &seg(1, "B", "D"), false, None).unwrap();
        assert_eq!(stations, names(&["B", "C", "D"]));
    }

    #[test]
    fn linear_segment_with_padding_is_clipped() {
        let graph = simple_graph(&[(1, false, &["A", "B", "C", "D"])], &[]);
        let stations = stations_from_segment(&graph, &seg(1, "B", "D"), true, None).unwrap();
        assert_eq!(stations, names(&["A", "B", "C", "D"]));

        let stations = stations_from_segment(&graph, &seg(1, "A", "B"), true, None).unwrap();
        assert_eq!(stations, names(&["A", "B", "C"]));

        let stations = stations_from_segment(&graph, &seg(1, "B", "C"), true, None).unwrap();
        assert_eq!(stations, names(&["A", "B", "C", "D"]));
    }

    #[test]
    fn linear_segment_follows_line_order() {
        // Names sort against the line order; the run must still follow the line.
        let graph = simple_graph(&[(1, false, &["D", "C", "B", "A"])], &[]);
        let stations = stations_from_segment(&graph, &seg(1, "A", "C"), false, None).unwrap();
        assert_eq!(stations, names(&["C", "B", "A"]));
    }

    #[test]
    fn repeated_station_does_not_overshoot() {
        let graph = simple_graph(&[(1, false, &["A", "B", "A", "C"])], &[]);
        let stations = stations_from_segment(&graph, &seg(1, "A", "B"), false, None).unwrap();
        assert_eq!(stations, names(&["A", "B"]));
    }

    #[test]
    fn loop_segment_takes_shorter_arc() {
        let graph = simple_graph(&[(2, true, &["A", "B", "C"])], &[]);

        let stations = stations_from_segment(&graph, &seg(2, "C", "A"), false, None).unwrap();
        assert_eq!(stations, names(&["C", "A"]));

        let stations = stations_from_segment(&graph, &seg(2, "C", "A"), true, None).unwrap();
        assert_eq!(stations, names(&["B", "C", "A", "B"]));
    }

    #[test]
    fn airport_line_is_treated_as_loop() {
        let line: &[&str] = &["T2", "T3", "Sanyuanqiao", "Dongzhimen"];
        let graph = simple_graph(&[(15, false, line)], &[]);

        let linear = stations_from_segment(&graph, &seg(15, "T2", "Dongzhimen"), false, None).unwrap();
        assert_eq!(linear.len(), 4);

        let looped =
            stations_from_segment(&graph, &seg(15, "T2", "Dongzhimen"), false, Some(LineId(15)))
                .unwrap();
        assert_eq!(looped, names(&["Dongzhimen", "T2"]));
    }

    #[test]
    fn unknown_line_and_station() {
        let graph = simple_graph(&[(1, false, &["A", "B"])], &[]);
        assert_eq!(
            stations_from_segment(&graph, &seg(3, "A", "B"), false, None),
            Err(ResolveError::UnknownLine(LineId(3)))
        );
        assert_eq!(
            stations_from_segment(&graph, &seg(1, "A", "Q"), false, None),
            Err(ResolveError::StationNotOnLine {
                station: name("Q"),
                line: LineId(1)
            })
        );
    }
}
