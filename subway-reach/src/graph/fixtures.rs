//! Small hand-built graphs for unit tests.

use crate::domain::{LineId, Platform, StationName};

use super::model::{Cost, Edge, Graph, Line, Station};

pub fn name(s: &str) -> StationName {
    StationName::parse(s).unwrap()
}

pub fn names(list: &[&str]) -> Vec<StationName> {
    list.iter().map(|s| name(s)).collect()
}

pub fn platform(station: &str, line: u32) -> Platform {
    Platform::new(name(station), LineId(line))
}

/// Build a graph from `(line id, is loop, stations)` and directed edges
/// `(from station, from line, to station, to line, cost)`.
///
/// Every station gets a platform for each line listing it. Edges are
/// added exactly as given; list both directions for a two-way track.
pub fn simple_graph(
    lines: &[(u32, bool, &[&str])],
    edges: &[(&str, u32, &str, u32, Cost)],
) -> Graph {
    let mut graph = Graph::new();

    for (i, (id, is_loop, stations)) in lines.iter().enumerate() {
        let line_id = LineId(*id);
        for (j, s) in stations.iter().enumerate() {
            let station_name = name(s);
            if !graph.stations.dict.contains_key(&station_name) {
                graph.stations.list.push(station_name.clone());
            }
            graph
                .stations
                .dict
                .entry(station_name.clone())
                .or_insert_with(|| Station::new(station_name, j as f64 * 10.0, i as f64 * 10.0, false))
                .add_parent_line(line_id);
        }
        graph.lines.list.push(line_id);
        graph.lines.dict.insert(
            line_id,
            Line {
                id: line_id,
                name: format!("Line {id}"),
                color: "#888888".to_string(),
                is_loop: *is_loop,
                stations: names(stations),
            },
        );
    }

    for (from, from_line, to, to_line, t) in edges {
        let station = graph
            .stations
            .dict
            .get_mut(&name(from))
            .expect("edge origin must be on a line");
        station
            .substations
            .entry(LineId(*from_line))
            .or_default()
            .adjacents
            .push(Edge::new(name(to), LineId(*to_line), *t));
    }

    graph
}
