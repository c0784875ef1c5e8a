//! Assemble the graph document from raw definitions.
//!
//! The pipeline runs in four steps, each a method on [`NetworkBuilder`]:
//!
//! 1. lines and their stations (parent lines accumulate across lines);
//! 2. interchanges, each adding a transfer edge between two platforms;
//! 3. station infos (translation, grade);
//! 4. route timetables, adding symmetric same-line edges between
//!    consecutive stops.

use tracing::{debug, info, warn};

use crate::domain::{LineId, Platform, StationName};
use crate::graph::{Cost, Edge, Graph, Line, Station};

use super::error::PreprocessError;
use super::raw::{RawInputs, RawInterchange, RawLine, RawStationInfo};
use super::route::{RouteProvider, RouteStop};

/// Assumed walking speed in corridors (m/s).
const WALK_SPEED: f64 = 1.5;

/// Transfer time used when neither distance nor time is published (s).
const DEFAULT_TRANSFER_SECS: f64 = 200.0;

/// Added to every transfer for waiting on the platform (s).
const TRANSFER_WAIT_SECS: f64 = 180.0;

/// Lines whose termini-to-termini route is wrong or incomplete (loops,
/// branches), queried instead as a chain of (start, end) legs.
const MANUAL_ROUTES: &[(u32, &[(&str, &str)])] = &[
    (0, &[("古城", "四惠东")]),
    (1, &[("西直门", "东直门"), ("东直门", "前门"), ("前门", "西直门")]),
    (7, &[("巴沟", "丰台站"), ("丰台站", "国贸"), ("国贸", "巴沟")]),
    (8, &[("西直门", "霍营"), ("霍营", "东直门")]),
    (11, &[("四惠", "花庄")]),
    (15, &[("东直门", "3号航站楼"), ("3号航站楼", "东直门")]),
    (16, &[("北京西站", "花庄")]),
    (24, &[("定海园", "屈庄")]),
];

/// Consecutive stops whose published time is corrupt, with the time to use.
const PATCHED_LEGS: &[(&str, &str, Cost)] = &[("角门西", "公益西桥", 120.0)];

/// Cost of a transfer edge.
///
/// Walking time if the distance is known, else the published time, else a
/// default; plus a fixed wait.
pub fn transfer_cost(t: f64, d: f64) -> Cost {
    let walk = d / WALK_SPEED;
    let base = [walk, t]
        .into_iter()
        .find(|v| *v != 0.0 && !v.is_nan())
        .unwrap_or(DEFAULT_TRANSFER_SECS);
    base + TRANSFER_WAIT_SECS
}

/// Convert a `0xRRGGBB` color to `#RRGGBB`.
fn css_color(raw: &str) -> String {
    raw.replacen("0x", "#", 1)
}

/// Builds a [`Graph`] step by step.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    graph: Graph,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step I: register lines and their stations.
    ///
    /// A station seen on several lines keeps one entry; its coordinates are
    /// those of the last line listing it.
    pub fn add_lines(&mut self, lines: &[RawLine]) -> Result<(), PreprocessError> {
        for raw in lines {
            let line_id = LineId(raw.id);
            let mut names = Vec::with_capacity(raw.points.len());

            for point in &raw.points {
                let is_aux = point.label.is_empty();
                let name = if is_aux {
                    StationName::aux(point.x, point.y)
                } else {
                    StationName::parse(&point.label)?
                };

                let stations = &mut self.graph.stations;
                if !stations.dict.contains_key(&name) {
                    stations.list.push(name.clone());
                }
                let station = stations
                    .dict
                    .entry(name.clone())
                    .or_insert_with(|| Station::new(name.clone(), point.x, point.y, is_aux));
                station.x = point.x;
                station.y = point.y;
                station.add_parent_line(line_id);

                names.push(name);
            }

            debug!(line = %line_id, stations = names.len(), "Added line");
            self.graph.lines.list.push(line_id);
            self.graph.lines.dict.insert(
                line_id,
                Line {
                    id: line_id,
                    name: raw.name.clone(),
                    color: css_color(&raw.color),
                    is_loop: raw.is_loop,
                    stations: names,
                },
            );
        }
        Ok(())
    }

    /// Step II: add a transfer edge for every interchange.
    pub fn add_interchanges(&mut self, interchanges: &[RawInterchange]) -> Result<(), PreprocessError> {
        for raw in interchanges {
            let name = StationName::parse(&raw.station)?;
            let station = self
                .graph
                .stations
                .dict
                .get_mut(&name)
                .ok_or_else(|| PreprocessError::UnknownStation(name.clone()))?;

            let (from, to) = (LineId(raw.from_line), LineId(raw.to_line));
            station.add_parent_line(from);
            station.add_parent_line(to);

            let cost = transfer_cost(raw.t, raw.d);
            station
                .substations
                .entry(from)
                .or_default()
                .adjacents
                .push(Edge::new(name, to, cost));
        }
        Ok(())
    }

    /// Step III: fill translations and grades. Returns the number of infos
    /// skipped because no line passes through the station.
    pub fn add_station_infos(&mut self, infos: &[RawStationInfo]) -> usize {
        let mut skipped = 0;
        for info in infos {
            let station = StationName::parse(&info.zh)
                .ok()
                .and_then(|name| self.graph.stations.dict.get_mut(&name));
            match station {
                Some(station) => {
                    station.translation = Some(info.en.clone());
                    station.grade = info.grade;
                }
                None => {
                    info!(station = %info.zh, "Station not on any line, skipping");
                    skipped += 1;
                }
            }
        }
        skipped
    }

    /// The (start, end) legs to query for a line's timetable.
    pub fn route_legs(&self, line: LineId) -> Vec<(StationName, StationName)> {
        if let Some((_, legs)) = MANUAL_ROUTES.iter().find(|(id, _)| *id == line.0) {
            return legs
                .iter()
                .filter_map(|(start, end)| {
                    Some((StationName::parse(start).ok()?, StationName::parse(end).ok()?))
                })
                .collect();
        }

        let Some(stations) = self.graph.line(line).map(|l| &l.stations) else {
            return Vec::new();
        };
        match (stations.first(), stations.last()) {
            (Some(first), Some(last)) => vec![(first.clone(), last.clone())],
            _ => Vec::new(),
        }
    }

    /// Step IV: query every line's timetable and add its edges. Returns the
    /// number of edges added.
    pub async fn add_timetables<P: RouteProvider>(&mut self, provider: &P) -> Result<usize, PreprocessError> {
        let mut added = 0;
        for line in self.graph.lines.list.clone() {
            let mut stops = Vec::new();
            for (start, end) in self.route_legs(line) {
                let leg = provider
                    .fetch_route(&start, &end)
                    .await
                    .map_err(|source| PreprocessError::Route { line, source })?;
                stops.extend(leg);
            }
            added += self.add_route(line, &stops);
        }
        Ok(added)
    }

    /// Add symmetric edges between consecutive distinct stops of `line`.
    ///
    /// Stops not served by the line and legs with a non-positive time are
    /// logged and skipped. Returns the number of edges added.
    pub fn add_route(&mut self, line: LineId, stops: &[RouteStop]) -> usize {
        let mut added = 0;
        for pair in stops.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if current.station == next.station {
                continue;
            }

            let t = PATCHED_LEGS
                .iter()
                .find(|(a, b, _)| current.station.as_str() == *a && next.station.as_str() == *b)
                .map_or(next.secs - current.secs, |(_, _, t)| *t);

            if !(t > 0.0) {
                warn!(line = %line, from = %current.station, to = %next.station, t, "Non-positive leg time, skipping");
                continue;
            }

            let from = Platform::new(current.station.clone(), line);
            let to = Platform::new(next.station.clone(), line);
            if self.graph.platform(&from).is_none() || self.graph.platform(&to).is_none() {
                warn!(line = %line, from = %from, to = %to, "Route stop not served by line, skipping");
                continue;
            }

            self.push_edge(&from, &to, t);
            self.push_edge(&to, &from, t);
            added += 2;
        }
        added
    }

    fn push_edge(&mut self, from: &Platform, to: &Platform, t: Cost) {
        if let Some(record) = self
            .graph
            .stations
            .dict
            .get_mut(&from.station)
            .and_then(|s| s.substations.get_mut(&from.line))
        {
            record.adjacents.push(Edge::new(to.station.clone(), to.line, t));
        }
    }

    /// Validate and return the finished graph.
    pub fn finish(self) -> Result<Graph, PreprocessError> {
        self.graph.validate()?;
        Ok(self.graph)
    }
}

/// Run the whole pipeline.
pub async fn build_graph<P: RouteProvider>(inputs: &RawInputs, provider: &P) -> Result<Graph, PreprocessError> {
    let mut builder = NetworkBuilder::new();

    builder.add_lines(&inputs.lines)?;
    builder.add_interchanges(&inputs.interchanges)?;
    let skipped = builder.add_station_infos(&inputs.station_infos);
    let edges = builder.add_timetables(provider).await?;

    let graph = builder.finish()?;
    info!(
        lines = graph.lines.list.len(),
        stations = graph.stations.list.len(),
        edges,
        skipped_infos = skipped,
        "Built transit graph"
    );
    Ok(graph)
}
