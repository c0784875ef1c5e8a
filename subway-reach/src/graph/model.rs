//! The transit graph document.
//!
//! Mirrors the JSON produced by the preprocessing pipeline:
//! `{ lines: { list, dict }, stations: { list, dict } }`. The graph is loaded
//! once at startup and never mutated afterwards; callers share it via `Arc`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{LineId, Platform, StationName};

use super::error::GraphError;

/// Traversal cost in seconds.
///
/// Fractional because transfer costs are derived from walking distances.
pub type Cost = f64;

/// A directed edge from one platform to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Target station.
    pub name: StationName,

    /// Target line. Differs from the origin's line for transfer edges.
    pub pl: LineId,

    /// Traversal cost in seconds. Must be strictly positive.
    pub t: Cost,
}

impl Edge {
    pub fn new(name: StationName, pl: LineId, t: Cost) -> Self {
        Self { name, pl, t }
    }

    /// The platform this edge leads to.
    pub fn target(&self) -> Platform {
        Platform::new(self.name.clone(), self.pl)
    }
}

/// Adjacency of one platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformRecord {
    #[serde(default)]
    pub adjacents: Vec<Edge>,
}

/// A station on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: StationName,
    pub x: f64,
    pub y: f64,

    /// Synthetic curve-shaping point, not selectable.
    #[serde(default)]
    pub is_aux: bool,

    /// Lines serving this station, in the order they were discovered.
    pub parent_lines: Vec<LineId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u32>,

    /// One platform record per parent line.
    #[serde(default)]
    pub substations: BTreeMap<LineId, PlatformRecord>,
}

impl Station {
    pub fn new(name: StationName, x: f64, y: f64, is_aux: bool) -> Self {
        Self {
            name,
            x,
            y,
            is_aux,
            parent_lines: Vec::new(),
            translation: None,
            grade: None,
            substations: BTreeMap::new(),
        }
    }

    /// Register a line serving this station, creating its platform record.
    pub fn add_parent_line(&mut self, line: LineId) {
        if !self.parent_lines.contains(&line) {
            self.parent_lines.push(line);
        }
        self.substations.entry(line).or_default();
    }
}

/// A transit line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,

    /// The last station is adjacent to the first.
    #[serde(rename = "loop", default)]
    pub is_loop: bool,

    /// Stations in physical order.
    pub stations: Vec<StationName>,
}

/// Ordered line ids plus lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineCatalog {
    pub list: Vec<LineId>,
    pub dict: BTreeMap<LineId, Line>,
}

/// Ordered station names plus lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationCatalog {
    pub list: Vec<StationName>,
    pub dict: BTreeMap<StationName, Station>,
}

/// The whole transit network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub lines: LineCatalog,
    pub stations: StationCatalog,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a graph document.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let graph: Graph = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Load and validate a graph document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| GraphError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let graph = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            lines = graph.lines.list.len(),
            stations = graph.stations.list.len(),
            "Loaded transit graph"
        );
        Ok(graph)
    }

    /// Write the graph document to disk as pretty JSON.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let path = path.as_ref();
        let io_err = |e| GraphError::Io {
            path: path.display().to_string(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Check referential integrity.
    ///
    /// Edge costs are deliberately not checked here; the reachability engine
    /// treats a non-positive cost as a fatal traversal error.
    pub fn validate(&self) -> Result<(), GraphError> {
        for id in &self.lines.list {
            let line = self.lines.dict.get(id).ok_or(GraphError::MissingLine(*id))?;
            for name in &line.stations {
                if !self.stations.dict.contains_key(name) {
                    return Err(GraphError::MissingStation(name.clone()));
                }
            }
        }

        for name in &self.stations.list {
            let station = self
                .stations
                .dict
                .get(name)
                .ok_or_else(|| GraphError::MissingStation(name.clone()))?;

            for line in &station.parent_lines {
                if !station.substations.contains_key(line) {
                    return Err(GraphError::MissingPlatform {
                        station: name.clone(),
                        line: *line,
                    });
                }
            }

            for (line, record) in &station.substations {
                let from = Platform::new(name.clone(), *line);
                for edge in &record.adjacents {
                    let to = edge.target();
                    if self.platform(&to).is_none() {
                        return Err(GraphError::DanglingEdge { from, to });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn station(&self, name: &StationName) -> Option<&Station> {
        self.stations.dict.get(name)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.dict.get(&id)
    }

    /// Look up the record of a platform.
    pub fn platform(&self, platform: &Platform) -> Option<&PlatformRecord> {
        self.station(&platform.station)?
            .substations
            .get(&platform.line)
    }

    /// Outgoing edges of a platform.
    pub fn adjacents(&self, platform: &Platform) -> Option<&[Edge]> {
        self.platform(platform).map(|p| p.adjacents.as_slice())
    }
}
