//! Raw network definitions consumed by the preprocessing pipeline.
//!
//! Three files are read from one directory:
//! - `beijing.xml`: line geometry, `<sw><l lnub lb lc loop><p lb x y/>...</l></sw>`;
//! - `transit.xml`: transfer corridors, `<exs><ex s fl tl t d/></exs>`;
//! - `metrostations-beijing.json`: translations and grades keyed by local name.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::error::PreprocessError;

pub const LINES_FILE: &str = "beijing.xml";
pub const INTERCHANGES_FILE: &str = "transit.xml";
pub const STATION_INFOS_FILE: &str = "metrostations-beijing.json";

/// One point of a line's drawn path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPoint {
    /// Station name; empty for a curve-shaping aux point.
    #[serde(rename = "@lb", default)]
    pub label: String,
    #[serde(rename = "@x")]
    pub x: f64,
    #[serde(rename = "@y")]
    pub y: f64,
}

/// A line as drawn on the map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawLine {
    #[serde(rename = "@lnub")]
    pub id: u32,
    #[serde(rename = "@lb")]
    pub name: String,

    /// `0xRRGGBB`
    #[serde(rename = "@lc")]
    pub color: String,

    /// Only the literal `true` marks a loop.
    #[serde(rename = "@loop", default, deserialize_with = "true_flag")]
    pub is_loop: bool,

    #[serde(rename = "p", default)]
    pub points: Vec<RawPoint>,
}

/// A transfer corridor at a station.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawInterchange {
    #[serde(rename = "@s")]
    pub station: String,
    #[serde(rename = "@fl")]
    pub from_line: u32,
    #[serde(rename = "@tl")]
    pub to_line: u32,

    /// Published transfer time in seconds. 0 when blank, NaN when absent.
    #[serde(rename = "@t", default = "not_a_number", deserialize_with = "lenient_number")]
    pub t: f64,

    /// Walking distance in metres. 0 when blank, NaN when absent.
    #[serde(rename = "@d", default = "not_a_number", deserialize_with = "lenient_number")]
    pub d: f64,
}

/// Extra information about a station.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawStationInfo {
    /// Local name, matching the line labels.
    pub zh: String,

    /// English name.
    pub en: String,

    #[serde(default)]
    pub grade: Option<u32>,
}

#[derive(Deserialize)]
struct LinesDocument {
    #[serde(rename = "l", default)]
    lines: Vec<RawLine>,
}

#[derive(Deserialize)]
struct InterchangesDocument {
    #[serde(rename = "ex", default)]
    interchanges: Vec<RawInterchange>,
}

fn true_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw == "true")
}

fn not_a_number() -> f64 {
    f64::NAN
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    Ok(raw.parse().unwrap_or(f64::NAN))
}

/// Everything the pipeline reads from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputs {
    pub lines: Vec<RawLine>,
    pub interchanges: Vec<RawInterchange>,
    pub station_infos: Vec<RawStationInfo>,
}

impl RawInputs {
    /// Load the three raw files from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PreprocessError> {
        let dir = dir.as_ref();
        let lines: LinesDocument = read_xml(&dir.join(LINES_FILE))?;
        let interchanges: InterchangesDocument = read_xml(&dir.join(INTERCHANGES_FILE))?;
        Ok(Self {
            lines: lines.lines,
            interchanges: interchanges.interchanges,
            station_infos: read_json(&dir.join(STATION_INFOS_FILE))?,
        })
    }
}

fn read_to_string(path: &Path) -> Result<String, PreprocessError> {
    std::fs::read_to_string(path).map_err(|e| PreprocessError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_xml<T: DeserializeOwned>(path: &Path) -> Result<T, PreprocessError> {
    let xml = read_to_string(path)?;
    quick_xml::de::from_str(&xml).map_err(|e| PreprocessError::Xml {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PreprocessError> {
    let json = read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| PreprocessError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}
