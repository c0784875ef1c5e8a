//! Data transfer objects for web requests and responses.
//!
//! Platforms and segments cross the wire in their encoded string form (see
//! [`crate::domain::encode_platform`] and [`crate::domain::encode_segment`]).

use serde::{Deserialize, Serialize};

use crate::animation::{PlaybackStarted, ViewState};
use crate::domain::{encode_platform, encode_segment};
use crate::graph::Line;

/// Request naming a platform.
#[derive(Debug, Deserialize)]
pub struct PlatformRequest {
    /// Encoded substation, e.g. `{"name":"Xizhimen","pl":2}`
    pub platform: String,
}

/// Query for the stations along a segment.
#[derive(Debug, Deserialize)]
pub struct SegmentQuery {
    /// Encoded segment, e.g. `{"lineId":2,"from":"A","to":"B"}`
    pub segment: String,

    /// Extend the result by one station at each end
    #[serde(default)]
    pub padding: bool,
}

/// Snapshot of the view state.
#[derive(Debug, Serialize, PartialEq)]
pub struct ViewResponse {
    pub active_stations: Vec<String>,

    /// `name,line,arrival` descriptors, in arrival order
    pub active_stations_listed: Vec<String>,

    /// Encoded segments
    pub active_line_segments: Vec<String>,

    /// Encoded substation
    pub center_station: Option<String>,

    pub animating: bool,
    pub elapsed_minutes: u32,
    pub frame: u64,
}

impl ViewResponse {
    pub fn from_view(view: &ViewState) -> Self {
        Self {
            active_stations: view
                .active_stations
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            active_stations_listed: view
                .active_stations_listed
                .iter()
                .map(ToString::to_string)
                .collect(),
            active_line_segments: view.active_line_segments.iter().map(encode_segment).collect(),
            center_station: view.center_station.as_ref().map(encode_platform),
            animating: view.animating,
            elapsed_minutes: view.elapsed_minutes,
            frame: view.frame,
        }
    }
}

/// Response to a click.
#[derive(Debug, Serialize)]
pub struct ClickResponse {
    /// False when a playback was already running and the click was ignored
    pub started: bool,

    /// Length of the playback in milliseconds
    pub total_duration_ms: u64,

    pub view: ViewResponse,
}

impl ClickResponse {
    pub fn new(started: Option<PlaybackStarted>, view: &ViewState) -> Self {
        Self {
            started: started.is_some(),
            total_duration_ms: started.map_or(0, |s| s.total_duration.as_millis() as u64),
            view: ViewResponse::from_view(view),
        }
    }
}

/// A line, for the legend.
#[derive(Debug, Serialize)]
pub struct LineSummary {
    pub id: u32,
    pub name: String,
    pub color: String,
    #[serde(rename = "loop")]
    pub is_loop: bool,
    pub station_count: usize,
}

impl LineSummary {
    pub fn from_line(line: &Line) -> Self {
        Self {
            id: line.id.0,
            name: line.name.clone(),
            color: line.color.clone(),
            is_loop: line.is_loop,
            station_count: line.stations.len(),
        }
    }
}

/// Response listing all lines.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineSummary>,
}

/// Stations along a segment, in travel order.
#[derive(Debug, Serialize)]
pub struct SegmentStationsResponse {
    pub stations: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ListedStation;
    use crate::domain::{LineId, Segment};
    use crate::graph::fixtures::{name, names, platform};

    #[test]
    fn view_response_encodes_keys() {
        let mut view = ViewState {
            center_station: Some(platform("X", 1)),
            animating: true,
            elapsed_minutes: 3,
            frame: 7,
            ..Default::default()
        };
        view.active_stations.insert(name("Y"));
        view.active_stations.insert(name("X"));
        view.active_line_segments
            .insert(Segment::new(LineId(1), name("Y"), name("X")));
        view.active_stations_listed.push(ListedStation {
            platform: platform("Y", 1),
            arrival: 300.0,
        });

        let response = ViewResponse::from_view(&view);

        assert_eq!(response.active_stations, vec!["X", "Y"]);
        assert_eq!(response.active_stations_listed, vec!["Y,1,300"]);
        assert_eq!(
            response.active_line_segments,
            vec![r#"{"lineId":1,"from":"X","to":"Y"}"#]
        );
        assert_eq!(
            response.center_station.as_deref(),
            Some(r#"{"name":"X","pl":1}"#)
        );
        assert_eq!(response.frame, 7);
    }

    #[test]
    fn line_summary_serialises_loop_flag() {
        let line = Line {
            id: LineId(2),
            name: "Line 2".to_string(),
            color: "#006098".to_string(),
            is_loop: true,
            stations: names(&["A", "B", "C"]),
        };
        let json = serde_json::to_value(LineSummary::from_line(&line)).unwrap();
        assert_eq!(json["loop"], true);
        assert_eq!(json["station_count"], 3);
    }

    #[test]
    fn segment_query_padding_defaults_off() {
        let query: SegmentQuery = serde_json::from_str(r#"{"segment":"x"}"#).unwrap();
        assert!(!query.padding);
    }
}
