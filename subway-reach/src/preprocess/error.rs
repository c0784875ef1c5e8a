//! Preprocessing error types.

use crate::domain::{InvalidStationName, LineId, StationName};
use crate::graph::GraphError;

/// Errors that can occur when querying the route lookup API.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The response held no route between the two stations
    #[error("no route from {start} to {end}")]
    NoRoute { start: StationName, end: StationName },
}

/// Errors that can occur while building the graph document.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// Reading a raw input file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A raw input file is not valid JSON of the expected shape
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A raw input file is not valid XML of the expected shape
    #[error("failed to parse {path}: {source}")]
    Xml {
        path: String,
        #[source]
        source: quick_xml::DeError,
    },

    #[error(transparent)]
    InvalidName(#[from] InvalidStationName),

    /// An interchange names a station no line passes through
    #[error("interchange at unknown station {0}")]
    UnknownStation(StationName),

    /// The route client could not be built
    #[error("failed to create route client: {0}")]
    Client(#[source] RouteError),

    /// Route lookup failed for a line
    #[error("route lookup for line {line} failed: {source}")]
    Route {
        line: LineId,
        #[source]
        source: RouteError,
    },

    /// The finished document failed validation
    #[error(transparent)]
    Graph(#[from] GraphError),
}
