//! Graph loading and lookup errors.

use crate::domain::{LineId, Platform, StationName};

/// Errors from loading or validating the graph document.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Reading or writing the document failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the graph schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line id is listed without a definition
    #[error("line {0} is listed but not defined")]
    MissingLine(LineId),

    /// A station is referenced but not defined
    #[error("station {0} is referenced but not defined")]
    MissingStation(StationName),

    /// A station lists a parent line without a platform record
    #[error("station {station} lists line {line} but has no platform for it")]
    MissingPlatform { station: StationName, line: LineId },

    /// An edge points at a platform that does not exist
    #[error("edge from {from} points at unknown platform {to}")]
    DanglingEdge { from: Platform, to: Platform },
}

/// Errors from resolving the stations of a segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The segment's line is not in the graph
    #[error("unknown line {0}")]
    UnknownLine(LineId),

    /// An endpoint is not served by the line
    #[error("station {station} is not on line {line}")]
    StationNotOnLine { station: StationName, line: LineId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let name = StationName::parse("Q").unwrap();

        let err = GraphError::MissingLine(LineId(4));
        assert_eq!(err.to_string(), "line 4 is listed but not defined");

        let err = GraphError::MissingStation(name.clone());
        assert_eq!(err.to_string(), "station Q is referenced but not defined");

        let err = ResolveError::StationNotOnLine {
            station: name,
            line: LineId(1),
        };
        assert_eq!(err.to_string(), "station Q is not on line 1");

        assert_eq!(ResolveError::UnknownLine(LineId(9)).to_string(), "unknown line 9");
    }
}
