//! Offline pipeline that builds the graph document.
//!
//! Reads raw line, interchange and station-info definitions, looks up each
//! line's timetable through a [`RouteProvider`], and produces the
//! [`crate::graph::Graph`] the server loads at startup.

mod build;
mod error;
mod raw;
mod route;

pub use build::{NetworkBuilder, build_graph, transfer_cost};
pub use error::{PreprocessError, RouteError};
pub use raw::{
    INTERCHANGES_FILE, LINES_FILE, RawInputs, RawInterchange, RawLine, RawPoint, RawStationInfo,
    STATION_INFOS_FILE,
};
pub use route::{RouteClient, RouteClientConfig, RouteProvider, RouteStop, parse_route_response};
