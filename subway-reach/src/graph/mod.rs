//! The transit network: data model, loading and segment resolution.
//!
//! The graph is produced offline by [`crate::preprocess`], loaded once at
//! startup, and read-only thereafter.

mod error;
mod model;
mod resolver;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{GraphError, ResolveError};
pub use model::{Cost, Edge, Graph, Line, LineCatalog, PlatformRecord, Station, StationCatalog};
pub use resolver::{
    ClosestPair, find_closest_pair, find_closest_pair_bidirectional, pad_stations,
    stations_from_segment,
};
