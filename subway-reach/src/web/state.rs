//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::animation::Session;
use crate::cache::{HoverCache, HoverCacheConfig};
use crate::graph::Graph;
use crate::reach::ReachConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The transit network, read-only after startup
    pub graph: Arc<Graph>,

    /// The interaction session driven by the map
    pub session: Arc<Mutex<Session>>,

    /// Memoised hover previews
    pub hover_cache: Arc<HoverCache>,

    /// Budgets and playback speed
    pub config: Arc<ReachConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: Graph, config: ReachConfig, cache_config: &HoverCacheConfig) -> Self {
        let graph = Arc::new(graph);
        let session = Session::init(graph.clone(), config.clone());
        Self {
            graph,
            session: Arc::new(Mutex::new(session)),
            hover_cache: Arc::new(HoverCache::new(cache_config)),
            config: Arc::new(config),
        }
    }
}
