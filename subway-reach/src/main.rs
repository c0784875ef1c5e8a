use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use subway_reach::cache::HoverCacheConfig;
use subway_reach::graph::Graph;
use subway_reach::reach::ReachConfig;
use subway_reach::web::{AppState, create_router};

/// Graph document written by the `preprocess` binary.
const DEFAULT_DATA_PATH: &str = "data/subway.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_path = std::env::var("SUBWAY_DATA").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
    let addr: SocketAddr = std::env::var("SUBWAY_ADDR")
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    // Fail fast: there is nothing to serve without the graph
    let graph = Graph::load(&data_path).expect("Failed to load transit graph");

    let state = AppState::new(graph, ReachConfig::default(), &HoverCacheConfig::default());
    let app = create_router(state);

    info!(%addr, "Subway reachability map listening");
    info!("API Endpoints:");
    info!("  GET    /health            - Health check");
    info!("  GET    /lines             - Line legend");
    info!("  GET    /view              - Current view state");
    info!("  POST   /hover             - Preview reach from a platform");
    info!("  DELETE /hover             - Clear the preview");
    info!("  POST   /click             - Animate reach from a platform");
    info!("  POST   /reset             - Cancel and clear");
    info!("  GET    /segment/stations  - Stations along a segment");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
