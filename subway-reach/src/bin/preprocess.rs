//! Build the graph document from raw network definitions.
//!
//! Reads `beijing.xml`, `transit.xml` and `metrostations-beijing.json` from
//! `PREPROCESS_RAW_DIR` (default `preprocess/raw`), queries every line's
//! timetable, and writes the graph to `PREPROCESS_OUT` (default
//! `data/subway.json`).

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use subway_reach::preprocess::{PreprocessError, RawInputs, RouteClient, RouteClientConfig, build_graph};

const DEFAULT_RAW_DIR: &str = "preprocess/raw";
const DEFAULT_OUT: &str = "data/subway.json";

async fn run() -> Result<(), PreprocessError> {
    let raw_dir = std::env::var("PREPROCESS_RAW_DIR").unwrap_or_else(|_| DEFAULT_RAW_DIR.to_string());
    let out = std::env::var("PREPROCESS_OUT").unwrap_or_else(|_| DEFAULT_OUT.to_string());

    let inputs = RawInputs::load(&raw_dir)?;
    info!(
        lines = inputs.lines.len(),
        interchanges = inputs.interchanges.len(),
        station_infos = inputs.station_infos.len(),
        "Loaded raw definitions"
    );

    let client = RouteClient::new(RouteClientConfig::default()).map_err(PreprocessError::Client)?;
    let graph = build_graph(&inputs, &client).await?;

    graph.save(&out)?;
    info!(path = %out, "Wrote graph document");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed in preprocessing data");
            ExitCode::FAILURE
        }
    }
}
