//! Route timetable lookup.
//!
//! The route search API answers "how do I get from A to B" with a list of
//! stops and the cumulative travel time at each. Asking it for the route
//! between a line's two termini yields that line's timetable.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domain::StationName;

use super::error::RouteError;

/// Default base URL for the route search API.
const DEFAULT_BASE_URL: &str = "https://map.bjsubway.com";

/// One stop of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub station: StationName,

    /// Cumulative travel time from the start of the route (seconds).
    pub secs: f64,
}

/// Source of route timetables.
///
/// This abstraction allows the pipeline to be tested with mock data.
pub trait RouteProvider {
    /// Stops of the route from `start` to `end`, in travel order.
    fn fetch_route(
        &self,
        start: &StationName,
        end: &StationName,
    ) -> impl Future<Output = Result<Vec<RouteStop>, RouteError>> + Send;
}

/// Configuration for the route client.
#[derive(Debug, Clone)]
pub struct RouteClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Pause before every request, to go easy on the API
    pub request_delay: Duration,
}

impl RouteClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            request_delay: Duration::from_millis(200),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

impl Default for RouteClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the route search API.
#[derive(Debug, Clone)]
pub struct RouteClient {
    http: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

impl RouteClient {
    /// Create a new route client.
    pub fn new(config: RouteClientConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            request_delay: config.request_delay,
        })
    }

    async fn fetch(&self, start: &StationName, end: &StationName) -> Result<Vec<RouteStop>, RouteError> {
        info!(%start, %end, "Querying route");
        tokio::time::sleep(self.request_delay).await;

        let url = format!("{}/searchstartend", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_route_response(&body)?.ok_or_else(|| RouteError::NoRoute {
            start: start.clone(),
            end: end.clone(),
        })
    }
}

impl RouteProvider for RouteClient {
    fn fetch_route(
        &self,
        start: &StationName,
        end: &StationName,
    ) -> impl Future<Output = Result<Vec<RouteStop>, RouteError>> + Send {
        self.fetch(start, end)
    }
}

/// Envelope of a route search response. `fangan` ("plans") is itself a
/// JSON document, serialised into a string.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    fangan: String,
}

/// One plan: a list of alternative paths, each a list of stops.
#[derive(Debug, Deserialize)]
struct Plan {
    #[serde(default)]
    p: Vec<Vec<Vec<Value>>>,
}

/// Parse the stops of the first path of the first plan.
///
/// Each stop is an array whose second element is the station name and
/// third the cumulative time in seconds. Returns `None` when there is no
/// path at all.
pub fn parse_route_response(body: &str) -> Result<Option<Vec<RouteStop>>, RouteError> {
    let json_err = |e: serde_json::Error| RouteError::Json {
        message: e.to_string(),
    };

    let response: SearchResponse = serde_json::from_str(body).map_err(json_err)?;
    let plans: Vec<Plan> = serde_json::from_str(&response.fangan).map_err(json_err)?;

    let Some(path) = plans.into_iter().next().and_then(|plan| plan.p.into_iter().next()) else {
        return Ok(None);
    };

    path.iter()
        .map(|stop| {
            parse_stop(stop).ok_or_else(|| RouteError::Json {
                message: format!("malformed stop: {}", Value::Array(stop.clone())),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn parse_stop(stop: &[Value]) -> Option<RouteStop> {
    let station = StationName::parse(stop.get(1)?.as_str()?).ok()?;
    let secs = match stop.get(2)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    Some(RouteStop { station, secs })
}
