//! HTTP route handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::animation::{REDRAW_INTERVAL_MS, Session};
use crate::domain::{Platform, decode_segment, decode_substation};
use crate::graph::{ResolveError, stations_from_segment};
use crate::reach::ReachError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lines", get(list_lines))
        .route("/view", get(view))
        .route("/hover", post(hover_enter).delete(hover_leave))
        .route("/click", post(click))
        .route("/reset", post(reset))
        .route("/segment/stations", get(segment_stations))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All lines, in map order.
async fn list_lines(State(state): State<AppState>) -> Json<LinesResponse> {
    let lines = state
        .graph
        .lines
        .list
        .iter()
        .filter_map(|id| state.graph.line(*id))
        .map(LineSummary::from_line)
        .collect();

    Json(LinesResponse { lines })
}

/// Current view state.
async fn view(State(state): State<AppState>) -> Json<ViewResponse> {
    let session = state.session.lock().await;
    Json(ViewResponse::from_view(session.view()))
}

fn parse_platform(key: &str) -> Result<Platform, AppError> {
    decode_substation(key)
        .platform()
        .ok_or_else(|| AppError::BadRequest {
            message: format!("Invalid platform: {key}"),
        })
}

/// Pointer entered a platform: show its hover preview.
///
/// Ignored while a click playback is on screen.
async fn hover_enter(
    State(state): State<AppState>,
    Json(req): Json<PlatformRequest>,
) -> Result<Json<ViewResponse>, AppError> {
    {
        let session = state.session.lock().await;
        if session.view().animating {
            return Ok(Json(ViewResponse::from_view(session.view())));
        }
    }

    let platform = parse_platform(&req.platform)?;

    let reachable = state
        .hover_cache
        .reachable(&state.graph, &platform, state.config.hover_budget)
        .await;

    let mut session = state.session.lock().await;
    match reachable {
        Ok(reachable) => {
            session.show_reachable(&platform, &reachable);
            Ok(Json(ViewResponse::from_view(session.view())))
        }
        Err(e) => {
            session.hover_leave();
            Err(e.into())
        }
    }
}

/// Pointer left the map: clear the hover preview.
async fn hover_leave(State(state): State<AppState>) -> Json<ViewResponse> {
    let mut session = state.session.lock().await;
    session.hover_leave();
    Json(ViewResponse::from_view(session.view()))
}

/// Start a click exploration and play it back in the background.
async fn click(
    State(state): State<AppState>,
    Json(req): Json<PlatformRequest>,
) -> Result<Json<ClickResponse>, AppError> {
    let platform = parse_platform(&req.platform)?;

    let mut session = state.session.lock().await;
    let started = session.click(&platform)?;

    if let Some(started) = started {
        tokio::spawn(drive_playback(state.session.clone(), started.generation));
    }

    Ok(Json(ClickResponse::new(started, session.view())))
}

/// Cancel any playback and clear the map.
async fn reset(State(state): State<AppState>) -> Json<ViewResponse> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(ViewResponse::from_view(session.view()))
}

/// Stations drawn along a segment.
async fn segment_stations(
    State(state): State<AppState>,
    Query(query): Query<SegmentQuery>,
) -> Result<Json<SegmentStationsResponse>, AppError> {
    let segment = decode_segment(&query.segment).ok_or_else(|| AppError::BadRequest {
        message: format!("Invalid segment: {}", query.segment),
    })?;

    let stations =
        stations_from_segment(&state.graph, &segment, query.padding, state.config.airport_line)?;

    Ok(Json(SegmentStationsResponse {
        stations: stations.iter().map(|s| s.as_str().to_string()).collect(),
    }))
}

/// Advance the session's playback clock in real time until the playback
/// drains or a reset (or new click) moves the session to another generation.
pub(crate) async fn drive_playback(session: Arc<Mutex<Session>>, generation: u64) {
    let mut interval = tokio::time::interval(Duration::from_millis(u64::from(REDRAW_INTERVAL_MS)));
    let mut last = Instant::now();

    loop {
        interval.tick().await;
        let now = Instant::now();

        let mut session = session.lock().await;
        if session.generation() != generation {
            debug!(generation, "Playback superseded");
            return;
        }

        session.advance_by(now - last);
        last = now;

        if session.pending() == 0 {
            debug!(generation, "Playback finished");
            return;
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ReachError> for AppError {
    fn from(e: ReachError) -> Self {
        match e {
            ReachError::UnknownPlatform(_) => AppError::NotFound {
                message: e.to_string(),
            },
            ReachError::NonPositiveCost { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        AppError::NotFound {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::HoverCacheConfig;
    use crate::graph::fixtures::simple_graph;
    use crate::reach::ReachConfig;

    fn state() -> AppState {
        let graph = simple_graph(
            &[(1, false, &["X", "Y"]), (2, false, &["Z"])],
            &[
                ("X", 1, "Y", 1, 300.0),
                ("X", 1, "Z", 2, 400.0),
                ("Y", 1, "X", 1, 300.0),
            ],
        );
        AppState::new(graph, ReachConfig::default(), &HoverCacheConfig::default())
    }

    fn request(platform: &str) -> Json<PlatformRequest> {
        Json(PlatformRequest {
            platform: platform.to_string(),
        })
    }

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn health_check() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn lines_in_map_order() {
        let Json(response) = list_lines(State(state())).await;
        let ids: Vec<_> = response.lines.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(response.lines[0].station_count, 2);
    }

    #[tokio::test]
    async fn hover_then_leave() {
        let state = state();

        let Json(shown) = hover_enter(State(state.clone()), request(r#"{"name":"X","pl":1}"#))
            .await
            .unwrap();
        assert_eq!(shown.active_stations, vec!["X", "Y", "Z"]);
        assert_eq!(shown.center_station.as_deref(), Some(r#"{"name":"X","pl":1}"#));

        let Json(cleared) = hover_leave(State(state.clone())).await;
        assert!(cleared.active_stations.is_empty());
        assert_eq!(cleared.center_station, None);
    }

    #[tokio::test]
    async fn hover_errors() {
        let state = state();

        let err = hover_enter(State(state.clone()), request("garbage")).await.unwrap_err();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);

        let err = hover_enter(State(state.clone()), request(r#"{"name":"Q","pl":1}"#))
            .await
            .unwrap_err();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn hover_is_ignored_while_animating() {
        let state = state();
        click(State(state.clone()), request(r#"{"name":"X","pl":1}"#))
            .await
            .unwrap();
        let center = Some(r#"{"name":"X","pl":1}"#.to_string());

        // Unknown and malformed platforms are not even looked at
        let Json(after) = hover_enter(State(state.clone()), request(r#"{"name":"Q","pl":1}"#))
            .await
            .unwrap();
        assert!(after.animating);
        assert_eq!(after.center_station, center);

        let Json(after) = hover_enter(State(state.clone()), request("garbage"))
            .await
            .unwrap();
        assert_eq!(after.center_station, center);

        // A real platform does not replace the playback either
        let Json(after) = hover_enter(State(state.clone()), request(r#"{"name":"Y","pl":1}"#))
            .await
            .unwrap();
        assert_eq!(after.center_station, center);
        assert_eq!(state.hover_cache.entry_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn click_plays_back_in_real_time() {
        let state = state();

        let Json(response) = click(State(state.clone()), request(r#"{"name":"X","pl":1}"#))
            .await
            .unwrap();
        assert!(response.started);
        assert_eq!(response.total_duration_ms, 1200);
        assert!(response.view.animating);
        assert_eq!(response.view.active_stations, vec!["X"]);

        // A second click while animating is ignored
        let Json(again) = click(State(state.clone()), request(r#"{"name":"Y","pl":1}"#))
            .await
            .unwrap();
        assert!(!again.started);

        tokio::time::sleep(Duration::from_secs(6)).await;

        let Json(done) = view(State(state.clone())).await;
        assert_eq!(done.active_stations, vec!["X", "Y", "Z"]);
        assert_eq!(done.active_line_segments.len(), 1);
        assert_eq!(done.elapsed_minutes, 30);
        assert_eq!(state.session.lock().await.pending(), 0);

        let Json(cleared) = reset(State(state.clone())).await;
        assert!(!cleared.animating);
        assert!(cleared.active_stations.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_the_driver() {
        let state = state();
        click(State(state.clone()), request(r#"{"name":"X","pl":1}"#))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        reset(State(state.clone())).await;
        tokio::time::sleep(Duration::from_secs(6)).await;

        let Json(after) = view(State(state.clone())).await;
        assert!(after.active_stations.is_empty());
        assert!(after.active_stations_listed.is_empty());
    }

    #[tokio::test]
    async fn segment_stations_resolves_and_rejects() {
        let state = state();

        let Json(response) = segment_stations(
            State(state.clone()),
            Query(SegmentQuery {
                segment: r#"{"lineId":1,"from":"Y","to":"X"}"#.to_string(),
                padding: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.stations, vec!["X", "Y"]);

        let err = segment_stations(
            State(state.clone()),
            Query(SegmentQuery {
                segment: "nope".to_string(),
                padding: false,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);

        let err = segment_stations(
            State(state),
            Query(SegmentQuery {
                segment: r#"{"lineId":9,"from":"X","to":"Y"}"#.to_string(),
                padding: false,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn fatal_traversal_is_internal_error() {
        let err = AppError::from(ReachError::NonPositiveCost {
            from: crate::graph::fixtures::platform("A", 1),
            to: crate::graph::fixtures::platform("B", 1),
            cost: 0.0,
        });
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
