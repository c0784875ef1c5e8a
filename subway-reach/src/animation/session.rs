//! Per-viewer interaction state.
//!
//! A [`Session`] owns the view state that the render layer draws from and
//! the scheduler that feeds click playbacks into it. Handlers follow a
//! clear-before-rebuild discipline: the active collections are emptied before
//! every traversal, so a failed or cancelled traversal never leaves stale
//! highlights behind.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::domain::{Platform, Segment, StationName};
use crate::graph::Graph;
use crate::reach::{ReachConfig, ReachEngine, ReachError, Reachable};

use super::playback::Playback;
use super::scheduler::{ListedStation, Scheduler, Task};

/// What the render layer draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub active_stations: BTreeSet<StationName>,

    /// Reached platforms, in arrival order.
    pub active_stations_listed: Vec<ListedStation>,

    pub active_line_segments: BTreeSet<Segment>,

    /// Platform under the pointer, or the origin of the running exploration.
    pub center_station: Option<Platform>,

    /// A click playback is running (or has run and not been reset).
    pub animating: bool,

    /// Value of the elapsed-time label.
    pub elapsed_minutes: u32,

    /// Bumped on every change the render layer should repaint for.
    pub frame: u64,
}

impl ViewState {
    fn clear_active(&mut self) {
        self.active_stations.clear();
        self.active_stations_listed.clear();
        self.active_line_segments.clear();
    }
}

/// A click playback that was just started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStarted {
    /// Scheduler generation the playback's tasks belong to.
    pub generation: u64,

    /// Number of tasks queued.
    pub tasks: usize,

    pub total_duration: Duration,
}

pub struct Session {
    graph: Arc<Graph>,
    config: ReachConfig,
    view: ViewState,
    scheduler: Scheduler,
}

impl Session {
    /// Start an idle session over `graph`.
    pub fn init(graph: Arc<Graph>, config: ReachConfig) -> Self {
        let view = ViewState {
            elapsed_minutes: idle_minutes(&config),
            ..ViewState::default()
        };
        Self {
            graph,
            config,
            view,
            scheduler: Scheduler::new(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &ReachConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Generation of the scheduler; changes on every click and reset.
    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    /// Number of playback tasks still queued.
    pub fn pending(&self) -> usize {
        self.scheduler.pending()
    }

    /// Preview what is reachable from `platform` within the hover budget.
    ///
    /// Ignored while animating.
    pub fn hover_enter(&mut self, platform: &Platform) -> Result<(), ReachError> {
        if self.view.animating {
            return Ok(());
        }

        self.view.clear_active();
        self.view.center_station = Some(platform.clone());

        let result = ReachEngine::new(&self.graph).reachable(platform, self.config.hover_budget);
        match result {
            Ok(reachable) => {
                self.apply_reachable(&reachable);
                Ok(())
            }
            Err(e) => {
                self.view.frame += 1;
                log_reach_error(platform, &e);
                Err(e)
            }
        }
    }

    /// Show a precomputed hover preview for `platform`.
    ///
    /// Used by callers that cache [`Reachable`] sets. Ignored while animating.
    pub fn show_reachable(&mut self, platform: &Platform, reachable: &Reachable) {
        if self.view.animating {
            return;
        }
        self.view.clear_active();
        self.view.center_station = Some(platform.clone());
        self.apply_reachable(reachable);
    }

    fn apply_reachable(&mut self, reachable: &Reachable) {
        self.view.active_stations = reachable.stations.clone();
        self.view.active_line_segments = reachable.segments.clone();
        self.view.frame += 1;
    }

    /// Remove the hover preview. Ignored while animating.
    pub fn hover_leave(&mut self) {
        if self.view.animating {
            return;
        }
        self.view.clear_active();
        self.view.center_station = None;
        self.view.frame += 1;
    }

    /// Start a click exploration from `platform`.
    ///
    /// Returns `Ok(None)` when a playback is already running. On error
    /// nothing is scheduled and the session stays out of animated mode.
    pub fn click(&mut self, platform: &Platform) -> Result<Option<PlaybackStarted>, ReachError> {
        if self.view.animating {
            debug!(platform = %platform, "Click ignored while animating");
            return Ok(None);
        }

        self.scheduler.cancel_all();
        self.view.clear_active();
        self.view.active_stations.insert(platform.station.clone());
        self.view.center_station = Some(platform.clone());
        self.view.frame += 1;

        let exploration = ReachEngine::new(&self.graph)
            .explore(
                platform,
                self.config.click_station_budget,
                self.config.click_line_budget,
            )
            .inspect_err(|e| log_reach_error(platform, e))?;

        let playback = Playback::plan(&exploration, &self.config);
        let total_duration = playback.total_duration();
        let tasks = playback.schedule(&mut self.scheduler);
        self.view.animating = true;

        debug!(
            platform = %platform,
            tasks,
            total_ms = total_duration.as_millis() as u64,
            generation = self.scheduler.generation(),
            "Playback scheduled"
        );

        Ok(Some(PlaybackStarted {
            generation: self.scheduler.generation(),
            tasks,
            total_duration,
        }))
    }

    /// Cancel any playback and clear the view.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.view.clear_active();
        self.view.center_station = None;
        self.view.animating = false;
        self.view.elapsed_minutes = idle_minutes(&self.config);
        self.view.frame += 1;
    }

    /// Advance the playback clock by `dt`, applying every task that fell
    /// due. Returns the number of tasks applied.
    pub fn advance_by(&mut self, dt: Duration) -> usize {
        let due = self.scheduler.advance_by(dt);
        let count = due.len();
        for task in due {
            self.apply(task);
        }
        count
    }

    fn apply(&mut self, task: Task) {
        match task {
            Task::HighlightStation(name) => {
                self.view.active_stations.insert(name);
            }
            Task::ListStation(listed) => self.view.active_stations_listed.push(listed),
            Task::DrawSegment(segment) => {
                self.view.active_line_segments.insert(segment);
            }
            Task::Redraw => self.view.frame += 1,
            Task::ElapsedLabel(minutes) => self.view.elapsed_minutes = minutes,
        }
    }
}

fn idle_minutes(config: &ReachConfig) -> u32 {
    (config.hover_budget / 60.0) as u32
}

fn log_reach_error(platform: &Platform, e: &ReachError) {
    match e {
        ReachError::NonPositiveCost { .. } => error!(platform = %platform, error = %e, "Traversal aborted"),
        ReachError::UnknownPlatform(_) => warn!(platform = %platform, error = %e, "Unknown platform"),
    }
}
