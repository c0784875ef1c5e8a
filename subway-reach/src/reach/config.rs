//! Cost budgets and playback settings for reachability.

use crate::domain::LineId;
use crate::graph::Cost;

/// Line drawn as a loop by the segment resolver (the airport express).
pub const DEFAULT_AIRPORT_LINE: LineId = LineId(15);

/// Configuration for hover previews and click explorations.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachConfig {
    /// Budget for the hover preview (seconds).
    pub hover_budget: Cost,

    /// Budget under which segments are drawn during a click exploration
    /// (seconds). Also bounds the elapsed-time label.
    pub click_line_budget: Cost,

    /// Budget under which stations count as reached during a click
    /// exploration (seconds). In practice at least `hover_budget`.
    pub click_station_budget: Cost,

    /// Milliseconds of animation per second of spent cost.
    pub playback_speed: f64,

    /// Line drawn as a loop even though it is not flagged as one.
    pub airport_line: Option<LineId>,
}

impl ReachConfig {
    /// Create a new configuration with the given budgets (in minutes).
    pub fn new(
        hover_mins: u32,
        click_line_mins: u32,
        click_station_mins: u32,
        playback_speed: f64,
    ) -> Self {
        Self {
            hover_budget: f64::from(hover_mins) * 60.0,
            click_line_budget: f64::from(click_line_mins) * 60.0,
            click_station_budget: f64::from(click_station_mins) * 60.0,
            playback_speed,
            airport_line: Some(DEFAULT_AIRPORT_LINE),
        }
    }

    /// Set the playback speed.
    pub fn with_playback_speed(mut self, playback_speed: f64) -> Self {
        self.playback_speed = playback_speed;
        self
    }

    /// Set (or clear) the line drawn as a loop.
    pub fn with_airport_line(mut self, line: Option<LineId>) -> Self {
        self.airport_line = line;
        self
    }
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            hover_budget: 30.0 * 60.0,
            click_line_budget: 30.0 * 60.0,
            click_station_budget: 80.0 * 60.0,
            playback_speed: 3.0,
            airport_line: Some(DEFAULT_AIRPORT_LINE),
        }
    }
}
