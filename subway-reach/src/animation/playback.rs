//! Turn an exploration into a timed list of view changes.

use std::time::Duration;

use crate::reach::{Exploration, ReachConfig};

use super::scheduler::{ListedStation, Scheduler, Task, delay_from_millis};

/// Repaint interval while a playback runs (milliseconds).
pub const REDRAW_INTERVAL_MS: u32 = 50;

/// Spent cost between two elapsed-label updates (seconds).
const LABEL_STEP_SECS: u32 = 60;

/// One task and its delay from the start of the playback.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub delay: Duration,
    pub task: Task,
}

/// Every step of one click playback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    pub steps: Vec<Step>,

    /// `max_spent * playback_speed`, in milliseconds.
    pub total_duration_ms: f64,
}

impl Playback {
    /// Plan the playback of `exploration`.
    ///
    /// With playback speed `s` (milliseconds per second of spent cost):
    /// - each reached station lights up after `spent * min(s / 3, 1)`;
    /// - each platform is listed after `spent * s`;
    /// - each drawable segment appears after `spent * s`;
    /// - a redraw is requested every 50ms while under the total duration;
    /// - the elapsed label counts minutes up to the line-draw budget.
    pub fn plan(exploration: &Exploration, config: &ReachConfig) -> Self {
        let speed = config.playback_speed;
        let highlight_factor = if speed < 3.0 { speed / 3.0 } else { 1.0 };
        let total_duration_ms = exploration.total_duration(speed);

        let mut steps = Vec::new();

        for (platform, &spent) in &exploration.platform_arrivals {
            steps.push(Step {
                delay: delay_from_millis(spent * highlight_factor),
                task: Task::HighlightStation(platform.station.clone()),
            });
            steps.push(Step {
                delay: delay_from_millis(spent * speed),
                task: Task::ListStation(ListedStation {
                    platform: platform.clone(),
                    arrival: spent,
                }),
            });
        }

        for (segment, &spent) in &exploration.segment_arrivals {
            steps.push(Step {
                delay: delay_from_millis(spent * speed),
                task: Task::DrawSegment(segment.clone()),
            });
        }

        let mut at = 0u32;
        while f64::from(at) < total_duration_ms {
            steps.push(Step {
                delay: Duration::from_millis(u64::from(at)),
                task: Task::Redraw,
            });
            at += REDRAW_INTERVAL_MS;
        }

        let mut label = 0u32;
        while f64::from(label) < config.click_line_budget {
            steps.push(Step {
                delay: delay_from_millis(f64::from(label) * speed),
                task: Task::ElapsedLabel(label / LABEL_STEP_SECS + 1),
            });
            label += LABEL_STEP_SECS;
        }

        Self {
            steps,
            total_duration_ms,
        }
    }

    /// Queue every step on `scheduler`, relative to its current time.
    /// Returns the number of tasks queued.
    pub fn schedule(self, scheduler: &mut Scheduler) -> usize {
        let count = self.steps.len();
        for step in self.steps {
            scheduler.schedule(step.delay, step.task);
        }
        count
    }

    pub fn total_duration(&self) -> Duration {
        delay_from_millis(self.total_duration_ms)
    }
}
