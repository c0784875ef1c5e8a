//! Virtual-clock task queue for click playback.
//!
//! Tasks are queued at `now + delay` and come back out, in due order, when
//! the clock is advanced past them. Nothing here knows about wall time: the
//! web layer advances the clock from a ticking task, tests advance it by
//! hand.
//!
//! Every task is tagged with the generation current when it was scheduled.
//! [`Scheduler::cancel_all`] drops the queue and starts a new generation, so
//! a handle from before a reset can never be mistaken for a live task.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tracing::trace;

use crate::domain::{Platform, Segment, StationName};
use crate::graph::Cost;

/// A station listed in the exploration panel, with its arrival cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedStation {
    pub platform: Platform,

    /// Spent cost (seconds) on arrival.
    pub arrival: Cost,
}

impl fmt::Display for ListedStation {
    /// `name,line,arrival`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.platform.station, self.platform.line, self.arrival
        )
    }
}

/// A deferred change to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Mark a station as reached.
    HighlightStation(StationName),

    /// Append a station to the arrival-ordered panel.
    ListStation(ListedStation),

    /// Draw a same-line segment.
    DrawSegment(Segment),

    /// Ask the render layer to repaint.
    Redraw,

    /// Update the elapsed-minutes label.
    ElapsedLabel(u32),
}

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    pub generation: u64,
    due: Duration,
    seq: u64,
}

/// Convert a delay in (possibly fractional) milliseconds to a duration.
///
/// Negative and NaN delays run immediately.
pub fn delay_from_millis(ms: f64) -> Duration {
    if ms > 0.0 {
        Duration::from_micros((ms * 1000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

/// Task queue over a virtual clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    /// Keyed by (due time, insertion order) so equal due times keep FIFO order.
    queue: BTreeMap<(Duration, u64), (u64, Task)>,
    next_seq: u64,
    generation: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of tasks still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue `task` to run `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: Task) -> TaskHandle {
        let due = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), (self.generation, task));
        TaskHandle {
            generation: self.generation,
            due,
            seq,
        }
    }

    /// Whether the task behind `handle` is still waiting to run.
    pub fn is_pending(&self, handle: &TaskHandle) -> bool {
        handle.generation == self.generation && self.queue.contains_key(&(handle.due, handle.seq))
    }

    /// Move the clock forward by `dt` and return the tasks that fell due.
    pub fn advance_by(&mut self, dt: Duration) -> Vec<Task> {
        self.advance_to(self.now + dt)
    }

    /// Move the clock to `t` and return the tasks due at or before it, in
    /// due order. The clock never moves backwards.
    pub fn advance_to(&mut self, t: Duration) -> Vec<Task> {
        if t > self.now {
            self.now = t;
        }

        let later = self.queue.split_off(&(self.now, u64::MAX));
        let due = std::mem::replace(&mut self.queue, later);

        let generation = self.generation;
        due.into_values()
            .filter_map(|(tagged, task)| (tagged == generation).then_some(task))
            .collect()
    }

    /// Drop every queued task and start a new generation.
    pub fn cancel_all(&mut self) {
        trace!(
            generation = self.generation,
            dropped = self.queue.len(),
            "Cancelling scheduled tasks"
        );
        self.queue.clear();
        self.generation += 1;
    }
}
