//! Click playback and per-viewer interaction state.

mod playback;
mod scheduler;
mod session;

pub use playback::{Playback, REDRAW_INTERVAL_MS, Step};
pub use scheduler::{ListedStation, Scheduler, Task, TaskHandle, delay_from_millis};
pub use session::{PlaybackStarted, Session, ViewState};
