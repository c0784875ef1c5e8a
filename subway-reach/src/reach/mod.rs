//! Cost-bounded reachability from a platform.
//!
//! [`ReachEngine::reachable`] answers hover previews with a reachable set;
//! [`ReachEngine::explore`] answers clicks with arrival costs that
//! [`crate::animation`] turns into a timed schedule.

mod config;
mod engine;


pub use config::{DEFAULT_AIRPORT_LINE, ReachConfig};
pub use engine::{Exploration, ReachEngine, ReachError, Reachable};
