//! Web layer for the reachability map.
//!
//! Provides HTTP endpoints the render layer calls on pointer events, and a
//! background driver that plays click explorations back in real time.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
