//! Web layer for the map.
//!
//! Serves markers with their visibility, accepts filter changes and reloads,
//! and answers timetable lookups.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
