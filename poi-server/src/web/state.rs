//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::MapEngine;
use crate::feed::HttpFeedClient;

/// Shared application state.
pub struct AppState<S = HttpFeedClient> {
    /// Map engine owning markers, filters and the timetable cache
    pub engine: Arc<MapEngine<S>>,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(engine: Arc<MapEngine<S>>) -> Self {
        Self { engine }
    }
}

// Derived Clone would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}
