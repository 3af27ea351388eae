//! Application state shared across route handlers.

use std::sync::Arc;
use std::time::Instant;

use concierge_engine::DialogueEngine;

/// Shared application state, cheap to clone across handler tasks.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DialogueEngine>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<DialogueEngine>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}
