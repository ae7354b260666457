use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::MatchingEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and the `Arc`s are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: alumni_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Event bus for publishing match lifecycle events.
    pub event_bus: Arc<alumni_events::EventBus>,
}

impl AppState {
    /// Build a matching engine bound to this state's pool, bus and window.
    pub fn engine(&self) -> MatchingEngine {
        MatchingEngine::new(
            self.pool.clone(),
            Arc::clone(&self.event_bus),
            self.config.match_response_days,
        )
    }
}
