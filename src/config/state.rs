// Application state module
// Shared, read-only server state plus the live connection counter

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::Config;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Built once at startup, never mutated
    pub routes: Arc<RouteTable>,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let routes = Arc::new(RouteTable::new(config.routes.clone()));

        Self {
            config,
            routes,
            active_connections: AtomicUsize::new(0),
        }
    }
}
