//! Route table module
//!
//! Immutable path-to-handler table, built once at startup.

use std::collections::HashSet;

use super::match_route;
use crate::config::{default_routes, Route, RouteHandler};
use crate::logger;

/// Read-only route table shared by all sessions
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table, warning about paths that can never be reached
    pub fn new(routes: Vec<Route>) -> Self {
        let mut seen = HashSet::new();
        for route in &routes {
            if !seen.insert(route.path.as_str()) {
                logger::log_warning(&format!(
                    "Duplicate route for '{}' ignored, first definition wins",
                    route.path
                ));
            }
        }

        Self { routes }
    }

    /// Handler for an exact path match, `None` for unknown paths
    pub fn match_route(&self, path: &str) -> Option<&RouteHandler> {
        match_route(path, &self.routes).map(|route| &route.handler)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(default_routes())
    }
}
