//! Routing module
//!
//! Maps the path requested in the WebSocket handshake to the session behavior:
//! - Exact path matching, first route wins
//! - Immutable route table shared across sessions

mod matcher;
mod table;

pub use matcher::match_route;
pub use table::RouteTable;
