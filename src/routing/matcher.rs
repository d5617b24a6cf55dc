//! Route matching module
//!
//! Implements exact path matching over an ordered route list.

use crate::config::Route;

/// Find the first route whose path equals `path`
///
/// Matching is byte-exact: no prefix matching, no trailing-slash folding and
/// no case folding. Query strings must already be stripped by the caller.
pub fn match_route<'a>(path: &str, routes: &'a [Route]) -> Option<&'a Route> {
    routes.iter().find(|route| route.path == path)
}
