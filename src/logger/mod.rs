//! Logger module
//!
//! Provides logging utilities for the WebSocket server including:
//! - Server lifecycle logging
//! - Connection and session logging
//! - Error and warning logging
//! - File-based logging support
//!
//! Events go through `tracing`; `init` installs the subscriber.

pub mod writer;

use crate::config::{Config, Route};
use crate::session::{SessionError, SessionOutcome};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. `RUST_LOG` overrides
/// `logging.level` when set.
pub fn init(config: &Config) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(std::io::Error::other)?;

    let log_file = config.logging.log_file.as_deref();
    let make_writer = writer::make_writer(log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .with_ansi(log_file.is_none())
        .with_target(false)
        .try_init()
        .map_err(std::io::Error::other)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, routes: &[Route]) {
    tracing::info!("WebSocket server is running on ws://{addr}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
    for route in routes {
        tracing::info!("  - {} -> {}", route.path, route.handler.kind());
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::info!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_rejected(peer_addr: &SocketAddr, active: usize, max: u64) {
    log_warning(&format!(
        "Max connections reached: {active}/{max}. Connection from {peer_addr} rejected."
    ));
}

pub fn log_session_start(peer_addr: &SocketAddr, path: &str, kind: &str) {
    tracing::info!("New connection from {peer_addr} with path: {path} ({kind})");
}

pub fn log_unknown_path(peer_addr: &SocketAddr, path: &str) {
    tracing::warn!("Unknown path: {path} (from {peer_addr})");
}

pub fn log_message_received(peer_addr: &SocketAddr, path: &str, message: &str) {
    tracing::debug!("Received message on {path} path from {peer_addr}: {message}");
}

pub fn log_stream_finished(peer_addr: &SocketAddr, count: u32) {
    tracing::info!("Finished sending {count} stream messages to {peer_addr}");
}

pub fn log_session_end(peer_addr: &SocketAddr, outcome: SessionOutcome) {
    match outcome {
        SessionOutcome::PeerClosed => tracing::info!("Connection closed from {peer_addr}"),
        SessionOutcome::Completed | SessionOutcome::UnknownRoute => {
            tracing::debug!("Session with {peer_addr} ended: {outcome:?}");
        }
    }
}

pub fn log_session_error(peer_addr: &SocketAddr, err: &SessionError) {
    log_error(&format!("Session with {peer_addr} failed: {err}"));
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_shutdown(active: usize) {
    tracing::info!("Shutdown requested, stopped accepting ({active} sessions still open)");
}
