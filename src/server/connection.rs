// 连接处理模块
// 处理单个 TCP 连接的接受和会话派发

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::config;
use crate::logger;
use crate::session;

/// Accept a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<config::AppState>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject before the handshake
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_connection_rejected(&peer_addr, prev_count, max_conn);
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Run the session for one connection in a local task.
///
/// The session owns the stream; the counter is decremented when it ends.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<config::AppState>,
) {
    tokio::task::spawn_local(async move {
        if let Err(e) = stream.set_nodelay(true) {
            logger::log_warning(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
        }

        session::dispatch(stream, peer_addr, &state.routes).await;

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
