// Server loop module
// Accepts connections until shutdown is requested

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Accept connections and hand each one to its own session task.
///
/// Accept errors are logged and the loop keeps going; a failing session never
/// reaches this loop. Returns once `shutdown` is notified. Sessions are spawned
/// with `spawn_local`, so this must run inside a `LocalSet`.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));
                return Ok(());
            }
        }
    }
}
