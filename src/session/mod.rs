//! Session dispatcher
//!
//! Accepts the WebSocket handshake on a fresh connection, records the
//! requested path, and runs the route handler bound to that path for the
//! lifetime of the connection. Unknown paths get the handshake and a close
//! frame, never a data message.

mod error;
mod handlers;

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

use crate::logger;
use crate::routing::RouteTable;

pub use error::SessionError;
use handlers::run_handler;

/// How a session ended when nothing went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A notify or stream handler sent everything and closed
    Completed,
    /// The peer closed the connection
    PeerClosed,
    /// No route matched; closed without sending data
    UnknownRoute,
}

/// Serve one accepted connection to completion
///
/// Never fails: the outcome or error is logged and the connection dropped.
pub async fn dispatch<T>(io: T, peer: SocketAddr, routes: &RouteTable)
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    match run_session(io, peer, routes).await {
        Ok(outcome) => logger::log_session_end(&peer, outcome),
        Err(err) => logger::log_session_error(&peer, &err),
    }
}

/// Handshake, route by exact request target (path plus query), then run the
/// selected handler
pub async fn run_session<T>(
    io: T,
    peer: SocketAddr,
    routes: &RouteTable,
) -> Result<SessionOutcome, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let mut path = String::new();
    let capture_path = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        let uri = req.uri();
        uri.path_and_query()
            .map_or_else(|| uri.path(), |pq| pq.as_str())
            .clone_into(&mut path);
        Ok(resp)
    };
    let mut ws = accept_hdr_async(io, capture_path)
        .await
        .map_err(SessionError::Handshake)?;

    let Some(handler) = routes.match_route(&path) else {
        logger::log_unknown_path(&peer, &path);
        handlers::finish(&mut ws).await?;
        return Ok(SessionOutcome::UnknownRoute);
    };

    logger::log_session_start(&peer, &path, handler.kind());
    run_handler(&mut ws, handler, peer, &path).await
}
