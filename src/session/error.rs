// Session error module
// Separates the peer-closed signal from real transport faults

use std::io::ErrorKind;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError};

/// Fatal session failure
///
/// A closed connection is never reported through this type; it ends the
/// session with `SessionOutcome::PeerClosed` instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("WebSocket handshake failed: {0}")]
    Handshake(#[source] WsError),
    #[error("transport failure: {0}")]
    Transport(#[source] WsError),
}

/// Whether a transport error means the peer went away
pub fn is_connection_closed(err: &WsError) -> bool {
    match err {
        WsError::ConnectionClosed
        | WsError::AlreadyClosed
        | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => true,
        WsError::Io(io) => matches!(
            io.kind(),
            ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
                | ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}
