//! Route handlers
//!
//! Each handler drives one session over any WebSocket message stream. Send,
//! receive and the stream delay are the only suspension points, and every one
//! of them reports a closed connection as `Flow::Closed` rather than an error.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use super::error::{is_connection_closed, SessionError};
use super::SessionOutcome;
use crate::config::RouteHandler;
use crate::logger;

/// Message channel a session runs over
pub trait WsConnection:
    Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin
{
}

impl<T> WsConnection for T where
    T: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError> + Unpin
{
}

/// How long a finished session waits for the peer's close reply
const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of one suspension point
enum Flow<T> {
    Ready(T),
    Closed,
}

/// Run the handler selected for a session until it finishes or the peer closes
pub async fn run_handler<S: WsConnection>(
    ws: &mut S,
    handler: &RouteHandler,
    peer: SocketAddr,
    path: &str,
) -> Result<SessionOutcome, SessionError> {
    match handler {
        RouteHandler::Notify { payload } => notify(ws, payload).await,
        RouteHandler::Stream {
            payload,
            count,
            interval_ms,
        } => {
            stream(
                ws,
                payload,
                *count,
                Duration::from_millis(*interval_ms),
                peer,
            )
            .await
        }
        RouteHandler::Echo { prefix } => echo(ws, prefix, peer, path).await,
        RouteHandler::Transact { payload } => transact(ws, payload, peer, path).await,
    }
}

async fn notify<S: WsConnection>(ws: &mut S, payload: &str) -> Result<SessionOutcome, SessionError> {
    if let Flow::Closed = send_text(ws, payload).await? {
        return Ok(SessionOutcome::PeerClosed);
    }
    finish(ws).await?;
    Ok(SessionOutcome::Completed)
}

async fn stream<S: WsConnection>(
    ws: &mut S,
    payload: &str,
    count: u32,
    interval: Duration,
    peer: SocketAddr,
) -> Result<SessionOutcome, SessionError> {
    for _ in 0..count {
        if let Flow::Closed = send_text(ws, payload).await? {
            return Ok(SessionOutcome::PeerClosed);
        }
        if let Flow::Closed = pause(ws, interval).await? {
            return Ok(SessionOutcome::PeerClosed);
        }
    }
    logger::log_stream_finished(&peer, count);
    finish(ws).await?;
    Ok(SessionOutcome::Completed)
}

async fn echo<S: WsConnection>(
    ws: &mut S,
    prefix: &str,
    peer: SocketAddr,
    path: &str,
) -> Result<SessionOutcome, SessionError> {
    loop {
        let Flow::Ready(message) = recv(ws).await? else {
            return Ok(SessionOutcome::PeerClosed);
        };
        logger::log_message_received(&peer, path, &message);

        if let Flow::Closed = send_text(ws, &format!("{prefix}{message}")).await? {
            return Ok(SessionOutcome::PeerClosed);
        }
    }
}

async fn transact<S: WsConnection>(
    ws: &mut S,
    payload: &str,
    peer: SocketAddr,
    path: &str,
) -> Result<SessionOutcome, SessionError> {
    loop {
        let Flow::Ready(message) = recv(ws).await? else {
            return Ok(SessionOutcome::PeerClosed);
        };
        logger::log_message_received(&peer, path, &message);

        if let Flow::Closed = send_text(ws, payload).await? {
            return Ok(SessionOutcome::PeerClosed);
        }
    }
}

/// Close our side and wait for the peer to acknowledge
///
/// Inbound data arriving before the acknowledgement is discarded. A peer that
/// never replies is given up on after `CLOSE_TIMEOUT` and the connection is
/// dropped.
pub(super) async fn finish<S: WsConnection>(ws: &mut S) -> Result<(), SessionError> {
    match ws.close().await {
        Ok(()) => {}
        Err(e) if is_connection_closed(&e) => return Ok(()),
        Err(e) => return Err(SessionError::Transport(e)),
    }
    let drain = async {
        while let Flow::Ready(_) = recv(ws).await? {}
        Ok::<_, SessionError>(())
    };
    tokio::time::timeout(CLOSE_TIMEOUT, drain)
        .await
        .unwrap_or(Ok(()))
}

async fn send_text<S: WsConnection>(ws: &mut S, text: &str) -> Result<Flow<()>, SessionError> {
    match ws.send(Message::text(text.to_owned())).await {
        Ok(()) => Ok(Flow::Ready(())),
        Err(e) if is_connection_closed(&e) => Ok(Flow::Closed),
        Err(e) => Err(SessionError::Transport(e)),
    }
}

/// Wait for the next data message
///
/// Control frames are answered by the transport and skipped here. A close
/// frame is skipped too: the stream ends right after it, once the reply
/// has been flushed.
async fn recv<S: WsConnection>(ws: &mut S) -> Result<Flow<String>, SessionError> {
    loop {
        match ws.next().await {
            None => return Ok(Flow::Closed),
            Some(Ok(Message::Text(text))) => return Ok(Flow::Ready(text.as_str().to_owned())),
            Some(Ok(Message::Binary(data))) => {
                return Ok(Flow::Ready(String::from_utf8_lossy(&data).into_owned()));
            }
            Some(Ok(_)) => {}
            Some(Err(e)) if is_connection_closed(&e) => return Ok(Flow::Closed),
            Some(Err(e)) => return Err(SessionError::Transport(e)),
        }
    }
}

/// Sleep for `interval` while still watching for the peer going away
async fn pause<S: WsConnection>(ws: &mut S, interval: Duration) -> Result<Flow<()>, SessionError> {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return Ok(Flow::Ready(())),
            inbound = recv(ws) => {
                if let Flow::Closed = inbound? {
                    return Ok(Flow::Closed);
                }
            }
        }
    }
}
