//! `WebSocket` echo handler.
//!
//! Clients connect to `GET /ws/stream`. Every text frame is answered with
//! `"echo: {text}"`, one reply per frame, in order. The connection moves
//! Accepting -> Open on upgrade and Open -> Closed on a close frame, end
//! of stream, or any transport error; errors are not reported to the
//! client.

use std::fmt::Display;

use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tracing::debug;

/// Prefix prepended to every echoed frame.
pub const ECHO_PREFIX: &str = "echo: ";

/// Upgrade an HTTP request to a `WebSocket` echo connection.
///
/// # Route
///
/// `GET /ws/stream`
pub async fn ws_stream(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_ws)
}

/// Handle one connection from open to close.
async fn handle_ws(socket: WebSocket) {
    debug!("WebSocket client connected");
    let (outgoing, incoming) = socket.split();
    let replies = echo_loop(incoming, outgoing).await;
    debug!(replies, "WebSocket client disconnected");
}

/// Echo text frames from `incoming` to `outgoing` until the peer goes away.
///
/// Receives one frame at a time and sends its reply before reading the
/// next, so replies are never reordered or batched. Binary, ping, and
/// pong frames get no reply (the transport answers pings). Returns the
/// number of replies sent.
pub async fn echo_loop<St, Si, E>(mut incoming: St, mut outgoing: Si) -> usize
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    Si: Sink<Message> + Unpin,
    E: Display,
{
    let mut replies: usize = 0;

    while let Some(frame) = incoming.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let reply = Message::Text(format!("{ECHO_PREFIX}{}", text.as_str()).into());
                if outgoing.send(reply).await.is_err() {
                    debug!("WebSocket send failed, closing");
                    break;
                }
                replies = replies.saturating_add(1);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("WebSocket error: {e}");
                break;
            }
        }
    }

    // The peer may already be gone; nothing to report either way.
    let _ = outgoing.close().await;
    replies
}
