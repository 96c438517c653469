//! WebSocket transport for the invalidation channel.
//!
//! The upgrade endpoint is deliberately unauthenticated: every connection
//! starts as a plain subscriber and only the in-band admin handshake opts it
//! into invalidation events. Session checks stay on the REST surface.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};

use super::CacheRegistry;

/// Build the realtime router.
///
/// Standalone so tests can mount it on an ephemeral listener without the
/// rest of the application.
pub fn router(registry: Arc<CacheRegistry>) -> Router {
    Router::new()
        .route("/ws", get(upgrade_handler))
        .with_state(registry)
}

async fn upgrade_handler(
    ws: WebSocketUpgrade,
    State(registry): State<Arc<CacheRegistry>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Drive one connection until either side closes.
///
/// Two half-duplex flows share a `select` loop: outbound events arrive on the
/// registry channel and are written as text frames; inbound frames feed the
/// registry's message handler. Pings are answered, close ends the loop, and
/// the registration is always torn down on exit.
async fn handle_socket(socket: WebSocket, registry: Arc<CacheRegistry>) {
    let (id, mut events) = registry.register();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(frame) => {
                        if sink.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    // Registry dropped the sender; nothing more to deliver.
                    None => break,
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        registry.handle_message(id, &text);
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // Binary and pong frames carry nothing for us.
                    }
                    Some(Err(error)) => {
                        tracing::debug!(connection_id = %id, %error, "websocket read failed");
                        break;
                    }
                }
            }
        }
    }

    registry.unregister(id);
}
