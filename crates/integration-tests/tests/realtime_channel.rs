//! End-to-end tests for the WebSocket invalidation channel.
//!
//! Real tokio-tungstenite clients against the real axum router: admin
//! handshake, broadcast fan-out, non-admin exclusion, disconnect handling,
//! and the full loop through the client-side query cache.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use constructivo_client::{QueryCache, SubscriberConfig};
use constructivo_core::{ClientMessage, ServerEvent};
use constructivo_integration_tests::{TestServer, wait_until};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

async fn recv_event<S>(stream: &mut S) -> ServerEvent
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let frame = tokio::time::timeout(RECV_TIMEOUT, stream.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
        .expect("websocket error");
    match frame {
        Message::Text(text) => ServerEvent::from_json(&text).expect("valid server event"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn assert_silent<S>(stream: &mut S)
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let outcome = tokio::time::timeout(Duration::from_millis(200), stream.next()).await;
    assert!(outcome.is_err(), "expected no frame, got {outcome:?}");
}

fn handshake() -> Message {
    Message::Text(ClientMessage::admin_auth().to_json().into())
}

#[tokio::test]
async fn test_broadcast_reaches_admin_tabs_only() {
    let server = TestServer::spawn().await;

    // Two admin dashboard tabs and one tab that never authenticates.
    let mut tab_a = server.connect().await;
    let mut tab_b = server.connect().await;
    let mut tab_c = server.connect().await;

    tab_a.send(handshake()).await.expect("send handshake");
    tab_b.send(handshake()).await.expect("send handshake");
    wait_until(|| server.registry().admin_count() == 2).await;
    wait_until(|| server.registry().connection_count() == 3).await;

    let delivered = server.registry().broadcast("testimonials");
    assert_eq!(delivered, 2);

    for tab in [&mut tab_a, &mut tab_b] {
        let ServerEvent::InvalidateCache { resource } = recv_event(tab).await;
        assert_eq!(resource, "testimonials");
    }
    assert_silent(&mut tab_c).await;
}

#[tokio::test]
async fn test_events_preserve_broadcast_order() {
    let server = TestServer::spawn().await;
    let mut tab = server.connect().await;

    tab.send(handshake()).await.expect("send handshake");
    wait_until(|| server.registry().admin_count() == 1).await;

    for resource in ["users", "settings", "notifications"] {
        server.registry().broadcast(resource);
    }

    for expected in ["users", "settings", "notifications"] {
        let ServerEvent::InvalidateCache { resource } = recv_event(&mut tab).await;
        assert_eq!(resource, expected);
    }
}

#[tokio::test]
async fn test_malformed_frames_do_not_close_the_connection() {
    let server = TestServer::spawn().await;
    let mut tab = server.connect().await;

    tab.send(Message::Text("definitely not json".into()))
        .await
        .expect("send garbage");
    tab.send(Message::Text(r#"{"type":"unknownThing"}"#.into()))
        .await
        .expect("send unknown type");

    // Connection survives and a proper handshake still works.
    tab.send(handshake()).await.expect("send handshake");
    wait_until(|| server.registry().admin_count() == 1).await;

    server.registry().broadcast("users");
    let ServerEvent::InvalidateCache { resource } = recv_event(&mut tab).await;
    assert_eq!(resource, "users");
}

#[tokio::test]
async fn test_disconnect_unregisters_and_broadcast_continues() {
    let server = TestServer::spawn().await;

    let mut tab_a = server.connect().await;
    let mut tab_b = server.connect().await;
    tab_a.send(handshake()).await.expect("send handshake");
    tab_b.send(handshake()).await.expect("send handshake");
    wait_until(|| server.registry().admin_count() == 2).await;

    tab_b.close(None).await.expect("close tab b");
    wait_until(|| server.registry().connection_count() == 1).await;

    // Remaining tab still gets events after the other closed.
    let delivered = server.registry().broadcast("settings");
    assert_eq!(delivered, 1);
    let ServerEvent::InvalidateCache { resource } = recv_event(&mut tab_a).await;
    assert_eq!(resource, "settings");
}

#[tokio::test]
async fn test_unknown_resource_is_forwarded_verbatim() {
    let server = TestServer::spawn().await;
    let mut tab = server.connect().await;

    tab.send(handshake()).await.expect("send handshake");
    wait_until(|| server.registry().admin_count() == 1).await;

    server.registry().broadcast("somethingNew");
    let ServerEvent::InvalidateCache { resource } = recv_event(&mut tab).await;
    assert_eq!(resource, "somethingNew");
}

#[tokio::test]
async fn test_ping_is_answered_with_pong() {
    let server = TestServer::spawn().await;
    let mut tab = server.connect().await;

    tab.send(Message::Ping(b"hello".as_ref().into()))
        .await
        .expect("send ping");

    let frame = tokio::time::timeout(RECV_TIMEOUT, tab.next())
        .await
        .expect("timed out waiting for pong")
        .expect("stream ended")
        .expect("websocket error");
    assert_eq!(frame, Message::Pong(b"hello".as_ref().into()));
}

#[tokio::test]
async fn test_subscriber_marks_cache_stale_end_to_end() {
    let server = TestServer::spawn().await;

    let cache = Arc::new(QueryCache::new());
    cache.insert("/api/testimonials", serde_json::json!([]));
    cache.insert("/api/testimonials/approved", serde_json::json!([]));
    cache.insert("/api/users", serde_json::json!([]));

    let subscriber = tokio::spawn(constructivo_client::run(
        SubscriberConfig::new(server.ws_url()),
        Arc::clone(&cache),
    ));

    // The subscriber's handshake promotes it to admin.
    wait_until(|| server.registry().admin_count() == 1).await;

    server.registry().broadcast("testimonials");

    let cache_probe = Arc::clone(&cache);
    wait_until(move || cache_probe.is_stale("/api/testimonials")).await;
    assert!(cache.is_stale("/api/testimonials/approved"));
    assert!(!cache.is_stale("/api/users"));

    subscriber.abort();
}
