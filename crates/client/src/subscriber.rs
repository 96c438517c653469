//! Reconnecting WebSocket subscriber.
//!
//! Connects to the server's `/ws` endpoint, identifies as an admin client,
//! and feeds invalidation events into the [`QueryCache`]. The connection is
//! assumed to drop routinely (deploys, laptops sleeping, proxies timing
//! out); the loop reconnects forever with capped exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use constructivo_core::{ClientMessage, ServerEvent};

use crate::cache::QueryCache;

/// Cache keys to mark stale when a resource is invalidated.
///
/// The server pushes resource tags, not keys; translating them is the
/// client's job. Testimonials map to both the admin list and the public
/// approved list since moderation changes either. Unmapped tags (including
/// `notifications`, which the dashboard polls through its own badge
/// component, and any tag added server-side later) are ignored.
#[must_use]
pub fn resource_keys(resource: &str) -> &'static [&'static str] {
    match resource {
        "testimonials" => &["/api/testimonials", "/api/testimonials/approved"],
        "users" => &["/api/users"],
        "settings" => &["/api/settings"],
        _ => &[],
    }
}

/// Apply one raw frame from the server to the cache.
///
/// Unparseable frames and unknown resources are logged and ignored; bad
/// input from the server must never poison the cache or kill the loop.
pub fn apply_event(cache: &QueryCache, raw: &str) {
    match ServerEvent::from_json(raw) {
        Ok(ServerEvent::InvalidateCache { resource }) => {
            let keys = resource_keys(&resource);
            if keys.is_empty() {
                tracing::debug!(resource, "ignoring invalidation for unmapped resource");
                return;
            }
            cache.invalidate(keys);
            tracing::debug!(resource, ?keys, "cache keys marked stale");
        }
        Err(error) => {
            tracing::debug!(%error, "ignoring unparseable server frame");
        }
    }
}

/// Capped exponential backoff between reconnect attempts.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    /// Create a backoff starting at `initial` and doubling up to `max`.
    #[must_use]
    pub const fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// Return the next delay and advance the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    /// Reset after a successful connection.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// WebSocket URL, e.g. `ws://localhost:3000/ws`.
    pub url: String,
    /// First reconnect delay.
    pub initial_backoff: Duration,
    /// Upper bound for the reconnect delay.
    pub max_backoff: Duration,
}

impl SubscriberConfig {
    /// Config with the default backoff schedule (500ms doubling to 30s).
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Run the subscription loop until the task is cancelled.
///
/// Each successful connection sends the admin handshake before anything
/// else. After a *re*connection the whole cache is marked stale: events
/// pushed while disconnected are gone for good, so every cached query must
/// be treated as suspect.
pub async fn run(config: SubscriberConfig, cache: Arc<QueryCache>) {
    let mut backoff = Backoff::new(config.initial_backoff, config.max_backoff);
    let mut had_connection = false;

    loop {
        match connect_async(&config.url).await {
            Ok((socket, _response)) => {
                tracing::info!(url = %config.url, "invalidation channel connected");
                backoff.reset();

                if had_connection {
                    cache.invalidate_all();
                    tracing::debug!("cache marked stale after reconnect");
                }
                had_connection = true;

                drive_connection(socket, &cache).await;
                tracing::warn!("invalidation channel disconnected");
            }
            Err(error) => {
                tracing::warn!(%error, "invalidation channel connect failed");
            }
        }

        tokio::time::sleep(backoff.next_delay()).await;
    }
}

/// Handshake, then pump frames into the cache until the socket closes.
async fn drive_connection(socket: WebSocketStream<MaybeTlsStream<TcpStream>>, cache: &QueryCache) {
    let (mut sink, mut stream) = socket.split();

    let handshake = ClientMessage::admin_auth().to_json();
    if sink.send(Message::Text(handshake.into())).await.is_err() {
        return;
    }

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => apply_event(cache, &text),
            Ok(Message::Ping(payload)) => {
                if sink.send(Message::Pong(payload)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded_cache() -> QueryCache {
        let cache = QueryCache::new();
        cache.insert("/api/testimonials", json!([]));
        cache.insert("/api/testimonials/approved", json!([]));
        cache.insert("/api/users", json!([]));
        cache.insert("/api/settings", json!({}));
        cache
    }

    #[test]
    fn test_resource_key_mapping() {
        assert_eq!(
            resource_keys("testimonials"),
            &["/api/testimonials", "/api/testimonials/approved"]
        );
        assert_eq!(resource_keys("users"), &["/api/users"]);
        assert_eq!(resource_keys("settings"), &["/api/settings"]);
        assert!(resource_keys("notifications").is_empty());
        assert!(resource_keys("projects").is_empty());
        assert!(resource_keys("whatever").is_empty());
    }

    #[test]
    fn test_apply_event_marks_mapped_keys() {
        let cache = seeded_cache();

        apply_event(
            &cache,
            r#"{"event":"invalidateCache","data":{"resource":"testimonials"}}"#,
        );

        assert!(cache.is_stale("/api/testimonials"));
        assert!(cache.is_stale("/api/testimonials/approved"));
        assert!(!cache.is_stale("/api/users"));
        assert!(!cache.is_stale("/api/settings"));
    }

    #[test]
    fn test_apply_event_ignores_unknown_resource() {
        let cache = seeded_cache();

        apply_event(
            &cache,
            r#"{"event":"invalidateCache","data":{"resource":"projects"}}"#,
        );

        assert!(!cache.is_stale("/api/testimonials"));
        assert!(!cache.is_stale("/api/users"));
        assert!(!cache.is_stale("/api/settings"));
    }

    #[test]
    fn test_apply_event_ignores_garbage() {
        let cache = seeded_cache();

        apply_event(&cache, "not even json");
        apply_event(&cache, r#"{"event":"somethingElse","data":{}}"#);

        assert!(!cache.is_stale("/api/users"));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut backoff = Backoff::new(Duration::from_millis(500), Duration::from_secs(4));

        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(2));
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));
        // Capped from here on.
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_reset() {
        let mut backoff = Backoff::new(Duration::from_millis(500), Duration::from_secs(30));
        backoff.next_delay();
        backoff.next_delay();

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
    }
}
