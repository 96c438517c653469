//! Admin cache-invalidation push channel.
//!
//! When a mutation endpoint commits a write, it asks the [`CacheRegistry`] to
//! broadcast an invalidation event naming the affected resource. Every
//! connected admin dashboard tab holds a WebSocket subscription and marks the
//! matching cached query keys stale, so multiple open dashboards converge
//! without polling.
//!
//! Guarantees are deliberately weak: delivery is best-effort and in-memory
//! only. A send to a closed or backed-up connection is skipped, nothing is
//! queued or replayed, and a restart drops all registrations. That is enough
//! because this channel is a freshness hint, never a source of truth - every
//! authoritative read goes through the REST API.
//!
//! Per-connection event order matches broadcast order (one lock-held pass per
//! broadcast). No order is defined between broadcasts racing on different
//! request tasks, which is fine since clients refetch full state.

mod ws;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;

use constructivo_core::{ClientMessage, ConnectionId, ServerEvent};

pub use ws::router;

/// Handle for pushing text frames to one connected client.
///
/// The receiving half lives in the connection's socket task; dropping that
/// task closes the channel, which `broadcast` treats as "skip silently".
#[derive(Debug)]
struct ConnectionHandle {
    /// Set once the client sends the admin auth handshake.
    is_admin: bool,
    sender: mpsc::UnboundedSender<String>,
}

/// Registry of live WebSocket connections and their admin flags.
///
/// Owned by the application state and shared with the socket handler; all
/// methods take `&self` so mutation handlers can fan out events from any
/// request task.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    next_id: AtomicU64,
}

impl CacheRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection in the non-admin state.
    ///
    /// Returns the connection's ID and the receiving half of its outbound
    /// channel. The caller's socket task owns the receiver and must call
    /// [`Self::unregister`] when the transport closes.
    pub fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        self.connections.write().insert(
            id,
            ConnectionHandle {
                is_admin: false,
                sender: tx,
            },
        );

        tracing::debug!(connection_id = %id, "connection registered");
        (id, rx)
    }

    /// Remove a connection from the live set.
    ///
    /// Called from the socket task's close path; forgetting to call it is
    /// harmless beyond a stale map entry, since sends to the closed channel
    /// are skipped anyway.
    pub fn unregister(&self, id: ConnectionId) {
        self.connections.write().remove(&id);
        tracing::debug!(connection_id = %id, "connection unregistered");
    }

    /// Process an inbound text frame from a connection.
    ///
    /// The only recognized message is the admin auth handshake
    /// `{"type":"adminAuth","isAdmin":true}`, which promotes the connection.
    /// Anything else - malformed JSON, unknown discriminants, `isAdmin:
    /// false` - is logged and ignored. Bad input never closes the connection
    /// and never surfaces an error to the caller.
    pub fn handle_message(&self, id: ConnectionId, raw: &str) {
        match ClientMessage::from_json(raw) {
            Ok(ClientMessage::AdminAuth { is_admin: true }) => {
                if let Some(handle) = self.connections.write().get_mut(&id) {
                    handle.is_admin = true;
                    tracing::debug!(connection_id = %id, "connection promoted to admin");
                }
            }
            Ok(ClientMessage::AdminAuth { is_admin: false }) => {
                tracing::debug!(connection_id = %id, "handshake without admin claim ignored");
            }
            Err(error) => {
                tracing::debug!(connection_id = %id, %error, "ignoring unparseable message");
            }
        }
    }

    /// Send an invalidation event to every admin-flagged connection.
    ///
    /// Fire-and-forget: sends that fail because the peer's channel is already
    /// closed are skipped without affecting other recipients, and the call
    /// never blocks on client acknowledgement. Delivery is resource-agnostic;
    /// the tag travels verbatim and interpretation is the client's job.
    ///
    /// Returns the number of connections the event was handed to.
    pub fn broadcast(&self, resource: &str) -> usize {
        let frame = ServerEvent::invalidate(resource).to_json();
        let connections = self.connections.read();

        let mut delivered = 0;
        for (id, handle) in connections.iter() {
            if !handle.is_admin {
                continue;
            }
            if handle.sender.send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(connection_id = %id, resource, "skipping closed connection");
            }
        }

        tracing::debug!(resource, delivered, "invalidation broadcast");
        delivered
    }

    /// Number of live connections (admin or not). Used by tests and logs.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Number of live admin-flagged connections.
    #[must_use]
    pub fn admin_count(&self) -> usize {
        self.connections.read().values().filter(|h| h.is_admin).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constructivo_core::Resource;
    use tokio::sync::mpsc::UnboundedReceiver;

    const HANDSHAKE: &str = r#"{"type":"adminAuth","isAdmin":true}"#;

    fn connect_admin(registry: &CacheRegistry) -> (ConnectionId, UnboundedReceiver<String>) {
        let (id, rx) = registry.register();
        registry.handle_message(id, HANDSHAKE);
        (id, rx)
    }

    fn expect_event(rx: &mut UnboundedReceiver<String>, resource: &str) {
        let frame = rx.try_recv().expect("expected an invalidation event");
        let event = ServerEvent::from_json(&frame).expect("frame should parse");
        let ServerEvent::InvalidateCache { resource: got } = event;
        assert_eq!(got, resource);
    }

    #[test]
    fn test_broadcast_reaches_every_admin_exactly_once() {
        let registry = CacheRegistry::new();
        let (_a, mut rx_a) = connect_admin(&registry);
        let (_b, mut rx_b) = connect_admin(&registry);

        for resource in [
            Resource::Testimonials,
            Resource::Users,
            Resource::Settings,
            Resource::Notifications,
        ] {
            let delivered = registry.broadcast(resource.as_str());
            assert_eq!(delivered, 2);
            expect_event(&mut rx_a, resource.as_str());
            expect_event(&mut rx_b, resource.as_str());
            // Exactly once: nothing further queued.
            assert!(rx_a.try_recv().is_err());
            assert!(rx_b.try_recv().is_err());
        }
    }

    #[test]
    fn test_unauthenticated_connection_receives_nothing() {
        let registry = CacheRegistry::new();
        let (_id, mut rx) = registry.register();

        registry.broadcast("users");
        registry.broadcast("settings");
        registry.broadcast("testimonials");

        assert!(rx.try_recv().is_err());
        assert_eq!(registry.admin_count(), 0);
    }

    #[test]
    fn test_malformed_message_neither_promotes_nor_evicts() {
        let registry = CacheRegistry::new();
        let (id, mut rx) = registry.register();

        registry.handle_message(id, "this is not json{");
        registry.handle_message(id, r#"{"type":"unknownThing"}"#);
        registry.handle_message(id, r#"{"isAdmin":true}"#);

        assert_eq!(registry.connection_count(), 1);
        assert_eq!(registry.admin_count(), 0);

        registry.broadcast("users");
        assert!(rx.try_recv().is_err());

        // The connection still works: a proper handshake promotes it.
        registry.handle_message(id, HANDSHAKE);
        registry.broadcast("users");
        expect_event(&mut rx, "users");
    }

    #[test]
    fn test_handshake_without_admin_claim_is_ignored() {
        let registry = CacheRegistry::new();
        let (id, mut rx) = registry.register();

        registry.handle_message(id, r#"{"type":"adminAuth","isAdmin":false}"#);
        assert_eq!(registry.admin_count(), 0);

        registry.broadcast("settings");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unknown_resource_delivered_verbatim() {
        let registry = CacheRegistry::new();
        let (_id, mut rx) = connect_admin(&registry);

        let delivered = registry.broadcast("unknown-resource");
        assert_eq!(delivered, 1);
        expect_event(&mut rx, "unknown-resource");
    }

    #[test]
    fn test_mixed_admin_and_nonadmin_connections() {
        // Two admin tabs, one connection that never authenticates.
        let registry = CacheRegistry::new();
        let (_a, mut rx_a) = connect_admin(&registry);
        let (_b, mut rx_b) = connect_admin(&registry);
        let (_c, mut rx_c) = registry.register();

        let delivered = registry.broadcast("users");
        assert_eq!(delivered, 2);
        expect_event(&mut rx_a, "users");
        expect_event(&mut rx_b, "users");
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn test_closed_connection_is_skipped_silently() {
        let registry = CacheRegistry::new();
        let (_a, mut rx_a) = connect_admin(&registry);
        let (_b, rx_b) = connect_admin(&registry);

        // Simulate a transport mid-close: the socket task dropped its
        // receiver but unregister has not run yet.
        drop(rx_b);

        let delivered = registry.broadcast("testimonials");
        assert_eq!(delivered, 1);
        expect_event(&mut rx_a, "testimonials");
    }

    #[test]
    fn test_unregister_removes_connection() {
        let registry = CacheRegistry::new();
        let (id, _rx) = connect_admin(&registry);
        assert_eq!(registry.connection_count(), 1);

        registry.unregister(id);
        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.broadcast("users"), 0);
    }

    #[test]
    fn test_per_connection_ordering() {
        let registry = CacheRegistry::new();
        let (_id, mut rx) = connect_admin(&registry);

        registry.broadcast("testimonials");
        registry.broadcast("notifications");
        registry.broadcast("users");

        expect_event(&mut rx, "testimonials");
        expect_event(&mut rx, "notifications");
        expect_event(&mut rx, "users");
    }
}
