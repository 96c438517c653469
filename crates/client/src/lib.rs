//! Dashboard-side companion to the server's invalidation channel.
//!
//! Holds REST responses in a [`QueryCache`] keyed by request path and keeps
//! them fresh by subscribing to the server's WebSocket push: when an
//! invalidation event names a resource, the mapped cache keys are marked
//! stale and the next read triggers a refetch.
//!
//! The subscriber reconnects with capped exponential backoff and, because
//! events may have been missed while disconnected, marks the entire cache
//! stale after every reconnect.

pub mod cache;
pub mod subscriber;

pub use cache::{CachedQuery, QueryCache};
pub use subscriber::{Backoff, SubscriberConfig, apply_event, resource_keys, run};
