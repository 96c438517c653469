//! Wire messages for the admin cache-invalidation channel.
//!
//! The server and the admin dashboard speak a tiny JSON protocol over a
//! persistent WebSocket connection:
//!
//! Client -> Server (handshake, sent once right after connecting):
//!
//! ```json
//! { "type": "adminAuth", "isAdmin": true }
//! ```
//!
//! Server -> Client (invalidation push, zero or more times per connection):
//!
//! ```json
//! { "event": "invalidateCache", "data": { "resource": "testimonials" } }
//! ```
//!
//! There is no acknowledgement in either direction and no protocol version
//! field. The `resource` value is an open string on the wire: the server
//! forwards whatever tag the broadcast trigger was called with, and
//! interpretation is entirely the client's job. [`Resource`] names the tags
//! the server actually emits.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resource categories whose cached query results can be invalidated.
///
/// `Projects` is defined for completeness but no server mutation currently
/// broadcasts it: project create/update/delete leave admin caches to expire
/// on navigation. The admin dashboard therefore has no cache-key mapping for
/// it either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Testimonials,
    Users,
    Settings,
    Notifications,
    Projects,
}

impl Resource {
    /// The wire representation of this resource tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Testimonials => "testimonials",
            Self::Users => "users",
            Self::Settings => "settings",
            Self::Notifications => "notifications",
            Self::Projects => "projects",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known resource tag.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown resource tag: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testimonials" => Ok(Self::Testimonials),
            "users" => Ok(Self::Users),
            "settings" => Ok(Self::Settings),
            "notifications" => Ok(Self::Notifications),
            "projects" => Ok(Self::Projects),
            other => Err(UnknownResource(other.to_owned())),
        }
    }
}

/// Messages a connected client may send to the server.
///
/// Decoding is strict on the `type` discriminant: anything that is not
/// valid JSON with a known `type` fails to parse. The server logs and
/// ignores such input without closing the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Claim admin status for this connection.
    ///
    /// Only `isAdmin: true` promotes the connection; `false` is a no-op.
    #[serde(rename_all = "camelCase")]
    AdminAuth { is_admin: bool },
}

impl ClientMessage {
    /// Decode a client message from a raw JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error for malformed JSON or an
    /// unrecognized `type` discriminant.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The admin auth handshake, as sent by every admin dashboard tab.
    #[must_use]
    pub const fn admin_auth() -> Self {
        Self::AdminAuth { is_admin: true }
    }

    /// Encode this message as a JSON text frame.
    ///
    /// Infallible in practice; falls back to an empty object if serde
    /// ever fails so send paths never have to propagate an error.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

/// Events the server pushes to admin-flagged connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// The named resource's cached query results should be treated as stale.
    ///
    /// Carries no payload beyond the tag: clients always refetch from the
    /// REST API rather than trusting anything on this channel.
    #[serde(rename_all = "camelCase")]
    InvalidateCache { resource: String },
}

impl ServerEvent {
    /// Build an invalidation event for a resource tag.
    pub fn invalidate(resource: impl Into<String>) -> Self {
        Self::InvalidateCache {
            resource: resource.into(),
        }
    }

    /// Decode a server event from a raw JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error for malformed JSON or an
    /// unrecognized `event` discriminant.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Encode this event as a JSON text frame.
    ///
    /// Infallible in practice; falls back to an empty object if serde
    /// ever fails so broadcast paths never have to propagate an error.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_wire_shape() {
        let json = serde_json::to_string(&ClientMessage::admin_auth()).unwrap();
        assert_eq!(json, r#"{"type":"adminAuth","isAdmin":true}"#);
    }

    #[test]
    fn test_handshake_decodes() {
        let msg = ClientMessage::from_json(r#"{ "type": "adminAuth", "isAdmin": true }"#).unwrap();
        assert_eq!(msg, ClientMessage::AdminAuth { is_admin: true });
    }

    #[test]
    fn test_handshake_false_decodes() {
        let msg = ClientMessage::from_json(r#"{"type":"adminAuth","isAdmin":false}"#).unwrap();
        assert_eq!(msg, ClientMessage::AdminAuth { is_admin: false });
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(ClientMessage::from_json(r#"{"type":"somethingElse"}"#).is_err());
        assert!(ClientMessage::from_json("not json at all").is_err());
        assert!(ClientMessage::from_json(r#"{"isAdmin":true}"#).is_err());
    }

    #[test]
    fn test_invalidation_wire_shape() {
        let event = ServerEvent::invalidate(Resource::Testimonials.as_str());
        assert_eq!(
            event.to_json(),
            r#"{"event":"invalidateCache","data":{"resource":"testimonials"}}"#
        );
    }

    #[test]
    fn test_invalidation_roundtrip_unknown_resource() {
        // Delivery is resource-agnostic: unknown tags travel verbatim.
        let event = ServerEvent::invalidate("unknown-resource");
        let back = ServerEvent::from_json(&event.to_json()).unwrap();
        let ServerEvent::InvalidateCache { resource } = back;
        assert_eq!(resource, "unknown-resource");
    }

    #[test]
    fn test_resource_tags() {
        for (tag, resource) in [
            ("testimonials", Resource::Testimonials),
            ("users", Resource::Users),
            ("settings", Resource::Settings),
            ("notifications", Resource::Notifications),
            ("projects", Resource::Projects),
        ] {
            assert_eq!(resource.as_str(), tag);
            assert_eq!(tag.parse::<Resource>().unwrap(), resource);
        }
        assert!("orders".parse::<Resource>().is_err());
    }
}
