//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use constructivo_core::Resource;

use crate::config::ServerConfig;
use crate::realtime::CacheRegistry;
use crate::services::{EmailService, GoogleOAuth};

/// Resources the server pushes to admin dashboards after a committed write.
///
/// `Projects` and `Settings` are absent on purpose: their mutation routes
/// push nothing, and dashboards refetch that data on navigation instead.
pub const PUSHED_RESOURCES: [Resource; 3] = [
    Resource::Testimonials,
    Resource::Users,
    Resource::Notifications,
];

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    registry: Arc<CacheRegistry>,
    google: GoogleOAuth,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Outbound email is optional: `email` is `None` when SMTP is not
    /// configured and callers skip sending.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
        registry: Arc<CacheRegistry>,
        email: Option<EmailService>,
    ) -> Self {
        let google = GoogleOAuth::new(&config.google, config.oauth_callback_url());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                registry,
                google,
                email,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the live-connection registry.
    #[must_use]
    pub fn registry(&self) -> &CacheRegistry {
        &self.inner.registry
    }

    /// Get the shared handle to the registry for the WebSocket router.
    #[must_use]
    pub fn registry_handle(&self) -> Arc<CacheRegistry> {
        Arc::clone(&self.inner.registry)
    }

    /// Get a reference to the Google OAuth client.
    #[must_use]
    pub fn google(&self) -> &GoogleOAuth {
        &self.inner.google
    }

    /// Get a reference to the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Push a cache invalidation for `resource` to connected admin clients.
    ///
    /// Call only after the corresponding write has committed, so a client
    /// that refetches on receipt observes the new state.
    pub fn invalidate_admin_cache(&self, resource: Resource) {
        debug_assert!(
            PUSHED_RESOURCES.contains(&resource),
            "{resource} is not part of the push surface"
        );
        self.inner.registry.broadcast(resource.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_surface_covers_moderation_resources() {
        assert!(PUSHED_RESOURCES.contains(&Resource::Testimonials));
        assert!(PUSHED_RESOURCES.contains(&Resource::Users));
        assert!(PUSHED_RESOURCES.contains(&Resource::Notifications));
    }

    #[test]
    fn test_project_and_theme_mutations_push_nothing() {
        assert!(!PUSHED_RESOURCES.contains(&Resource::Projects));
        assert!(!PUSHED_RESOURCES.contains(&Resource::Settings));
    }
}
