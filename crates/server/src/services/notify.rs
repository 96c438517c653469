//! In-app notification fan-out.
//!
//! Moderation events produce a notification row per admin account, then push
//! a single `notifications` invalidation so open dashboards refetch their
//! lists. The broadcast happens after the rows are committed; a client that
//! refetches on the event always sees the new rows.

use sqlx::PgPool;

use constructivo_core::Resource;

use crate::db::{NotificationRepository, RepositoryError, UserRepository};
use crate::realtime::CacheRegistry;

/// Notification kind for testimonial moderation events.
pub const KIND_TESTIMONIAL: &str = "testimonial";

/// Store a notification for every admin and broadcast the invalidation.
///
/// # Errors
///
/// Returns `RepositoryError` if listing admins or inserting a row fails.
/// A failed insert aborts the fan-out; rows already written stay written,
/// which is acceptable for advisory notifications.
pub async fn notify_admins(
    pool: &PgPool,
    registry: &CacheRegistry,
    title: &str,
    message: &str,
    kind: &str,
) -> Result<(), RepositoryError> {
    let admins = UserRepository::new(pool).list_admins().await?;
    let notifications = NotificationRepository::new(pool);

    for admin in &admins {
        notifications
            .create(admin.id, title, message, kind)
            .await?;
    }

    if !admins.is_empty() {
        registry.broadcast(Resource::Notifications.as_str());
    }

    tracing::debug!(recipients = admins.len(), kind, "admin notification fan-out");
    Ok(())
}
