//! HTTP route handlers for the site server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Health check
//!
//! # Public API
//! GET  /api/projects                        - Portfolio projects
//! GET  /api/projects/{id}/reactions         - Reactions on a project
//! POST /api/projects/{id}/reactions         - Add a reaction
//! GET  /api/testimonials/approved           - Approved testimonials
//! POST /api/testimonials                    - Submit a testimonial
//! GET  /api/settings                        - Theme settings
//! POST /api/contact                         - Contact form
//! GET  /api/user                            - Current session user
//! POST /api/logout                          - Sign out
//!
//! # Google OAuth
//! GET  /auth/google                         - Redirect to consent screen
//! GET  /auth/google/callback                - Code exchange + session
//!
//! # Admin API (session + is_admin)
//! GET    /api/users                         - All users
//! PATCH  /api/users/{id}/admin-status       - Grant/revoke admin  [push: users]
//! GET    /api/testimonials                  - All testimonials
//! PATCH  /api/testimonials/{id}/status      - Moderate            [push: testimonials, notifications]
//! DELETE /api/testimonials/{id}             - Delete              [push: testimonials, notifications]
//! POST   /api/projects                      - Create project
//! PATCH  /api/projects/{id}                 - Update project
//! DELETE /api/projects/{id}                 - Delete project
//! PATCH  /api/settings                      - Update theme
//! GET    /api/notifications                 - Own notifications
//! PATCH  /api/notifications/{id}/read       - Mark one read       [push: notifications]
//! POST   /api/notifications/mark-all-read   - Mark all read       [push: notifications]
//! ```
//!
//! `[push: ...]` marks handlers that send a cache invalidation to connected
//! admin dashboards after the write commits. Project and theme mutations push
//! nothing; dashboards refetch that data on navigation.

pub mod auth;
pub mod contact;
pub mod notifications;
pub mod projects;
pub mod reactions;
pub mod settings;
pub mod testimonials;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Public
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            patch(projects::update).delete(projects::remove),
        )
        .route(
            "/projects/{id}/reactions",
            get(reactions::list).post(reactions::create),
        )
        .route(
            "/testimonials",
            get(testimonials::list).post(testimonials::submit),
        )
        .route("/testimonials/approved", get(testimonials::list_approved))
        .route(
            "/testimonials/{id}",
            delete(testimonials::remove),
        )
        .route("/testimonials/{id}/status", patch(testimonials::set_status))
        .route("/settings", get(settings::get_settings).patch(settings::update))
        .route("/contact", post(contact::submit))
        .route("/user", get(auth::current_user))
        .route("/logout", post(auth::logout))
        // Admin
        .route("/users", get(users::list))
        .route("/users/{id}/admin-status", patch(users::set_admin_status))
        .route("/notifications", get(notifications::list))
        .route("/notifications/{id}/read", patch(notifications::mark_read))
        .route(
            "/notifications/mark-all-read",
            post(notifications::mark_all_read),
        )
}

/// Create the `/auth` router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/google", get(auth::google_login))
        .route("/google/callback", get(auth::google_callback))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
