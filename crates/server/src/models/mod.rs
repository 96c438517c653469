//! Domain models for the site server.
//!
//! Row types map 1:1 onto the `PostgreSQL` schema and serialize to the
//! camelCase JSON shapes the dashboard consumes.

pub mod notification;
pub mod project;
pub mod reaction;
pub mod session;
pub mod settings;
pub mod testimonial;
pub mod user;

pub use notification::Notification;
pub use project::{NewProject, Project, ProjectUpdate};
pub use reaction::{NewReaction, Reaction};
pub use session::{CurrentUser, keys as session_keys};
pub use settings::{SiteSettings, Theme};
pub use testimonial::{NewTestimonial, Testimonial};
pub use user::User;
