//! Application services for external integrations.

pub mod email;
pub mod google;
pub mod notify;

pub use email::{EmailError, EmailService};
pub use google::{GoogleOAuth, GoogleUser, OAuthError};
