//! Testimonial domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use constructivo_core::TestimonialId;

/// A client testimonial.
///
/// Submissions land unapproved and unrejected; moderation flips one of the
/// two flags. Only approved testimonials appear on the public site.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: TestimonialId,
    /// Name of the person quoted.
    pub name: String,
    /// Their role or company (e.g. "Homeowner", "Facility Manager").
    pub role: String,
    pub content: String,
    pub approved: bool,
    pub rejected: bool,
    pub created_at: DateTime<Utc>,
}

impl Testimonial {
    /// Human-readable moderation outcome, used in admin notifications.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.approved {
            "approved"
        } else if self.rejected {
            "rejected"
        } else {
            "updated"
        }
    }
}

/// Payload for a public testimonial submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestimonial {
    pub name: String,
    pub role: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testimonial(approved: bool, rejected: bool) -> Testimonial {
        Testimonial {
            id: TestimonialId::new(1),
            name: "Dana".to_string(),
            role: "Homeowner".to_string(),
            content: "Great work".to_string(),
            approved,
            rejected,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_status_label() {
        assert_eq!(testimonial(true, false).status_label(), "approved");
        assert_eq!(testimonial(false, true).status_label(), "rejected");
        assert_eq!(testimonial(false, false).status_label(), "updated");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(testimonial(false, false)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
