//! Site settings domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use constructivo_core::SettingsId;

/// Theme settings stored as a JSON document.
///
/// Open-ended on purpose: the dashboard theme editor owns the shape and the
/// server only round-trips it. `primary` is the one key the public site
/// relies on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Theme {
    /// Primary brand color as a CSS color value.
    pub primary: String,
    /// Any further keys the theme editor introduces.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "hsl(222.2 47.4% 11.2%)".to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// The single site settings row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub id: SettingsId,
    pub theme: Json<Theme>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_primary() {
        assert_eq!(Theme::default().primary, "hsl(222.2 47.4% 11.2%)");
    }

    #[test]
    fn test_theme_roundtrips_extra_keys() {
        let json = serde_json::json!({
            "primary": "hsl(20 80% 50%)",
            "radius": "0.5rem"
        });
        let theme: Theme = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(theme.primary, "hsl(20 80% 50%)");
        assert_eq!(serde_json::to_value(&theme).unwrap(), json);
    }
}
