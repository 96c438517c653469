//! Google OAuth 2.0 sign-in.
//!
//! Implements the authorization-code flow against Google's endpoints:
//! build the consent URL with a CSRF state nonce, exchange the returned code
//! for an access token, then fetch the user's profile.

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GoogleConfig;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Errors from the OAuth flow.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// HTTP transport failure talking to Google.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google rejected the code exchange.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// Profile response lacked a usable email address.
    #[error("Google profile has no verified email")]
    MissingEmail,
}

/// Profile data returned by Google's userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleUser {
    /// Google's stable subject identifier.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleOAuth {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &GoogleConfig, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.expose_secret().to_string(),
            redirect_uri,
        }
    }

    /// Build the consent screen URL for the given CSRF state.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("state", state)
            .finish();
        format!("{AUTHORIZE_ENDPOINT}?{query}")
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::TokenExchange` if Google rejects the code, or
    /// `OAuthError::Http` on transport failure.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("redirect_uri", &self.redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response
                .json::<TokenErrorResponse>()
                .await
                .map(|e| e.error_description.unwrap_or(e.error))
                .unwrap_or_else(|_| "unreadable error response".to_string());
            return Err(OAuthError::TokenExchange(detail));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::MissingEmail` if the profile has no verified
    /// email, or `OAuthError::Http` on transport failure.
    pub async fn fetch_user(&self, access_token: &str) -> Result<GoogleUser, OAuthError> {
        let user: GoogleUser = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if user.email.is_empty() || !user.email_verified {
            return Err(OAuthError::MissingEmail);
        }

        Ok(user)
    }
}

/// Generate a random URL-safe state nonce for CSRF protection.
#[must_use]
pub fn generate_state() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..32)
        .map(|_| {
            const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use url::Url;

    fn oauth() -> GoogleOAuth {
        GoogleOAuth::new(
            &GoogleConfig {
                client_id: "test-client-id".to_string(),
                client_secret: SecretString::from("test-client-secret"),
            },
            "http://localhost:3000/auth/google/callback".to_string(),
        )
    }

    #[test]
    fn test_authorize_url_carries_state_and_redirect() {
        let url = oauth().authorize_url("nonce123");
        let parsed = Url::parse(&url).expect("valid URL");

        assert_eq!(parsed.host_str(), Some("accounts.google.com"));
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("state".to_string(), "nonce123".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:3000/auth/google/callback".to_string()
        )));
    }

    #[test]
    fn test_generate_state_is_random_and_urlsafe() {
        let a = generate_state();
        let b = generate_state();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_userinfo_parsing() {
        let user: GoogleUser = serde_json::from_str(
            r#"{"sub":"108","email":"pat@example.com","email_verified":true,"name":"Pat"}"#,
        )
        .expect("valid profile");
        assert_eq!(user.sub, "108");
        assert_eq!(user.email, "pat@example.com");
        assert!(user.email_verified);
        assert_eq!(user.name.as_deref(), Some("Pat"));
    }
}
