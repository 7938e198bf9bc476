//! Clerk API client for identity delegation.
//!
//! Sign-in, sign-up, and password management all happen on Clerk's hosted
//! account portal; this client only builds the portal URLs and talks to the
//! Backend API for profile reads and updates once a user comes back to us.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClerkConfig;

/// Errors that can occur when interacting with the Clerk API.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or build a request.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Clerk API client.
#[derive(Clone)]
pub struct ClerkClient {
    client: reqwest::Client,
    api_url: String,
    portal_url: String,
}

impl ClerkClient {
    /// Create a new Clerk API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClerkConfig) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();

        // Authorization header
        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| IdentityError::Parse(format!("Invalid secret key format: {e}")))?,
        );

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            portal_url: config.portal_url.trim_end_matches('/').to_string(),
        })
    }

    /// Hosted sign-in page URL, returning to our callback with a CSRF state.
    #[must_use]
    pub fn hosted_sign_in_url(&self, base_url: &str, state: &str) -> String {
        self.hosted_url("sign-in", base_url, state)
    }

    /// Hosted sign-up page URL, returning to our callback with a CSRF state.
    #[must_use]
    pub fn hosted_sign_up_url(&self, base_url: &str, state: &str) -> String {
        self.hosted_url("sign-up", base_url, state)
    }

    fn hosted_url(&self, page: &str, base_url: &str, state: &str) -> String {
        // The portal sends the user back to redirect_url verbatim, so the
        // state rides along inside it.
        let return_url = format!("{base_url}/auth/callback?state={state}");
        format!(
            "{}/{page}?redirect_url={}",
            self.portal_url,
            urlencoding::encode(&return_url)
        )
    }

    /// Fetch a user's profile from the Backend API.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the response cannot be
    /// parsed.
    pub async fn fetch_user(&self, user_id: &str) -> Result<Profile, IdentityError> {
        let url = format!("{}/users/{user_id}", self.api_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }

    /// Update a user's first and last name.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the response cannot be
    /// parsed.
    pub async fn update_names(
        &self,
        user_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Profile, IdentityError> {
        let url = format!("{}/users/{user_id}", self.api_url);

        let body = serde_json::json!({
            "first_name": first_name,
            "last_name": last_name,
        });

        let response = self.client.patch(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }
}

/// Map a provider error code to a user-facing message.
///
/// Unknown codes get a generic message; the raw code is never shown.
#[must_use]
pub fn map_provider_error(code: &str) -> &'static str {
    match code {
        "form_identifier_not_found" => "No account found with this email.",
        "form_password_incorrect" => "Incorrect password. Please try again.",
        "form_identifier_exists" => "An account with this email already exists.",
        _ => "Something went wrong. Please try again.",
    }
}

/// User profile resource from the Clerk Backend API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

/// An email address attached to a profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
}

impl Profile {
    /// The profile's primary email, falling back to the first one on file.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_ref().and_then(|id| {
            self.email_addresses
                .iter()
                .find(|address| address.id == *id)
        });

        primary
            .or_else(|| self.email_addresses.first())
            .map(|address| address.email_address.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> ClerkConfig {
        ClerkConfig {
            publishable_key: "pk_test_aGVsbG8".to_string(),
            secret_key: SecretString::from("sk_test_c2VjcmV0"),
            portal_url: "https://accounts.example.com/".to_string(),
            api_url: "https://api.clerk.com/v1".to_string(),
        }
    }

    #[test]
    fn test_hosted_sign_in_url_encodes_return_url() {
        let client = ClerkClient::new(&test_config()).unwrap();
        let url = client.hosted_sign_in_url("http://localhost:3000", "abc123");

        assert!(url.starts_with("https://accounts.example.com/sign-in?redirect_url="));
        assert!(url.contains("%2Fauth%2Fcallback%3Fstate%3Dabc123"));
        // Trailing slash on the portal URL must not double up
        assert!(!url.contains("com//sign-in"));
    }

    #[test]
    fn test_hosted_sign_up_url_uses_sign_up_page() {
        let client = ClerkClient::new(&test_config()).unwrap();
        let url = client.hosted_sign_up_url("http://localhost:3000", "xyz");
        assert!(url.starts_with("https://accounts.example.com/sign-up?"));
    }

    #[test]
    fn test_primary_email_prefers_primary_id() {
        let profile = Profile {
            id: "user_1".to_string(),
            first_name: None,
            last_name: None,
            primary_email_address_id: Some("em_2".to_string()),
            email_addresses: vec![
                EmailAddress {
                    id: "em_1".to_string(),
                    email_address: "old@example.net".to_string(),
                },
                EmailAddress {
                    id: "em_2".to_string(),
                    email_address: "current@example.net".to_string(),
                },
            ],
        };

        assert_eq!(profile.primary_email(), Some("current@example.net"));
    }

    #[test]
    fn test_primary_email_falls_back_to_first() {
        let profile = Profile {
            id: "user_1".to_string(),
            first_name: None,
            last_name: None,
            primary_email_address_id: Some("em_missing".to_string()),
            email_addresses: vec![EmailAddress {
                id: "em_1".to_string(),
                email_address: "only@example.net".to_string(),
            }],
        };

        assert_eq!(profile.primary_email(), Some("only@example.net"));
    }

    #[test]
    fn test_primary_email_none_when_empty() {
        let profile = Profile {
            id: "user_1".to_string(),
            first_name: None,
            last_name: None,
            primary_email_address_id: None,
            email_addresses: vec![],
        };

        assert_eq!(profile.primary_email(), None);
    }

    #[test]
    fn test_map_provider_error_known_codes() {
        assert_eq!(
            map_provider_error("form_identifier_not_found"),
            "No account found with this email."
        );
        assert_eq!(
            map_provider_error("form_password_incorrect"),
            "Incorrect password. Please try again."
        );
        assert_eq!(
            map_provider_error("form_identifier_exists"),
            "An account with this email already exists."
        );
    }

    #[test]
    fn test_map_provider_error_unknown_code() {
        assert_eq!(
            map_provider_error("session_token_expired"),
            "Something went wrong. Please try again."
        );
    }
}
