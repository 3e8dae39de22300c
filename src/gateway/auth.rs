//! OIDC client-credentials token acquisition for the backend gateway.
//!
//! Token refresh is entirely the gateway's concern and opaque to the rest of
//! the engine (spec.md §4.1): callers just ask for a bearer token and get
//! one, fetched fresh or served from cache as needed.

use parking_lot::RwLock;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Client-credentials OIDC configuration. Constructing a [`TokenProvider`]
/// without one means the gateway issues unauthenticated requests.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub realm: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    300
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Fetches and caches bearer tokens via the OAuth2 client-credentials grant.
/// A fresh token is requested whenever the cached one is within 30 seconds
/// of expiry, avoiding a race against the backend rejecting a stale token
/// mid-request.
pub struct TokenProvider {
    config: Option<OidcConfig>,
    client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(config: Option<OidcConfig>, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            cached: RwLock::new(None),
        }
    }

    pub fn disabled(client: reqwest::Client) -> Self {
        Self::new(None, client)
    }

    /// Returns a bearer token, or `None` when OIDC is not configured or the
    /// token endpoint is unreachable.
    pub async fn token(&self) -> Option<String> {
        let config = self.config.as_ref()?;

        if let Some(cached) = self.cached.read().as_ref() {
            if cached.expires_at > Instant::now() + Duration::from_secs(30) {
                return Some(cached.access_token.clone());
            }
        }

        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ];
        if let Some(realm) = config.realm.as_deref() {
            form.push(("realm", realm));
        }

        let response = self
            .client
            .post(&config.token_url)
            .form(&form)
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!(status = %r.status(), "OIDC token request rejected");
                return None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "OIDC token endpoint unreachable");
                return None;
            }
        };

        let parsed: TokenResponse = match response.json().await {
            Ok(t) => t,
            Err(err) => {
                tracing::warn!(error = %err, "malformed OIDC token response");
                return None;
            }
        };

        let expires_at = Instant::now() + Duration::from_secs(parsed.expires_in);
        *self.cached.write() = Some(CachedToken {
            access_token: parsed.access_token.clone(),
            expires_at,
        });

        Some(parsed.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_none_when_unconfigured() {
        let provider = TokenProvider::disabled(reqwest::Client::new());
        assert_eq!(provider.token().await, None);
    }
}
