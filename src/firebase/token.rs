//! Bearer-token acquisition for the store clients
//!
//! Exchanges the service-account key for a short-lived access token via a
//! signed JWT assertion grant, caching the token until near expiry. One
//! provider is constructed at startup and shared by every client.

use crate::error::Result;
use crate::firebase::credentials::ServiceAccountKey;
use anyhow::anyhow;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

const ASSERTION_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const ASSERTION_TTL_SECS: i64 = 3600;

/// Shared access-token provider
#[derive(Clone)]
pub struct TokenProvider {
    inner: Arc<Inner>,
}

enum Source {
    ServiceAccount(Box<ServiceAccountKey>),
    /// A fixed token, for emulator endpoints and tests
    Fixed(String),
}

struct Inner {
    source: Source,
    http_client: Client,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl TokenProvider {
    /// Create a provider backed by a service-account key
    pub fn new(key: ServiceAccountKey) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(Inner {
                source: Source::ServiceAccount(Box::new(key)),
                http_client,
                token: RwLock::new(None),
            }),
        }
    }

    /// Create a provider that always hands out the given token.
    /// Intended for emulator endpoints and wiremock-backed tests.
    pub fn with_token(token: impl Into<String>) -> Self {
        let http_client = Client::new();
        Self {
            inner: Arc::new(Inner {
                source: Source::Fixed(token.into()),
                http_client,
                token: RwLock::new(None),
            }),
        }
    }

    /// Get a valid access token (with caching)
    pub async fn token(&self) -> Result<String> {
        let key = match &self.inner.source {
            Source::Fixed(token) => return Ok(token.clone()),
            Source::ServiceAccount(key) => key,
        };

        // Check if we have a valid cached token
        {
            let token = self.inner.token.read().await;
            if let Some(ref t) = *token {
                if t.expires_at > chrono::Utc::now() + chrono::Duration::seconds(30) {
                    return Ok(t.access_token.clone());
                }
            }
        }

        let assertion = sign_assertion(key)?;

        let params = [
            ("grant_type", ASSERTION_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .inner
            .http_client
            .post(&key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| anyhow!("failed to request access token: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("failed to obtain access token: {} - {}", status, body).into());
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: i64,
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("failed to parse token response: {}", e))?;

        let cached = CachedToken {
            access_token: token_response.access_token.clone(),
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(token_response.expires_in),
        };

        {
            let mut token = self.inner.token.write().await;
            *token = Some(cached);
        }

        Ok(token_response.access_token)
    }
}

fn sign_assertion(key: &ServiceAccountKey) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_TTL_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| anyhow!("invalid service account private key: {}", e))?;

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| anyhow!("failed to sign token assertion: {}", e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_token_provider() {
        let provider = TokenProvider::with_token("test-token");
        assert_eq!(provider.token().await.unwrap(), "test-token");
    }

    #[tokio::test]
    async fn test_fixed_token_provider_is_cheap_to_clone() {
        let provider = TokenProvider::with_token("test-token");
        let clone = provider.clone();
        assert_eq!(clone.token().await.unwrap(), "test-token");
    }

    #[test]
    fn test_sign_assertion_rejects_garbage_key() {
        let key = ServiceAccountKey {
            client_email: "a@b.iam.gserviceaccount.com".to_string(),
            private_key: "not a pem".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
        };
        assert!(sign_assertion(&key).is_err());
    }
}
