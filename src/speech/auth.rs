//! OAuth access tokens for Google Cloud TTS
//!
//! Uses the service-account JWT bearer flow: sign an RS256 assertion with the
//! account's private key, exchange it at the token endpoint, cache the token
//! until shortly before it expires.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{Error, Result};

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const TOKEN_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Refresh this many seconds before the token expires
const EXPIRY_MARGIN_SECS: u64 = 300;

/// Service account JSON structure
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ServiceAccount {
    /// Load a service account from a JSON key file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read service account {}: {e}",
                path.display()
            ))
        })?;

        Self::from_json(&content).map_err(|e| {
            Error::Config(format!(
                "failed to parse service account {}: {e}",
                path.display()
            ))
        })
    }

    /// Parse a service account from JSON text
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or misses required fields
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn token_url(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(GOOGLE_TOKEN_URL)
    }
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// JWT claims for Google OAuth
#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: u64,
    iat: u64,
}

/// Token response from Google
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Cached token info
struct TokenInfo {
    access_token: SecretString,
    expires_at: u64,
}

/// Where access tokens come from
pub struct TokenSource {
    kind: TokenKind,
}

enum TokenKind {
    /// Minted from a service account and cached
    ServiceAccount {
        account: ServiceAccount,
        cache: Mutex<Option<TokenInfo>>,
    },
    /// Pre-minted token used as is
    Static(SecretString),
}

impl TokenSource {
    /// Token source backed by a service account
    #[must_use]
    pub fn service_account(account: ServiceAccount) -> Self {
        Self {
            kind: TokenKind::ServiceAccount {
                account,
                cache: Mutex::new(None),
            },
        }
    }

    /// Token source that always returns the same pre-minted token
    #[must_use]
    pub const fn fixed(token: SecretString) -> Self {
        Self {
            kind: TokenKind::Static(token),
        }
    }

    /// Get a valid access token, refreshing if needed
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` if signing or the token exchange fails
    pub async fn access_token(&self, client: &reqwest::Client) -> Result<SecretString> {
        let (account, cache) = match &self.kind {
            TokenKind::Static(token) => return Ok(token.clone()),
            TokenKind::ServiceAccount { account, cache } => (account, cache),
        };

        let mut cached = cache.lock().await;
        if let Some(info) = cached.as_ref() {
            if info.expires_at > now_secs() + EXPIRY_MARGIN_SECS {
                return Ok(info.access_token.clone());
            }
        }

        let jwt = create_jwt(account)?;

        let response = client
            .post(account.token_url())
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("token request failed: {status} - {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("token parse error: {e}")))?;

        tracing::debug!(
            client_email = %account.client_email,
            expires_in = token.expires_in,
            "refreshed access token"
        );

        let access_token = SecretString::from(token.access_token);
        *cached = Some(TokenInfo {
            access_token: access_token.clone(),
            expires_at: now_secs() + token.expires_in,
        });

        Ok(access_token)
    }
}

/// Create the signed assertion for the token request
fn create_jwt(account: &ServiceAccount) -> Result<String> {
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    let now = now_secs();
    let claims = JwtClaims {
        iss: &account.client_email,
        scope: TOKEN_SCOPE,
        aud: account.token_url(),
        exp: now + 3600,
        iat: now,
    };

    let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
        .map_err(|e| Error::Auth(format!("invalid private key: {e}")))?;

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| Error::Auth(format!("JWT encoding failed: {e}")))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
