// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Credentials for the Cloud Vision API
//!
//! Two modes are supported:
//! - API key, appended to each request as `?key=`
//! - Service account, exchanged for a short-lived OAuth2 access token using
//!   the JWT bearer grant (RS256 assertion signed with the account's key)
//!
//! Access tokens are cached and refreshed shortly before they expire.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::VisionError;

/// OAuth2 scope for Cloud Vision
pub const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";

/// Default Google token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh tokens this long before they expire
const REFRESH_MARGIN_SECS: i64 = 60;

/// Errors raised while loading credentials or minting tokens
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Failed to read credentials file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed service account key: {0}")]
    Parse(String),

    #[error("Unsupported credential type '{0}', expected 'service_account'")]
    UnsupportedType(String),

    #[error("Invalid service account private key: {0}")]
    InvalidKey(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(String),

    #[error("Token request failed: {0}")]
    TokenRequest(String),

    #[error("Token endpoint rejected assertion: {status} - {message}")]
    TokenRejected { status: u16, message: String },
}

impl From<CredentialsError> for VisionError {
    fn from(err: CredentialsError) -> Self {
        VisionError::Credentials(err.to_string())
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Service account key file contents
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

// Keeps the private key out of logs
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse a service account key from JSON text
    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        let key: ServiceAccountKey =
            serde_json::from_str(json).map_err(|e| CredentialsError::Parse(e.to_string()))?;

        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(CredentialsError::UnsupportedType(other.to_string())),
        }
    }

    /// Load a service account key from a file
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        let json = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Mints and caches OAuth2 access tokens for a service account
pub struct TokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenSource {
    /// Create a token source, validating the private key up front
    pub fn new(key: ServiceAccountKey, client: Client) -> Result<Self, CredentialsError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| CredentialsError::InvalidKey(e.to_string()))?;

        info!("Service account key loaded (token uri: {})", key.token_uri);

        Ok(Self {
            key,
            encoding_key,
            client,
            cached: RwLock::new(None),
        })
    }

    /// Service account email
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn build_assertion(&self, now: DateTime<Utc>) -> Result<String, CredentialsError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: VISION_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| CredentialsError::Signing(e.to_string()))
    }

    async fn fetch_token(&self) -> Result<CachedToken, CredentialsError> {
        let now = Utc::now();
        let assertion = self.build_assertion(now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| CredentialsError::TokenRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CredentialsError::TokenRejected {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialsError::TokenRequest(format!("JSON parse error: {}", e)))?;

        debug!("Access token minted, expires in {}s", token.expires_in);

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }

    /// Get a valid access token, minting a new one if the cached one is stale
    pub async fn access_token(&self) -> Result<String, CredentialsError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_fresh(Utc::now()) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}

/// How requests to the vision service are authenticated
pub enum VisionAuth {
    /// No credentials configured; every request fails
    Unconfigured,
    /// API key sent as the `key` query parameter
    ApiKey(String),
    /// OAuth2 bearer token minted from a service account
    ServiceAccount(TokenSource),
}

impl VisionAuth {
    pub fn is_configured(&self) -> bool {
        !matches!(self, VisionAuth::Unconfigured)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            VisionAuth::Unconfigured => "none",
            VisionAuth::ApiKey(_) => "api-key",
            VisionAuth::ServiceAccount(_) => "service-account",
        }
    }
}
