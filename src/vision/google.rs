// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Cloud Vision provider
//!
//! Calls the REST `images:annotate` endpoint with one image per request.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::VisionConfig;
use super::credentials::{ServiceAccountKey, TokenSource, VisionAuth};
use super::provider::VisionProvider;
use super::types::{AnnotateImageRequest, AnnotationResult, VisionError};

const ANNOTATE_PATH: &str = "/v1/images:annotate";

#[derive(Serialize)]
struct BatchAnnotateRequest<'a> {
    requests: [&'a AnnotateImageRequest; 1],
}

#[derive(Debug, Deserialize)]
struct BatchAnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotationResult>,
}

fn build_client(timeout_secs: u64) -> Result<Client, VisionError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| VisionError::Http(e.to_string()))
}

/// Google Cloud Vision provider
pub struct GoogleVisionProvider {
    client: Client,
    endpoint: String,
    auth: VisionAuth,
    timeout_secs: u64,
}

impl GoogleVisionProvider {
    /// Create a provider with explicit auth
    pub fn new(endpoint: &str, auth: VisionAuth, timeout_secs: u64) -> Result<Self, VisionError> {
        let client = build_client(timeout_secs)?;
        Ok(Self::with_client(client, endpoint, auth, timeout_secs))
    }

    fn with_client(client: Client, endpoint: &str, auth: VisionAuth, timeout_secs: u64) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Vision provider configured: endpoint={}, auth={}",
            endpoint,
            auth.describe()
        );

        Self {
            client,
            endpoint,
            auth,
            timeout_secs,
        }
    }

    /// Build a provider from configuration
    ///
    /// An API key wins over a service account file. With neither, the
    /// provider is created unconfigured and every request fails.
    pub fn from_config(config: &VisionConfig) -> Result<Self, VisionError> {
        let client = build_client(config.timeout_secs)?;

        let auth = match (&config.api_key, &config.credentials_path) {
            _ if !config.has_credentials() => {
                warn!("No vision credentials configured; classification requests will fail");
                warn!("   Set GOOGLE_VISION_API_KEY or GOOGLE_APPLICATION_CREDENTIALS");
                VisionAuth::Unconfigured
            }
            (Some(key), _) if !key.is_empty() => VisionAuth::ApiKey(key.clone()),
            (_, Some(path)) => {
                let key = ServiceAccountKey::from_file(path)?;
                let tokens = TokenSource::new(key, client.clone())?;
                info!("Using service account {}", tokens.client_email());
                VisionAuth::ServiceAccount(tokens)
            }
            _ => VisionAuth::Unconfigured,
        };

        Ok(Self::with_client(
            client,
            &config.endpoint,
            auth,
            config.timeout_secs,
        ))
    }

    /// Endpoint base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> VisionError {
        if e.is_timeout() {
            VisionError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            VisionError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl VisionProvider for GoogleVisionProvider {
    async fn annotate(
        &self,
        request: &AnnotateImageRequest,
    ) -> Result<AnnotationResult, VisionError> {
        let url = format!("{}{}", self.endpoint, ANNOTATE_PATH);
        let body = BatchAnnotateRequest { requests: [request] };

        let builder = match &self.auth {
            VisionAuth::Unconfigured => {
                return Err(VisionError::Credentials(
                    "no vision credentials configured".to_string(),
                ))
            }
            VisionAuth::ApiKey(key) => self.client.post(&url).query(&[("key", key)]),
            VisionAuth::ServiceAccount(tokens) => {
                let token = tokens.access_token().await?;
                self.client.post(&url).bearer_auth(token)
            }
        };

        debug!(
            "Annotating image: {} base64 chars, {} features",
            request.image.content.len(),
            request.features.len()
        );

        let response = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();

        if status == 429 {
            return Err(VisionError::RateLimited);
        }

        if status == 401 || status == 403 {
            let message = response.text().await.unwrap_or_default();
            return Err(VisionError::Credentials(format!(
                "vision service rejected credentials ({}): {}",
                status.as_u16(),
                message
            )));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VisionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: BatchAnnotateResponse = response
            .json()
            .await
            .map_err(|e| VisionError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        let result = data
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| VisionError::InvalidResponse("empty responses array".to_string()))?;

        if let Some(err) = result.error.as_ref() {
            return Err(VisionError::Annotation {
                code: err.code,
                message: err.message.clone(),
            });
        }

        debug!(
            "Annotation complete: {} labels, {} objects, {} faces",
            result.label_annotations.len(),
            result.localized_object_annotations.len(),
            result.face_annotations.len()
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "google-cloud-vision"
    }

    fn is_available(&self) -> bool {
        self.auth.is_configured()
    }
}
