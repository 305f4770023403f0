// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the vision annotation client

use std::path::PathBuf;

use super::types::{Feature, FeatureType};

/// Default Cloud Vision endpoint
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";

/// Configuration for the vision annotation client
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Base URL of the annotation service
    pub endpoint: String,
    /// API key (sent as `?key=`), takes precedence over a service account
    pub api_key: Option<String>,
    /// Path to a service-account JSON key file
    pub credentials_path: Option<PathBuf>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum label annotations to request
    pub label_max_results: u32,
    /// Maximum web detection results to request
    pub web_max_results: u32,
}

impl VisionConfig {
    /// Feature list sent with every annotation request
    pub fn features(&self) -> Vec<Feature> {
        vec![
            Feature::with_max_results(FeatureType::LabelDetection, self.label_max_results),
            Feature::new(FeatureType::FaceDetection),
            Feature::new(FeatureType::ObjectLocalization),
            Feature::with_max_results(FeatureType::WebDetection, self.web_max_results),
        ]
    }

    /// Check if any credential source is configured
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_ref().map(|k| !k.is_empty()).unwrap_or(false)
            || self.credentials_path.is_some()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("Invalid vision endpoint '{}': {}", self.endpoint, e))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(format!(
                "Vision endpoint must be http or https, got '{}'",
                endpoint.scheme()
            ));
        }
        if self.timeout_secs == 0 {
            return Err("Vision timeout must be greater than 0".to_string());
        }
        if self.label_max_results == 0 {
            return Err("Label max results must be greater than 0".to_string());
        }
        if self.web_max_results == 0 {
            return Err("Web max results must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            api_key: None,
            credentials_path: None,
            timeout_secs: 30,
            label_max_results: 15,
            web_max_results: 5,
        }
    }
}
