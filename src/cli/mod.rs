// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;

use crate::classifier::{CategoryPriority, ClassifierConfig};
use crate::config::ServerConfig;
use crate::vision::config::{VisionConfig, DEFAULT_VISION_ENDPOINT};
use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Fabstir Image Classifier
#[derive(Parser, Debug)]
#[command(name = "fabstir-image-classifier")]
#[command(version)]
#[command(about = "Classify uploaded images using Google Cloud Vision", long_about = None)]
pub struct Cli {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Maximum image upload size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = MAX_IMAGE_SIZE)]
    pub max_upload_bytes: usize,

    /// Vision API base URL
    #[arg(long, env = "VISION_API_ENDPOINT", default_value = DEFAULT_VISION_ENDPOINT)]
    pub vision_endpoint: String,

    /// Vision API key (takes precedence over a service account)
    #[arg(long, env = "GOOGLE_VISION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to a service account JSON key
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Vision request timeout in seconds
    #[arg(long, env = "VISION_TIMEOUT_SECS", default_value_t = 30)]
    pub vision_timeout_secs: u64,

    /// Maximum label annotations to request
    #[arg(long, env = "LABEL_MAX_RESULTS", default_value_t = 15)]
    pub label_max_results: u32,

    /// Maximum web detection results to request
    #[arg(long, env = "WEB_MAX_RESULTS", default_value_t = 5)]
    pub web_max_results: u32,

    /// Which signal wins when both animals and faces are found (animal-first, face-first)
    #[arg(long, env = "CATEGORY_PRIORITY", default_value = "animal-first")]
    pub category_priority: CategoryPriority,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            max_upload_bytes: self.max_upload_bytes,
        }
    }

    pub fn vision_config(&self) -> VisionConfig {
        VisionConfig {
            endpoint: self.vision_endpoint.clone(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            credentials_path: self.credentials.clone(),
            timeout_secs: self.vision_timeout_secs,
            label_max_results: self.label_max_results,
            web_max_results: self.web_max_results,
        }
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            priority: self.category_priority,
        }
    }
}
