// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision annotation module
//!
//! This module provides:
//! - The `VisionProvider` abstraction used by the HTTP layer
//! - A Google Cloud Vision implementation (API key or service account auth)
//! - Wire types for annotation requests and results
//! - Upload inspection and base64 encoding

pub mod config;
pub mod credentials;
pub mod google;
pub mod image_utils;
pub mod provider;
pub mod types;

pub use config::VisionConfig;
pub use credentials::{CredentialsError, ServiceAccountKey, TokenSource, VisionAuth};
pub use google::GoogleVisionProvider;
pub use image_utils::{encode_base64_image, inspect_image_bytes, ImageError, ImageInfo};
pub use provider::VisionProvider;
pub use types::{
    AnnotateImageRequest, AnnotationResult, FaceAnnotation, Feature, FeatureType,
    LabelAnnotation, Likelihood, LocalizedObjectAnnotation, VisionError, WebDetection,
};
