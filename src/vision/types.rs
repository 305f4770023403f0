// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the vision annotation service
//!
//! These mirror the wire shape of the Cloud Vision `images:annotate` API
//! (camelCase JSON). Every collection defaults to empty so a response that
//! omits a feature still deserializes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Five-level likelihood scale used for facial attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
    /// Missing or unrecognised values land here
    #[default]
    #[serde(other)]
    Unknown,
}

impl Likelihood {
    /// True for `LIKELY` and `VERY_LIKELY`
    pub fn is_likely(self) -> bool {
        matches!(self, Likelihood::Likely | Likelihood::VeryLikely)
    }
}

/// A free-text tag describing image content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAnnotation {
    /// Knowledge graph entity id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    /// Label text, e.g. "Dog"
    #[serde(default)]
    pub description: String,
    /// Confidence score (0.0-1.0)
    #[serde(default)]
    pub score: f32,
    /// Relevance of the label to the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topicality: Option<f32>,
}

/// Normalized (0.0-1.0) vertex of a bounding polygon
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// Bounding polygon of a localized object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPoly {
    #[serde(default)]
    pub normalized_vertices: Vec<NormalizedVertex>,
}

/// A detected object with its location
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedObjectAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    /// Object name, e.g. "Cat"
    #[serde(default)]
    pub name: String,
    /// Confidence score (0.0-1.0)
    #[serde(default)]
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
}

/// Facial attributes of a detected face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceAnnotation {
    #[serde(default)]
    pub joy_likelihood: Likelihood,
    #[serde(default)]
    pub sorrow_likelihood: Likelihood,
    #[serde(default)]
    pub anger_likelihood: Likelihood,
    #[serde(default)]
    pub surprise_likelihood: Likelihood,
    #[serde(default)]
    pub under_exposed_likelihood: Likelihood,
    #[serde(default)]
    pub blurred_likelihood: Likelihood,
    #[serde(default)]
    pub headwear_likelihood: Likelihood,
    #[serde(default)]
    pub detection_confidence: f32,
}

/// Entity inferred from similar images on the web
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Best guess of the image topic
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebLabel {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// Web detection block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebDetection {
    #[serde(default)]
    pub web_entities: Vec<WebEntity>,
    #[serde(default)]
    pub best_guess_labels: Vec<WebLabel>,
}

/// Error reported for a single image inside a successful HTTP response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Annotations returned for one image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationResult {
    #[serde(default)]
    pub label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    pub localized_object_annotations: Vec<LocalizedObjectAnnotation>,
    #[serde(default)]
    pub face_annotations: Vec<FaceAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_detection: Option<WebDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AnnotationStatus>,
}

/// Feature kinds requested from the vision service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    LabelDetection,
    FaceDetection,
    ObjectLocalization,
    WebDetection,
}

/// A single requested feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

impl Feature {
    pub fn new(kind: FeatureType) -> Self {
        Self {
            kind,
            max_results: None,
        }
    }

    pub fn with_max_results(kind: FeatureType, max_results: u32) -> Self {
        Self {
            kind,
            max_results: Some(max_results),
        }
    }
}

/// Inline image payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Base64-encoded image bytes
    pub content: String,
}

/// Request to annotate a single image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

impl AnnotateImageRequest {
    pub fn new(base64_content: String, features: Vec<Feature>) -> Self {
        Self {
            image: ImageContent {
                content: base64_content,
            },
            features,
        }
    }
}

/// Errors that can occur while annotating an image
#[derive(Debug, Error)]
pub enum VisionError {
    /// Transport-level failure talking to the vision service
    #[error("Vision request failed: {0}")]
    Http(String),

    /// Request exceeded the configured timeout
    #[error("Vision request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-success HTTP status from the vision service
    #[error("Vision API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the vision service
    #[error("Vision API rate limit exceeded")]
    RateLimited,

    /// Missing, invalid or rejected credentials
    #[error("Vision credentials error: {0}")]
    Credentials(String),

    /// The service reported an error for this image
    #[error("Annotation failed: {code} - {message}")]
    Annotation { code: i32, message: String },

    /// Response body could not be understood
    #[error("Invalid vision response: {0}")]
    InvalidResponse(String),
}
