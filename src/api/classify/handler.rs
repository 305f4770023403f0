// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classify image endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::upload::read_image_upload;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::classifier::Classification;
use crate::vision::{encode_base64_image, inspect_image_bytes, AnnotateImageRequest, ImageError};

/// POST / and POST /v1/classify - Classify an uploaded image
///
/// # Request
/// `multipart/form-data` with the image in the `image` field (max 5 MiB by default)
///
/// # Response
/// - `category`: "Object", "Human", "Animal" or a species such as "Dog"
/// - `detectedEntity`: One-line description
/// - `faceDetails`: Expression of the first detected face
/// - `labels`: Labels in the order returned by the vision service
/// - `mainObject`: Most confident localized object, or "Unknown"
///
/// # Errors
/// - 400 Bad Request: No image uploaded
/// - 413 Payload Too Large: Image exceeds the upload limit
/// - 500 Internal Server Error: Vision service or processing failure
pub async fn classify_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Classification>, ApiError> {
    let multipart = multipart.map_err(|e| {
        warn!("Upload rejected, not a multipart form: {}", e);
        ApiError::MissingImage
    })?;

    // 1. Read upload
    let upload = read_image_upload(multipart, state.max_upload_bytes)
        .await
        .map_err(|e| {
            warn!("Upload failed: {}", e);
            e
        })?;

    let image_info =
        inspect_image_bytes(&upload.bytes, state.max_upload_bytes).map_err(|e| match e {
            ImageError::EmptyData => ApiError::MissingImage,
            ImageError::TooLarge(_, limit) => ApiError::PayloadTooLarge { limit },
        })?;

    info!(
        "File received: {} ({} bytes, {}, declared {})",
        upload.file_name.as_deref().unwrap_or("<unnamed>"),
        image_info.size_bytes,
        image_info.mime_type(),
        upload.content_type.as_deref().unwrap_or("none")
    );

    // 2. Annotate
    let start = Instant::now();
    let request = AnnotateImageRequest::new(
        encode_base64_image(&upload.bytes),
        state.features.as_ref().clone(),
    );
    let annotations = state.vision_provider.annotate(&request).await?;

    debug!(
        "{} annotated in {}ms",
        state.vision_provider.name(),
        start.elapsed().as_millis()
    );

    // 3. Classify
    let classification = state.classifier.classify(&annotations);

    info!(
        "Classified as {} (main object: {}, {} labels)",
        classification.category,
        classification.main_object,
        classification.labels.len()
    );

    Ok(Json(classification))
}
