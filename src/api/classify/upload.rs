// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart image upload extraction

use axum::http::StatusCode;
use axum_extra::extract::multipart::{Multipart, MultipartError};
use tracing::{debug, warn};

use crate::api::errors::{ApiError, INVALID_MULTIPART_MESSAGE};

/// Form field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// An image read from a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

fn map_multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        warn!("Malformed multipart body: {}", err.body_text());
        ApiError::InvalidRequest(INVALID_MULTIPART_MESSAGE.to_string())
    }
}

/// Read the `image` field, streaming it so oversized uploads abort early
///
/// Fields with other names are skipped. A form without an `image` field,
/// or with an empty one, is treated as a missing upload.
pub async fn read_image_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<ImageUpload, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, max_bytes))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| map_multipart_error(e, max_bytes))?
        {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(ApiError::PayloadTooLarge { limit: max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(ApiError::MissingImage);
        }

        return Ok(ImageUpload {
            bytes,
            file_name,
            content_type,
        });
    }

    Err(ApiError::MissingImage)
}
