// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image encoding helpers for uploads sent to the vision service

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use thiserror::Error;

/// Maximum upload size (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Errors for raw image payloads
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Image data is empty")]
    EmptyData,
}

/// Metadata about an uploaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Format sniffed from magic bytes, if recognised
    pub format: Option<ImageFormat>,
    /// Size in bytes
    pub size_bytes: usize,
}

impl ImageInfo {
    /// MIME type for logging, "application/octet-stream" when unknown
    pub fn mime_type(&self) -> &'static str {
        self.format
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream")
    }
}

/// Inspect raw upload bytes
///
/// Unknown formats are not rejected here; the vision service is the
/// authority on what it can decode.
pub fn inspect_image_bytes(bytes: &[u8], max_size: usize) -> Result<ImageInfo, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > max_size {
        return Err(ImageError::TooLarge(bytes.len(), max_size));
    }

    Ok(ImageInfo {
        format: image::guess_format(bytes).ok(),
        size_bytes: bytes.len(),
    })
}

/// Base64-encode image bytes for the annotation request
pub fn encode_base64_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
