// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classify image API endpoint module
//!
//! Provides POST / and POST /v1/classify for multipart image uploads.

pub mod handler;
pub mod upload;

pub use handler::classify_handler;
pub use upload::{read_image_upload, ImageUpload, IMAGE_FIELD};
