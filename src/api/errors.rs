// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use crate::vision::VisionError;

/// Public message for any failure after the upload was accepted
pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing image";

/// Public message when the request carries no image
pub const MISSING_IMAGE_MESSAGE: &str = "No image uploaded";

/// Public message when the multipart body cannot be parsed
pub const INVALID_MULTIPART_MESSAGE: &str = "Invalid multipart body";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    MissingImage,
    PayloadTooLarge { limit: usize },
    InvalidRequest(String),
    Vision(VisionError),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            ApiError::MissingImage => MISSING_IMAGE_MESSAGE.to_string(),
            ApiError::PayloadTooLarge { limit } => {
                format!("Image exceeds maximum size of {} bytes", limit)
            }
            ApiError::InvalidRequest(msg) => msg.clone(),
            // Upstream detail stays in the logs
            ApiError::Vision(_) => PROCESSING_ERROR_MESSAGE.to_string(),
        };

        ErrorResponse { error }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingImage | ApiError::InvalidRequest(_) => 400,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::Vision(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingImage => write!(f, "No image uploaded"),
            ApiError::PayloadTooLarge { limit } => {
                write!(f, "Payload too large: limit is {} bytes", limit)
            }
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::Vision(e) => write!(f, "Vision error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<VisionError> for ApiError {
    fn from(err: VisionError) -> Self {
        ApiError::Vision(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(self.to_response())).into_response()
    }
}
