// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision provider trait definition

use async_trait::async_trait;

use super::types::{AnnotateImageRequest, AnnotationResult, VisionError};

/// Trait for implementing vision annotation providers
///
/// The HTTP layer holds an `Arc<dyn VisionProvider>` so the real cloud
/// client can be swapped for a test double.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Annotate a single image
    ///
    /// # Arguments
    /// * `request` - Base64 image content and the requested features
    ///
    /// # Returns
    /// Annotations for the image or an error
    async fn annotate(
        &self,
        request: &AnnotateImageRequest,
    ) -> Result<AnnotationResult, VisionError>;

    /// Get the provider name for logging
    fn name(&self) -> &'static str;

    /// Check if the provider is usable (has credentials, etc.)
    fn is_available(&self) -> bool;
}
