// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::http_server::{create_app, AppState};
pub use classifier::{Category, CategoryPriority, Classification, Classifier, ClassifierConfig};
pub use config::ServerConfig;
pub use vision::{
    AnnotateImageRequest, AnnotationResult, GoogleVisionProvider, VisionConfig, VisionError,
    VisionProvider,
};
