// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir Image Classifier

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-vision-classifier-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "google-cloud-vision",
    "api-key-auth",
    "service-account-auth",
    "label-detection",
    "face-detection",
    "object-localization",
    "web-detection",
    "animal-classification",
    "face-expressions",
];
